//! Value objects for the order domain.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Money, ProductId};

/// Identifier of the customer placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the ID is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A line item in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Stock keeping unit used by the warehouse.
    pub sku: String,

    /// Human-readable product name.
    pub product_name: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Price per unit.
    pub unit_price: Money,

    /// Shipping weight per unit.
    #[serde(default)]
    pub weight_grams: u32,
}

impl OrderItem {
    pub fn new(
        product_id: impl Into<ProductId>,
        sku: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            sku: sku.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            weight_grams: 0,
        }
    }

    pub fn with_weight_grams(mut self, weight_grams: u32) -> Self {
        self.weight_grams = weight_grams;
        self
    }

    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Where an order is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub recipient: String,
    pub phone: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub street: String,
    pub zip_code: String,
}

/// How an order is paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// e.g. "CARD", "ALIPAY".
    pub payment_method: String,
    /// Status reported by the payment provider.
    pub payment_status: String,
    /// Provider transaction reference, if already charged.
    pub transaction_id: Option<String>,
    /// Amount the customer pays; must equal the order total.
    pub amount: Money,
}

impl PaymentInfo {
    pub fn new(payment_method: impl Into<String>, amount: Money) -> Self {
        Self {
            payment_method: payment_method.into(),
            payment_status: "PENDING".to_string(),
            transaction_id: None,
            amount,
        }
    }
}
