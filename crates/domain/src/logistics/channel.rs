//! Carrier channels and the price rules they charge by.

use serde::{Deserialize, Serialize};

use crate::order::OrderItem;
use crate::value_objects::Money;

use super::LogisticsError;

/// Inclusive bounds on a parcel measure. `max: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl MeasureRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub fn at_least(min: u64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value <= max)
    }
}

/// Flat price for parcels within a weight and volume band.
///
/// A missing band matches every parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRule {
    pub weight_grams: Option<MeasureRange>,
    pub volume_cm3: Option<MeasureRange>,
    pub price: Money,
}

impl PriceRule {
    pub fn by_weight(weight_grams: MeasureRange, price: Money) -> Self {
        Self {
            weight_grams: Some(weight_grams),
            volume_cm3: None,
            price,
        }
    }

    pub fn is_applicable(&self, parcel: &Parcel) -> bool {
        self.weight_grams
            .is_none_or(|range| range.contains(parcel.weight_grams))
            && self
                .volume_cm3
                .is_none_or(|range| range.contains(parcel.volume_cm3))
    }
}

/// What is being shipped and where to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Parcel {
    pub weight_grams: u64,
    pub volume_cm3: u64,
    pub country: String,
}

impl Parcel {
    /// Builds the parcel for an order's items.
    pub fn for_items(items: &[OrderItem], country: impl Into<String>) -> Self {
        let weight_grams = items
            .iter()
            .map(|item| u64::from(item.weight_grams) * u64::from(item.quantity))
            .sum();
        Self {
            weight_grams,
            volume_cm3: 0,
            country: country.into(),
        }
    }
}

/// A carrier channel shipments can be booked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsChannel {
    channel_id: String,
    name: String,
    /// Countries served; empty serves every country.
    countries: Vec<String>,
    price_rules: Vec<PriceRule>,
    active: bool,
}

impl LogisticsChannel {
    pub fn new(channel_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            name: name.into(),
            countries: Vec::new(),
            price_rules: Vec::new(),
            active: true,
        }
    }

    /// The weight-banded tariff used when nothing else is configured.
    pub fn standard(channel_id: impl Into<String>) -> Self {
        Self::new(channel_id, "Standard")
            .with_rule(PriceRule::by_weight(
                MeasureRange::new(0, 1_000),
                Money::from_cents(500),
            ))
            .with_rule(PriceRule::by_weight(
                MeasureRange::new(1_001, 5_000),
                Money::from_cents(800),
            ))
            .with_rule(PriceRule::by_weight(
                MeasureRange::at_least(5_001),
                Money::from_cents(1_500),
            ))
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.push(country.into());
        self
    }

    pub fn with_rule(mut self, rule: PriceRule) -> Self {
        self.price_rules.push(rule);
        self
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_rules(&self) -> &[PriceRule] {
        &self.price_rules
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn supports_country(&self, country: &str) -> bool {
        self.countries.is_empty() || self.countries.iter().any(|c| c == country)
    }

    /// Prices a parcel with the first rule that applies to it.
    pub fn calculate_fee(&self, parcel: &Parcel) -> Result<Money, LogisticsError> {
        if !self.active {
            return Err(LogisticsError::ChannelInactive {
                channel_id: self.channel_id.clone(),
            });
        }
        if !self.supports_country(&parcel.country) {
            return Err(LogisticsError::UnsupportedCountry {
                channel_id: self.channel_id.clone(),
                country: parcel.country.clone(),
            });
        }
        self.price_rules
            .iter()
            .find(|rule| rule.is_applicable(parcel))
            .map(|rule| rule.price)
            .ok_or_else(|| LogisticsError::NoPriceRule {
                channel_id: self.channel_id.clone(),
                weight_grams: parcel.weight_grams,
                volume_cm3: parcel.volume_cm3,
            })
    }
}
