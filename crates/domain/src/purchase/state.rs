//! Purchase order state machine.

use serde::{Deserialize, Serialize};

/// The status of a purchase order.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Approved ──► InTransit ──► Delivered
///           ├──► Rejected
///           └──► Cancelled ◄── (Approved | InTransit)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    InTransit,
    Delivered,
    Cancelled,
}

impl PurchaseStatus {
    pub fn allowed_predecessors(&self) -> &'static [PurchaseStatus] {
        use PurchaseStatus::*;
        match self {
            Pending => &[],
            Approved | Rejected => &[Pending],
            InTransit => &[Approved],
            Delivered => &[InTransit],
            Cancelled => &[Pending, Approved, InTransit],
        }
    }

    pub fn can_transition_to(&self, target: PurchaseStatus) -> bool {
        target.allowed_predecessors().contains(self)
    }

    /// Returns true if items may still be added.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, PurchaseStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PurchaseStatus::Rejected | PurchaseStatus::Delivered | PurchaseStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "PENDING",
            PurchaseStatus::Approved => "APPROVED",
            PurchaseStatus::Rejected => "REJECTED",
            PurchaseStatus::InTransit => "IN_TRANSIT",
            PurchaseStatus::Delivered => "DELIVERED",
            PurchaseStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
