//! Logistics order state machine.

use serde::{Deserialize, Serialize};

/// The status of a logistics order.
///
/// State transitions:
/// ```text
/// Pending ──┬──► LabelGenerated ──┐
///           └────────────────────┴──► Collected ──► InTransit ──┬──► Delivering ──┐
///                                                               └─────────────────┴──► Delivered
///
/// Pending | LabelGenerated ──► Cancelled
/// any non-terminal         ──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsStatus {
    #[default]
    Pending,
    LabelGenerated,
    Collected,
    InTransit,
    Delivering,
    /// Parcel handed to the recipient (terminal state).
    Delivered,
    /// Carrier gave up on the parcel (terminal state).
    Failed,
    /// Shipment withdrawn before collection (terminal state).
    Cancelled,
}

impl LogisticsStatus {
    /// Returns the statuses a logistics order may move into this status from.
    pub fn allowed_predecessors(&self) -> &'static [LogisticsStatus] {
        use LogisticsStatus::*;
        match self {
            Pending => &[],
            LabelGenerated => &[Pending],
            Collected => &[Pending, LabelGenerated],
            InTransit => &[Collected],
            Delivering => &[InTransit],
            Delivered => &[InTransit, Delivering],
            Failed => &[Pending, LabelGenerated, Collected, InTransit, Delivering],
            Cancelled => &[Pending, LabelGenerated],
        }
    }

    pub fn can_transition_to(&self, target: LogisticsStatus) -> bool {
        target.allowed_predecessors().contains(self)
    }

    /// Collected, in-transit and delivered parcels can no longer be cancelled.
    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(LogisticsStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LogisticsStatus::Delivered | LogisticsStatus::Failed | LogisticsStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogisticsStatus::Pending => "PENDING",
            LogisticsStatus::LabelGenerated => "LABEL_GENERATED",
            LogisticsStatus::Collected => "COLLECTED",
            LogisticsStatus::InTransit => "IN_TRANSIT",
            LogisticsStatus::Delivering => "DELIVERING",
            LogisticsStatus::Delivered => "DELIVERED",
            LogisticsStatus::Failed => "FAILED",
            LogisticsStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for LogisticsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogisticsStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(LogisticsStatus::Pending),
            "LABEL_GENERATED" => Ok(LogisticsStatus::LabelGenerated),
            "COLLECTED" => Ok(LogisticsStatus::Collected),
            "IN_TRANSIT" => Ok(LogisticsStatus::InTransit),
            "DELIVERING" => Ok(LogisticsStatus::Delivering),
            "DELIVERED" => Ok(LogisticsStatus::Delivered),
            "FAILED" => Ok(LogisticsStatus::Failed),
            "CANCELLED" => Ok(LogisticsStatus::Cancelled),
            other => Err(format!("unknown logistics status: {other}")),
        }
    }
}
