//! Order state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Pending ──► Processing ──┬──► Confirmed ──┬──► Shipped ──► Completed
///    │            │        └────────────────┘
///    │            │              │
///    └────────────┴──────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been placed and validated.
    #[default]
    Pending,

    /// Order is being prepared.
    Processing,

    /// Payment confirmed, ready for fulfillment.
    Confirmed,

    /// Order has left the warehouse.
    Shipped,

    /// Order was received by the customer (terminal state).
    Completed,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns the statuses an order may move into this status from.
    pub fn allowed_predecessors(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[],
            Processing => &[Pending],
            Confirmed => &[Processing],
            Shipped => &[Processing, Confirmed],
            Completed => &[Shipped],
            Cancelled => &[Pending, Processing, Confirmed],
        }
    }

    /// Returns true if the transition `self -> target` is allowed.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        target.allowed_predecessors().contains(self)
    }

    /// Returns true if items can be modified in this status.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if the order can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }

    /// Returns true if this is a terminal status (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::OrderStatus::*;

    const ALL: [OrderStatus; 6] = [Pending, Processing, Confirmed, Shipped, Completed, Cancelled];

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(OrderStatus::default(), Pending);
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Completed));
    }

    #[test]
    fn test_ship_requires_processing_or_confirmed() {
        assert!(Processing.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Completed.can_transition_to(Shipped));
    }

    #[test]
    fn test_cannot_cancel_shipped_or_completed() {
        assert!(Pending.can_cancel());
        assert!(Processing.can_cancel());
        assert!(Confirmed.can_cancel());
        assert!(!Shipped.can_cancel());
        assert!(!Completed.can_cancel());
        assert!(!Cancelled.can_cancel());
    }

    #[test]
    fn test_terminal_states_have_no_successors() {
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            assert!(ALL.iter().all(|next| !terminal.can_transition_to(*next)));
        }
    }

    #[test]
    fn test_parse_and_display() {
        for status in ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("con_firmed".parse::<OrderStatus>().is_err());
    }
}
