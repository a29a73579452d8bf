//! Topic and consumer-group routing tables.

use domain::{BoundedContext, EventKind};

pub const ORDER_EVENTS: &str = "order-events";
pub const LOGISTICS_EVENTS: &str = "logistics-events";
pub const INVENTORY_EVENTS: &str = "inventory-events";
pub const PURCHASE_EVENTS: &str = "purchase-events";
pub const FINANCE_EVENTS: &str = "finance-events";

pub const LOGISTICS_GROUP: &str = "logistics-group";
pub const WAREHOUSE_GROUP: &str = "warehouse-group";
pub const FINANCE_GROUP: &str = "finance-group";
pub const PURCHASE_GROUP: &str = "purchase-group";

/// Topic every event of a context is published to.
pub fn topic_for(context: BoundedContext) -> &'static str {
    match context {
        BoundedContext::Order => ORDER_EVENTS,
        BoundedContext::Logistics => LOGISTICS_EVENTS,
        BoundedContext::Warehouse => INVENTORY_EVENTS,
        BoundedContext::Purchase => PURCHASE_EVENTS,
        BoundedContext::Finance => FINANCE_EVENTS,
    }
}

/// Event kinds consumers act on when they arrive on `topic`.
///
/// Anything else published to the topic is ignored by the bridge.
pub fn consumed_kinds(topic: &str) -> &'static [EventKind] {
    match topic {
        ORDER_EVENTS => &[EventKind::OrderCreated, EventKind::OrderStatusChanged],
        LOGISTICS_EVENTS => &[EventKind::LogisticsCompleted],
        INVENTORY_EVENTS => &[EventKind::InventoryShortage],
        _ => &[],
    }
}

/// Default (topic, consumer group) subscriptions of the engine.
pub const SUBSCRIPTIONS: &[(&str, &str)] = &[
    (ORDER_EVENTS, LOGISTICS_GROUP),
    (ORDER_EVENTS, WAREHOUSE_GROUP),
    (LOGISTICS_EVENTS, FINANCE_GROUP),
    (INVENTORY_EVENTS, PURCHASE_GROUP),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumed_kinds_belong_to_topic_context() {
        for kind in consumed_kinds(ORDER_EVENTS)
            .iter()
            .chain(consumed_kinds(LOGISTICS_EVENTS))
            .chain(consumed_kinds(INVENTORY_EVENTS))
        {
            let topic = topic_for(kind.context());
            assert!(consumed_kinds(topic).contains(kind), "{kind} on {topic}");
        }
    }

    #[test]
    fn test_publisher_only_topics_have_no_consumers() {
        assert!(consumed_kinds(FINANCE_EVENTS).is_empty());
        assert!(consumed_kinds(PURCHASE_EVENTS).is_empty());
        assert!(consumed_kinds("unknown").is_empty());
    }

    #[test]
    fn test_label_events_are_not_consumed() {
        assert!(!consumed_kinds(LOGISTICS_EVENTS).contains(&EventKind::LabelGenerated));
    }
}
