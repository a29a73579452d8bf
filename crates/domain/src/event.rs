//! Domain events exchanged between bounded contexts.

use chrono::{DateTime, Utc};
use common::{AggregateId, EventId, TenantId};
use serde::{Deserialize, Serialize};

use crate::finance::{TransactionCreatedData, TransactionStatusChangedData};
use crate::logistics::{
    LabelGeneratedData, LogisticsCompletedData, LogisticsOrderCreatedData,
    LogisticsStatusChangedData,
};
use crate::order::{
    OrderCompletedData, OrderCreatedData, OrderItemsChangedData, OrderShippedData,
    OrderStatusChangedData,
};
use crate::purchase::{PurchaseOrderCreatedData, PurchaseOrderStatusChangedData};
use crate::warehouse::{
    InventoryCountedData, InventoryMovementData, InventoryShortageData, WarehouseCreatedData,
};

/// An immutable record of something that happened to an aggregate.
///
/// Fields are only readable after construction. The `event_id` doubles as
/// the idempotency key consumers use to detect redelivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    event_id: EventId,
    aggregate_id: AggregateId,
    tenant_id: TenantId,
    occurred_at: DateTime<Utc>,
    payload: EventPayload,
}

impl DomainEvent {
    /// Creates an event that occurred now.
    pub fn new(aggregate_id: AggregateId, tenant_id: TenantId, payload: EventPayload) -> Self {
        Self {
            event_id: EventId::new(),
            aggregate_id,
            tenant_id,
            occurred_at: Utc::now(),
            payload,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Kind-specific event data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    OrderCreated(OrderCreatedData),
    OrderItemsChanged(OrderItemsChangedData),
    OrderStatusChanged(OrderStatusChangedData),
    OrderShipped(OrderShippedData),
    OrderCompleted(OrderCompletedData),

    LogisticsOrderCreated(LogisticsOrderCreatedData),
    LogisticsStatusChanged(LogisticsStatusChangedData),
    LabelGenerated(LabelGeneratedData),
    LogisticsCompleted(LogisticsCompletedData),

    WarehouseCreated(WarehouseCreatedData),
    InventoryMovement(InventoryMovementData),
    InventoryShortage(InventoryShortageData),
    InventoryCounted(InventoryCountedData),

    PurchaseOrderCreated(PurchaseOrderCreatedData),
    PurchaseOrderStatusChanged(PurchaseOrderStatusChangedData),

    TransactionCreated(TransactionCreatedData),
    TransactionStatusChanged(TransactionStatusChangedData),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::OrderCreated(_) => EventKind::OrderCreated,
            EventPayload::OrderItemsChanged(_) => EventKind::OrderItemsChanged,
            EventPayload::OrderStatusChanged(_) => EventKind::OrderStatusChanged,
            EventPayload::OrderShipped(_) => EventKind::OrderShipped,
            EventPayload::OrderCompleted(_) => EventKind::OrderCompleted,
            EventPayload::LogisticsOrderCreated(_) => EventKind::LogisticsOrderCreated,
            EventPayload::LogisticsStatusChanged(_) => EventKind::LogisticsStatusChanged,
            EventPayload::LabelGenerated(_) => EventKind::LabelGenerated,
            EventPayload::LogisticsCompleted(_) => EventKind::LogisticsCompleted,
            EventPayload::WarehouseCreated(_) => EventKind::WarehouseCreated,
            EventPayload::InventoryMovement(_) => EventKind::InventoryMovement,
            EventPayload::InventoryShortage(_) => EventKind::InventoryShortage,
            EventPayload::InventoryCounted(_) => EventKind::InventoryCounted,
            EventPayload::PurchaseOrderCreated(_) => EventKind::PurchaseOrderCreated,
            EventPayload::PurchaseOrderStatusChanged(_) => EventKind::PurchaseOrderStatusChanged,
            EventPayload::TransactionCreated(_) => EventKind::TransactionCreated,
            EventPayload::TransactionStatusChanged(_) => EventKind::TransactionStatusChanged,
        }
    }
}

/// Discriminant of [`EventPayload`], used to register handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    OrderCreated,
    OrderItemsChanged,
    OrderStatusChanged,
    OrderShipped,
    OrderCompleted,
    LogisticsOrderCreated,
    LogisticsStatusChanged,
    LabelGenerated,
    LogisticsCompleted,
    WarehouseCreated,
    InventoryMovement,
    InventoryShortage,
    InventoryCounted,
    PurchaseOrderCreated,
    PurchaseOrderStatusChanged,
    TransactionCreated,
    TransactionStatusChanged,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::OrderCreated => "OrderCreated",
            EventKind::OrderItemsChanged => "OrderItemsChanged",
            EventKind::OrderStatusChanged => "OrderStatusChanged",
            EventKind::OrderShipped => "OrderShipped",
            EventKind::OrderCompleted => "OrderCompleted",
            EventKind::LogisticsOrderCreated => "LogisticsOrderCreated",
            EventKind::LogisticsStatusChanged => "LogisticsStatusChanged",
            EventKind::LabelGenerated => "LabelGenerated",
            EventKind::LogisticsCompleted => "LogisticsCompleted",
            EventKind::WarehouseCreated => "WarehouseCreated",
            EventKind::InventoryMovement => "InventoryMovement",
            EventKind::InventoryShortage => "InventoryShortage",
            EventKind::InventoryCounted => "InventoryCounted",
            EventKind::PurchaseOrderCreated => "PurchaseOrderCreated",
            EventKind::PurchaseOrderStatusChanged => "PurchaseOrderStatusChanged",
            EventKind::TransactionCreated => "TransactionCreated",
            EventKind::TransactionStatusChanged => "TransactionStatusChanged",
        }
    }

    /// Returns the bounded context that emits events of this kind.
    pub fn context(&self) -> BoundedContext {
        match self {
            EventKind::OrderCreated
            | EventKind::OrderItemsChanged
            | EventKind::OrderStatusChanged
            | EventKind::OrderShipped
            | EventKind::OrderCompleted => BoundedContext::Order,
            EventKind::LogisticsOrderCreated
            | EventKind::LogisticsStatusChanged
            | EventKind::LabelGenerated
            | EventKind::LogisticsCompleted => BoundedContext::Logistics,
            EventKind::WarehouseCreated
            | EventKind::InventoryMovement
            | EventKind::InventoryShortage
            | EventKind::InventoryCounted => BoundedContext::Warehouse,
            EventKind::PurchaseOrderCreated | EventKind::PurchaseOrderStatusChanged => {
                BoundedContext::Purchase
            }
            EventKind::TransactionCreated | EventKind::TransactionStatusChanged => {
                BoundedContext::Finance
            }
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The independently persisted business capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundedContext {
    Order,
    Logistics,
    Warehouse,
    Purchase,
    Finance,
}

impl BoundedContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundedContext::Order => "order",
            BoundedContext::Logistics => "logistics",
            BoundedContext::Warehouse => "warehouse",
            BoundedContext::Purchase => "purchase",
            BoundedContext::Finance => "finance",
        }
    }
}

impl std::fmt::Display for BoundedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
