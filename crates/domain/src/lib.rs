//! Domain layer for the fulfillment engine.
//!
//! This crate provides the aggregates of each bounded context together with
//! the events they record:
//! - [`DomainEvent`] and [`EventPayload`] for facts exchanged between contexts
//! - [`EventBuffer`] and [`HasPendingEvents`] for collecting pending events
//! - Order, LogisticsOrder, Warehouse, PurchaseOrder and FinancialTransaction
//!   aggregates with explicit transition tables

pub mod aggregate;
pub mod buffer;
pub mod error;
pub mod event;
pub mod finance;
pub mod logistics;
pub mod order;
pub mod purchase;
pub mod value_objects;
pub mod warehouse;

pub use aggregate::{Aggregate, HasPendingEvents};
pub use buffer::EventBuffer;
pub use error::DomainError;
pub use event::{BoundedContext, DomainEvent, EventKind, EventPayload};
pub use finance::{
    CreateTransaction, FinanceError, FinancialTransaction, TransactionStatus, TransactionType,
};
pub use logistics::{
    LogisticsChannel, LogisticsError, LogisticsOrder, LogisticsStatus, MeasureRange, Parcel,
    PriceRule,
};
pub use order::{
    CreateOrder, CustomerId, Order, OrderError, OrderItem, OrderStatus, PaymentInfo,
    ShippingAddress,
};
pub use purchase::{PurchaseError, PurchaseOrder, PurchaseOrderItem, PurchaseStatus};
pub use value_objects::{Money, ProductId};
pub use warehouse::{
    InventoryRecord, InventoryStatus, Location, MovementType, Warehouse, WarehouseError,
};
