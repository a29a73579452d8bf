//! Application layer of the consistency engine.
//!
//! This crate sequences every use case as mutate, save, then publish, and
//! hosts the cross-context policies that react to the published events.
//!
//! Confirmed orders are fulfilled by a saga with these steps:
//! 1. Reserve inventory
//! 2. Generate the shipping label
//!
//! If a step fails, the steps already taken are compensated in reverse order
//! and the order is cancelled.

pub mod aggregate;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod events;
pub mod handlers;
pub mod order_fulfillment;
pub mod services;
pub mod state;
pub mod steps;

pub use aggregate::SagaInstance;
pub use coordinator::FulfillmentCoordinator;
pub use engine::{DEFAULT_CHANNEL, DEFAULT_WAREHOUSE_CODE, Engine, EngineConfig, EngineCoordinator};
pub use error::SagaError;
pub use events::{Reservation, SagaEvent, ShippingLabel};
pub use handlers::{
    CreateLogisticsOnOrderCreated, ReplenishOnShortage, SettleLogisticsOnCompleted,
    StartFulfillmentOnOrderConfirmed,
};
pub use services::{
    ChannelCatalog, DEFAULT_CURRENCY, FinanceService, LOGISTICS_ORDER_REFERENCE, LogisticsService,
    OrderService, PurchaseService, ReservedItem, SupplierConfig, WarehouseService,
};
pub use state::SagaState;
pub use steps::{InventoryStep, LogisticsShipping, ShippingStep, WarehouseInventory};
