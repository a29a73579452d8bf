//! Order fulfillment saga constants.

/// The saga type identifier for order fulfillment.
pub const SAGA_TYPE: &str = "OrderFulfillment";

/// Step name: take the order's items out of warehouse stock.
pub const STEP_RESERVE_INVENTORY: &str = "reserve_inventory";

/// Step name: generate the shipping label on the order's logistics order.
pub const STEP_GENERATE_LABEL: &str = "generate_label";

/// Steps in execution order.
pub const STEPS: [&str; 2] = [STEP_RESERVE_INVENTORY, STEP_GENERATE_LABEL];
