//! Wiring of repositories, services, policies and the broker.

use std::sync::Arc;

use domain::{
    FinancialTransaction, LogisticsChannel, LogisticsOrder, Order, PurchaseOrder, Warehouse,
};
use messaging::topics::SUBSCRIPTIONS;
use messaging::{
    BridgeHandle, BrokerBridge, Dispatcher, EventHandler, EventPublisher, IdempotencyPolicy,
    InMemoryBroker, MessageBroker,
};
use repository::InMemoryRepository;

use crate::aggregate::SagaInstance;
use crate::coordinator::FulfillmentCoordinator;
use crate::handlers::{
    CreateLogisticsOnOrderCreated, ReplenishOnShortage, SettleLogisticsOnCompleted,
    StartFulfillmentOnOrderConfirmed,
};
use crate::services::{
    ChannelCatalog, FinanceService, LogisticsService, OrderService, PurchaseService, SupplierConfig,
    WarehouseService,
};
use crate::steps::{LogisticsShipping, WarehouseInventory};

pub const DEFAULT_CHANNEL: &str = "DEFAULT_CHANNEL";
pub const DEFAULT_WAREHOUSE_CODE: &str = "WH-DEFAULT";

/// Coordinator driving the real warehouse and logistics services.
pub type EngineCoordinator = FulfillmentCoordinator<WarehouseInventory, LogisticsShipping>;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Suppress repeated delivery of an event to the same handler.
    pub idempotency_enabled: bool,
    /// Forward published events to the in-memory broker.
    pub broker_enabled: bool,
    /// Channel new logistics orders are booked on.
    pub default_channel: String,
    pub supplier: SupplierConfig,
    /// Warehouse the fulfillment saga reserves from.
    pub default_warehouse_code: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idempotency_enabled: true,
            broker_enabled: true,
            default_channel: DEFAULT_CHANNEL.to_string(),
            supplier: SupplierConfig::default(),
            default_warehouse_code: DEFAULT_WAREHOUSE_CODE.to_string(),
        }
    }
}

/// The wired consistency engine.
///
/// Every aggregate type gets its own in-memory repository. The four
/// cross-context policies are registered on one dispatcher; with a broker
/// enabled, [`start_bridge`](Self::start_bridge) also feeds them from the
/// broker's consumer groups.
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    dispatcher: Arc<Dispatcher>,
    broker: Option<Arc<InMemoryBroker>>,
    orders: OrderService,
    logistics: LogisticsService,
    warehouses: WarehouseService,
    purchases: PurchaseService,
    finance: FinanceService,
    coordinator: Arc<EngineCoordinator>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(IdempotencyPolicy::from_flag(
            config.idempotency_enabled,
        )));
        let broker = config.broker_enabled.then(|| Arc::new(InMemoryBroker::new()));

        let mut publisher = EventPublisher::new(Arc::clone(&dispatcher));
        if let Some(broker) = &broker {
            publisher = publisher.with_broker(Arc::clone(broker) as Arc<dyn MessageBroker>);
        }

        let orders = OrderService::new(
            Arc::new(InMemoryRepository::<Order>::new()),
            publisher.clone(),
        );
        let logistics = LogisticsService::new(
            Arc::new(InMemoryRepository::<LogisticsOrder>::new()),
            publisher.clone(),
        )
        .with_channels(ChannelCatalog::new([LogisticsChannel::standard(
            config.default_channel.as_str(),
        )]));
        let warehouses = WarehouseService::new(
            Arc::new(InMemoryRepository::<Warehouse>::new()),
            publisher.clone(),
        );
        let purchases = PurchaseService::new(
            Arc::new(InMemoryRepository::<PurchaseOrder>::new()),
            publisher.clone(),
            config.supplier.clone(),
        );
        let finance = FinanceService::new(
            Arc::new(InMemoryRepository::<FinancialTransaction>::new()),
            publisher,
        );

        let coordinator = Arc::new(FulfillmentCoordinator::new(
            Arc::new(InMemoryRepository::<SagaInstance>::new()),
            orders.clone(),
            WarehouseInventory::new(warehouses.clone(), config.default_warehouse_code.as_str()),
            LogisticsShipping::new(logistics.clone()),
        ));

        let engine = Self {
            config,
            dispatcher,
            broker,
            orders,
            logistics,
            warehouses,
            purchases,
            finance,
            coordinator,
        };
        engine.register_policies();
        tracing::info!(
            idempotency = engine.config.idempotency_enabled,
            broker = engine.config.broker_enabled,
            "engine wired"
        );
        engine
    }

    fn register_policies(&self) {
        let policies: [(_, Arc<dyn EventHandler>); 4] = [
            (
                CreateLogisticsOnOrderCreated::KIND,
                Arc::new(CreateLogisticsOnOrderCreated::new(
                    self.logistics.clone(),
                    self.config.default_channel.as_str(),
                )),
            ),
            (
                StartFulfillmentOnOrderConfirmed::<WarehouseInventory, LogisticsShipping>::KIND,
                Arc::new(StartFulfillmentOnOrderConfirmed::new(Arc::clone(
                    &self.coordinator,
                ))),
            ),
            (
                SettleLogisticsOnCompleted::KIND,
                Arc::new(SettleLogisticsOnCompleted::new(self.finance.clone())),
            ),
            (
                ReplenishOnShortage::KIND,
                Arc::new(ReplenishOnShortage::new(self.purchases.clone())),
            ),
        ];
        for (kind, handler) in policies {
            self.dispatcher.register(kind, handler);
        }
    }

    /// Subscribes every consumer group to its topic and starts consuming.
    ///
    /// Returns `None` when the broker is disabled.
    pub async fn start_bridge(&self) -> messaging::Result<Option<BridgeHandle>> {
        let Some(broker) = &self.broker else {
            return Ok(None);
        };
        let mut bridge = BrokerBridge::new(
            Arc::clone(broker) as Arc<dyn MessageBroker>,
            Arc::clone(&self.dispatcher),
        );
        for (topic, group) in SUBSCRIPTIONS {
            bridge.subscribe(topic, group).await?;
        }
        Ok(Some(bridge.start()))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn broker(&self) -> Option<&Arc<InMemoryBroker>> {
        self.broker.as_ref()
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn logistics(&self) -> &LogisticsService {
        &self.logistics
    }

    pub fn warehouses(&self) -> &WarehouseService {
        &self.warehouses
    }

    pub fn purchases(&self) -> &PurchaseService {
        &self.purchases
    }

    pub fn finance(&self) -> &FinanceService {
        &self.finance
    }

    pub fn coordinator(&self) -> &Arc<EngineCoordinator> {
        &self.coordinator
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
