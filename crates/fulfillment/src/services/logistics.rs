use std::collections::HashMap;
use std::sync::Arc;

use common::{AggregateId, TenantId};
use domain::{
    DomainError, LogisticsChannel, LogisticsError, LogisticsOrder, LogisticsStatus, Money, Parcel,
};
use messaging::EventPublisher;
use repository::SharedRepository;

use super::UnitOfWork;
use crate::engine::DEFAULT_CHANNEL;

/// Channels shipments can be booked on, keyed by channel id.
#[derive(Debug, Clone)]
pub struct ChannelCatalog {
    channels: HashMap<String, LogisticsChannel>,
}

impl ChannelCatalog {
    pub fn new(channels: impl IntoIterator<Item = LogisticsChannel>) -> Self {
        Self {
            channels: channels
                .into_iter()
                .map(|channel| (channel.channel_id().to_string(), channel))
                .collect(),
        }
    }

    pub fn get(&self, channel_id: &str) -> Option<&LogisticsChannel> {
        self.channels.get(channel_id)
    }

    /// Prices `parcel` on `channel_id`.
    pub fn quote(&self, channel_id: &str, parcel: &Parcel) -> Result<Money, LogisticsError> {
        self.get(channel_id)
            .ok_or_else(|| LogisticsError::UnknownChannel {
                channel_id: channel_id.to_string(),
            })?
            .calculate_fee(parcel)
    }
}

impl Default for ChannelCatalog {
    fn default() -> Self {
        Self::new([LogisticsChannel::standard(DEFAULT_CHANNEL)])
    }
}

/// Service for shipments booked against orders.
#[derive(Clone)]
pub struct LogisticsService {
    work: UnitOfWork<LogisticsOrder>,
    channels: Arc<ChannelCatalog>,
}

impl LogisticsService {
    pub fn new(repository: SharedRepository<LogisticsOrder>, publisher: EventPublisher) -> Self {
        Self {
            work: UnitOfWork::new(repository, publisher),
            channels: Arc::new(ChannelCatalog::default()),
        }
    }

    pub fn with_channels(mut self, channels: ChannelCatalog) -> Self {
        self.channels = Arc::new(channels);
        self
    }

    pub fn channels(&self) -> &ChannelCatalog {
        &self.channels
    }

    /// Books a shipment for an order on `channel_id`, priced for `parcel`.
    #[tracing::instrument(skip(self, parcel))]
    pub async fn create_logistics_order(
        &self,
        tenant_id: TenantId,
        order_id: AggregateId,
        channel_id: &str,
        parcel: &Parcel,
    ) -> Result<LogisticsOrder, DomainError> {
        let fee = self.channels.quote(channel_id, parcel)?;
        let mut logistics = LogisticsOrder::create(tenant_id, order_id, channel_id)?;
        logistics.set_fee(fee)?;
        self.work.commit(&mut logistics).await?;
        tracing::info!(
            logistics_order_id = %logistics.id(),
            tracking_number = logistics.tracking_number(),
            %fee,
            "logistics order created"
        );
        Ok(logistics)
    }

    pub async fn get(&self, id: AggregateId) -> Result<LogisticsOrder, DomainError> {
        self.work.load(id).await
    }

    pub async fn list(&self) -> Result<Vec<LogisticsOrder>, DomainError> {
        self.work.all().await
    }

    /// Every logistics order booked for `order_id`, oldest first.
    pub async fn find_by_order(
        &self,
        order_id: AggregateId,
    ) -> Result<Vec<LogisticsOrder>, DomainError> {
        let mut found: Vec<_> = self
            .work
            .all()
            .await?
            .into_iter()
            .filter(|logistics| logistics.order_id() == order_id)
            .collect();
        found.sort_by_key(LogisticsOrder::created_at);
        Ok(found)
    }

    /// The open logistics order for `order_id`.
    pub async fn active_for_order(
        &self,
        order_id: AggregateId,
    ) -> Result<LogisticsOrder, DomainError> {
        self.find_by_order(order_id)
            .await?
            .into_iter()
            .find(|logistics| !logistics.status().is_terminal())
            .ok_or_else(|| DomainError::NotFound {
                aggregate_type: "LogisticsOrder",
                lookup: format!("order {order_id}"),
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: AggregateId,
        target: LogisticsStatus,
    ) -> Result<LogisticsOrder, DomainError> {
        self.work
            .execute(id, |logistics| logistics.update_status(target))
            .await
    }

    /// Generates the shipping label, returning the label id.
    #[tracing::instrument(skip(self))]
    pub async fn generate_label(&self, id: AggregateId) -> Result<String, DomainError> {
        let mut label_id = String::new();
        self.work
            .execute(id, |logistics| {
                label_id = logistics.generate_label()?;
                Ok::<_, domain::LogisticsError>(())
            })
            .await?;
        Ok(label_id)
    }

    pub async fn cancel(&self, id: AggregateId) -> Result<LogisticsOrder, DomainError> {
        self.work.execute(id, LogisticsOrder::cancel).await
    }

    /// Records the carrier's fee.
    pub async fn set_fee(&self, id: AggregateId, fee: Money) -> Result<LogisticsOrder, DomainError> {
        self.work
            .execute(id, |logistics| logistics.set_fee(fee))
            .await
    }
}
