//! Process manager for the order fulfillment saga.

use std::time::Instant;

use common::AggregateId;
use domain::{Aggregate, OrderStatus};
use repository::{RepositoryError, SharedRepository};

use crate::aggregate::SagaInstance;
use crate::error::{Result, SagaError};
use crate::events::SagaEvent;
use crate::order_fulfillment::{STEP_GENERATE_LABEL, STEP_RESERVE_INVENTORY};
use crate::services::{OrderService, ReservedItem};
use crate::state::SagaState;
use crate::steps::{InventoryStep, ShippingStep};

/// Orchestrates the fulfillment of confirmed orders.
///
/// The coordinator drives a 2-step saga (reserve inventory → generate label).
/// When a step fails, the steps already taken are compensated in reverse
/// order and the order is cancelled. The saga instance is saved after every
/// recorded event.
pub struct FulfillmentCoordinator<I, S>
where
    I: InventoryStep,
    S: ShippingStep,
{
    sagas: SharedRepository<SagaInstance>,
    orders: OrderService,
    inventory: I,
    shipping: S,
}

impl<I, S> FulfillmentCoordinator<I, S>
where
    I: InventoryStep,
    S: ShippingStep,
{
    pub fn new(
        sagas: SharedRepository<SagaInstance>,
        orders: OrderService,
        inventory: I,
        shipping: S,
    ) -> Self {
        Self {
            sagas,
            orders,
            inventory,
            shipping,
        }
    }

    /// Runs the fulfillment saga for a confirmed order.
    ///
    /// Returns the finished saga; a compensated run is `Ok` with the saga in
    /// the `Failed` state. Errors are reserved for orders that cannot start a
    /// saga and for failures to persist it.
    #[tracing::instrument(skip(self), fields(saga_type = "OrderFulfillment"))]
    pub async fn execute(&self, order_id: AggregateId) -> Result<SagaInstance> {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = Instant::now();

        let order = self.orders.get_order(order_id).await.map_err(|err| {
            if err.is_not_found() {
                SagaError::OrderNotFound(order_id)
            } else {
                SagaError::Domain(err)
            }
        })?;

        if order.status() != OrderStatus::Confirmed {
            return Err(SagaError::OrderNotReady(format!(
                "Order is in {} status, expected {}",
                order.status(),
                OrderStatus::Confirmed
            )));
        }
        if order.items().is_empty() {
            return Err(SagaError::OrderNotReady("Order has no items".to_string()));
        }
        let tenant_id = order.tenant_id().clone();
        let items: Vec<ReservedItem> = order
            .items()
            .iter()
            .map(|item| ReservedItem {
                product_id: item.product_id.clone(),
                sku: item.sku.clone(),
                quantity: item.quantity,
            })
            .collect();

        let mut saga = SagaInstance::for_order(order_id);
        if let Err(err) = self
            .record(&mut saga, SagaEvent::started(order_id, tenant_id.clone()))
            .await
        {
            return Err(match err {
                SagaError::Repository(RepositoryError::ConcurrencyConflict { .. }) => {
                    SagaError::AlreadyStarted { order_id }
                }
                other => other,
            });
        }

        // Step 1: reserve inventory
        tracing::info!(step = STEP_RESERVE_INVENTORY, "saga step started");
        self.record(&mut saga, SagaEvent::step_started(STEP_RESERVE_INVENTORY))
            .await?;
        match self.inventory.reserve(&tenant_id, order_id, &items).await {
            Ok(reservation) => {
                self.record(&mut saga, SagaEvent::InventoryReserved(reservation))
                    .await?;
            }
            Err(err) => {
                return self
                    .fail_step(saga, STEP_RESERVE_INVENTORY, err, order_id, saga_start)
                    .await;
            }
        }

        // Step 2: generate the shipping label
        tracing::info!(step = STEP_GENERATE_LABEL, "saga step started");
        self.record(&mut saga, SagaEvent::step_started(STEP_GENERATE_LABEL))
            .await?;
        match self.shipping.generate_label(order_id).await {
            Ok(label) => {
                self.record(&mut saga, SagaEvent::LabelGenerated(label))
                    .await?;
            }
            Err(err) => {
                return self
                    .fail_step(saga, STEP_GENERATE_LABEL, err, order_id, saga_start)
                    .await;
            }
        }

        self.record(&mut saga, SagaEvent::completed()).await?;

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        metrics::counter!("saga_completed").increment(1);
        tracing::info!(saga_id = %saga.id(), %order_id, duration, "saga completed successfully");

        Ok(saga)
    }

    async fn fail_step(
        &self,
        mut saga: SagaInstance,
        step: &str,
        err: SagaError,
        order_id: AggregateId,
        saga_start: Instant,
    ) -> Result<SagaInstance> {
        tracing::warn!(step, error = %err, "saga step failed");
        self.record(&mut saga, SagaEvent::step_failed(step, err.to_string()))
            .await?;
        self.compensate(&mut saga, step, order_id).await?;
        metrics::histogram!("saga_duration_seconds").record(saga_start.elapsed().as_secs_f64());
        Ok(saga)
    }

    /// Undoes the saga's steps in reverse order, then cancels the order.
    ///
    /// A compensation that fails is recorded and the remaining ones still run.
    #[tracing::instrument(skip(self, saga), fields(saga_id = %saga.id()))]
    async fn compensate(
        &self,
        saga: &mut SagaInstance,
        failed_step: &str,
        order_id: AggregateId,
    ) -> Result<()> {
        if !saga.state().can_compensate() {
            return Err(SagaError::InvalidState {
                current: saga.state(),
                target: SagaState::Compensating,
            });
        }
        self.record(saga, SagaEvent::compensation_started(failed_step))
            .await?;

        for step in saga.steps_to_compensate() {
            let outcome = match step.as_str() {
                STEP_GENERATE_LABEL => self.shipping.cancel_shipment(order_id).await,
                STEP_RESERVE_INVENTORY => match saga.reservation().cloned() {
                    Some(reservation) => self.inventory.release(order_id, &reservation).await,
                    // A failed reservation took nothing.
                    None => continue,
                },
                _ => continue,
            };

            let event = match outcome {
                Ok(()) => SagaEvent::step_compensated(&step),
                Err(err) => {
                    tracing::error!(step = %step, error = %err, "compensation step failed");
                    SagaEvent::compensation_failed(&step, err.to_string())
                }
            };
            self.record(saga, event).await?;
        }

        self.orders.cancel(order_id).await?;

        let reason = format!(
            "Step {failed_step} failed: {}",
            saga.failure_reason().unwrap_or("unknown")
        );
        self.record(saga, SagaEvent::failed(reason.clone())).await?;

        metrics::counter!("saga_compensated").increment(1);
        tracing::warn!(saga_id = %saga.id(), %order_id, %reason, "saga compensated");
        Ok(())
    }

    async fn record(&self, saga: &mut SagaInstance, event: SagaEvent) -> Result<()> {
        tracing::debug!(saga_id = %saga.id(), event_type = event.event_type(), "saga event recorded");
        saga.apply(event);
        self.sagas.save(saga).await?;
        Ok(())
    }

    /// Loads a saga instance by ID.
    pub async fn get_saga(&self, saga_id: AggregateId) -> Result<SagaInstance> {
        Ok(self.sagas.find_by_id(saga_id).await?)
    }

    /// Returns the saga started for `order_id`, if any.
    pub async fn find_by_order(&self, order_id: AggregateId) -> Result<Option<SagaInstance>> {
        match self.sagas.find_by_id(order_id).await {
            Ok(saga) => Ok(Some(saga)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
