use common::{AggregateId, TenantId};
use domain::{CreateTransaction, DomainError, FinancialTransaction, Money, TransactionType};
use messaging::EventPublisher;
use repository::SharedRepository;

use super::UnitOfWork;

/// Reference type of transactions booked for a shipment.
pub const LOGISTICS_ORDER_REFERENCE: &str = "LOGISTICS_ORDER";

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Service for financial transactions.
#[derive(Clone)]
pub struct FinanceService {
    work: UnitOfWork<FinancialTransaction>,
}

impl FinanceService {
    pub fn new(
        repository: SharedRepository<FinancialTransaction>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            work: UnitOfWork::new(repository, publisher),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(reference_id = %cmd.reference_id))]
    pub async fn create_transaction(
        &self,
        cmd: CreateTransaction,
    ) -> Result<FinancialTransaction, DomainError> {
        let mut transaction = FinancialTransaction::create(cmd)?;
        self.work.commit(&mut transaction).await?;
        Ok(transaction)
    }

    /// Books and settles the shipping fee of a delivered logistics order.
    #[tracing::instrument(skip(self))]
    pub async fn settle_logistics(
        &self,
        tenant_id: TenantId,
        logistics_order_id: AggregateId,
        fee: Money,
    ) -> Result<FinancialTransaction, DomainError> {
        let mut transaction = FinancialTransaction::create(CreateTransaction {
            tenant_id,
            transaction_type: TransactionType::Expense,
            amount: fee,
            currency: DEFAULT_CURRENCY.to_string(),
            reference_id: logistics_order_id.to_string(),
            reference_type: LOGISTICS_ORDER_REFERENCE.to_string(),
            description: format!("Logistics fee for {logistics_order_id}"),
        })?;
        transaction.complete()?;
        self.work.commit(&mut transaction).await?;
        tracing::info!(transaction_id = %transaction.id(), %fee, "logistics fee settled");
        Ok(transaction)
    }

    pub async fn get(&self, id: AggregateId) -> Result<FinancialTransaction, DomainError> {
        self.work.load(id).await
    }

    pub async fn list(&self) -> Result<Vec<FinancialTransaction>, DomainError> {
        self.work.all().await
    }

    /// Transactions booked against one business document.
    pub async fn find_by_reference(
        &self,
        reference_id: &str,
    ) -> Result<Vec<FinancialTransaction>, DomainError> {
        Ok(self
            .work
            .all()
            .await?
            .into_iter()
            .filter(|t| t.reference_id() == reference_id)
            .collect())
    }

    pub async fn complete(&self, id: AggregateId) -> Result<FinancialTransaction, DomainError> {
        self.work.execute(id, FinancialTransaction::complete).await
    }

    pub async fn fail(
        &self,
        id: AggregateId,
        reason: &str,
    ) -> Result<FinancialTransaction, DomainError> {
        self.work
            .execute(id, |transaction| transaction.fail(reason))
            .await
    }

    pub async fn cancel(&self, id: AggregateId) -> Result<FinancialTransaction, DomainError> {
        self.work.execute(id, FinancialTransaction::cancel).await
    }
}
