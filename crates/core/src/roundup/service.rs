//! Round-up service: calculation plus audit recording.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};
use untether_shared::types::{Page, RoundupId, UserId};

use super::calculator::RoundupCalculator;
use super::error::{RepositoryError, RoundupError, RoundupServiceError};
use super::policy::RoundupPolicy;
use super::summary::{MAX_SUMMARY_DAYS, add_roundup, period_start, summarize};
use super::types::{
    BatchItemResult, BatchRoundupInput, BatchRoundupResult, RoundupReceipt, RoundupRecord,
    RoundupRequest, RoundupResult, RoundupStatus, RoundupSummary,
};

/// Repository trait for round-up record persistence.
///
/// Records are insert-only apart from explicit deletion by their owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoundupRepository: Send + Sync {
    /// Store one record.
    async fn insert(&self, record: RoundupRecord) -> Result<(), RepositoryError>;

    /// Store several records; either all are stored or none.
    async fn insert_many(&self, records: Vec<RoundupRecord>) -> Result<(), RepositoryError>;

    /// List a user's records, newest first.
    async fn list_by_user(
        &self,
        user_id: UserId,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RoundupRecord>, RepositoryError>;

    /// List a user's records created within `[from, to]`.
    async fn list_by_user_between(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RoundupRecord>, RepositoryError>;

    /// Delete a record owned by `user_id`. Returns false if there was none.
    async fn delete(&self, id: RoundupId, user_id: UserId) -> Result<bool, RepositoryError>;
}

/// Round-up service shared by all request handlers.
#[derive(Clone)]
pub struct RoundupService {
    repo: Arc<dyn RoundupRepository>,
}

impl RoundupService {
    /// Create a new round-up service.
    #[must_use]
    pub fn new(repo: Arc<dyn RoundupRepository>) -> Self {
        Self { repo }
    }

    /// Compute a round-up and store it as a `calculated` audit record.
    ///
    /// Nothing is stored when validation fails. When storing fails the
    /// computed result is discarded and the failure is returned as-is.
    pub async fn calculate_and_record(
        &self,
        user_id: Option<UserId>,
        transaction_id: Option<String>,
        request: &RoundupRequest,
    ) -> Result<RoundupResult, RoundupServiceError> {
        let (policy, result) = compute(
            request.amount,
            &request.rounding_rule,
            request.custom_rounding_amount,
        )?;

        let record = new_record(
            user_id,
            transaction_id,
            policy,
            &result,
            RoundupStatus::Calculated,
        );
        let roundup_id = record.id;

        self.repo.insert(record).await.inspect_err(|e| {
            error!(error = %e, %roundup_id, "Failed to store round-up calculation");
        })?;

        info!(
            %roundup_id,
            rule = %result.rounding_rule_used,
            amount = %result.original_amount,
            roundup = %result.roundup_amount,
            "Round-up calculated"
        );

        Ok(result)
    }

    /// Round a user's transaction up to the next dollar and earmark the
    /// spare change as a `pending` record.
    pub async fn roundup_transaction(
        &self,
        user_id: UserId,
        transaction_amount: Decimal,
    ) -> Result<RoundupReceipt, RoundupServiceError> {
        let result = RoundupCalculator::apply(transaction_amount, RoundupPolicy::Dollar)
            .inspect_err(|e| warn!(error = %e, %user_id, "Rejected transaction round-up"))?;

        let record = new_record(
            Some(user_id),
            None,
            RoundupPolicy::Dollar,
            &result,
            RoundupStatus::Pending,
        );
        let receipt = RoundupReceipt {
            roundup_id: record.id,
            amount_rounded: record.roundup_amount,
        };

        self.repo.insert(record).await.inspect_err(|e| {
            error!(error = %e, %user_id, "Failed to store pending round-up");
        })?;

        info!(
            roundup_id = %receipt.roundup_id,
            %user_id,
            amount_rounded = %receipt.amount_rounded,
            "Pending round-up recorded"
        );

        Ok(receipt)
    }

    /// Round up many transactions under one rule.
    ///
    /// The rule is validated before any transaction is looked at. Transactions
    /// with a zero or negative amount are skipped. All records are stored in
    /// one `insert_many` call.
    pub async fn batch_calculate(
        &self,
        user_id: Option<UserId>,
        input: &BatchRoundupInput,
    ) -> Result<BatchRoundupResult, RoundupServiceError> {
        if input.transactions.is_empty() {
            return Err(RoundupServiceError::InvalidQuery(
                "at least one transaction is required".to_string(),
            ));
        }

        let policy = RoundupPolicy::parse(&input.rounding_rule, input.custom_rounding_amount)
            .inspect_err(|e| warn!(error = %e, "Rejected batch round-up"))?;

        let mut records = Vec::with_capacity(input.transactions.len());
        let mut results = Vec::with_capacity(input.transactions.len());
        let mut total_roundup = Decimal::ZERO;

        for transaction in &input.transactions {
            if transaction.amount <= Decimal::ZERO {
                debug!(transaction_id = ?transaction.id, "Skipping non-positive amount");
                continue;
            }

            let result = RoundupCalculator::apply(transaction.amount, policy)?;
            total_roundup = add_roundup(total_roundup, result.roundup_amount)
                .inspect_err(|e| warn!(error = %e, "Rejected batch round-up"))?;

            results.push(BatchItemResult {
                transaction_id: transaction.id.clone(),
                original_amount: result.original_amount,
                rounded_amount: result.rounded_amount,
                roundup_amount: result.roundup_amount,
            });
            records.push(new_record(
                user_id,
                transaction.id.clone(),
                policy,
                &result,
                RoundupStatus::Calculated,
            ));
        }

        if !records.is_empty() {
            self.repo.insert_many(records).await.inspect_err(|e| {
                error!(error = %e, "Failed to store batch round-ups");
            })?;
        }

        info!(
            processed = results.len(),
            skipped = input.transactions.len() - results.len(),
            rule = %policy,
            %total_roundup,
            "Batch round-up calculated"
        );

        Ok(BatchRoundupResult {
            processed_transactions: results.len(),
            total_roundup,
            results,
        })
    }

    /// A page of the user's recorded calculations, newest first.
    pub async fn history(
        &self,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<RoundupRecord>, RoundupServiceError> {
        Ok(self
            .repo
            .list_by_user(user_id, page.limit, page.offset)
            .await?)
    }

    /// Totals over the trailing `days` days.
    pub async fn summary(
        &self,
        user_id: UserId,
        days: i64,
    ) -> Result<RoundupSummary, RoundupServiceError> {
        if !(1..=MAX_SUMMARY_DAYS).contains(&days) {
            return Err(RoundupServiceError::InvalidQuery(format!(
                "days must be between 1 and {MAX_SUMMARY_DAYS}, got {days}"
            )));
        }

        let now = Utc::now();
        let records = self
            .repo
            .list_by_user_between(user_id, period_start(now, days), now)
            .await?;

        Ok(summarize(&records, days, now)
            .inspect_err(|e| warn!(error = %e, %user_id, "Summary totals out of range"))?)
    }

    /// Delete one of the user's recorded calculations.
    pub async fn delete(
        &self,
        user_id: UserId,
        roundup_id: RoundupId,
    ) -> Result<(), RoundupServiceError> {
        if self.repo.delete(roundup_id, user_id).await? {
            info!(%roundup_id, %user_id, "Round-up calculation deleted");
            Ok(())
        } else {
            Err(RoundupServiceError::NotFound(roundup_id))
        }
    }
}

fn compute(
    amount: Decimal,
    rounding_rule: &str,
    custom_increment: Option<Decimal>,
) -> Result<(RoundupPolicy, RoundupResult), RoundupError> {
    let outcome = RoundupPolicy::parse(rounding_rule, custom_increment)
        .and_then(|policy| Ok((policy, RoundupCalculator::apply(amount, policy)?)));

    if let Err(e) = &outcome {
        warn!(error = %e, rule = rounding_rule, "Rejected round-up request");
    }
    outcome
}

fn new_record(
    user_id: Option<UserId>,
    transaction_id: Option<String>,
    policy: RoundupPolicy,
    result: &RoundupResult,
    status: RoundupStatus,
) -> RoundupRecord {
    RoundupRecord {
        id: RoundupId::new(),
        user_id,
        transaction_id,
        amount: result.original_amount,
        rounding_rule: result.rounding_rule_used.clone(),
        custom_rounding_amount: policy.custom_increment(),
        rounded_amount: result.rounded_amount,
        roundup_amount: result.roundup_amount,
        status,
        created_at: Utc::now(),
    }
}
