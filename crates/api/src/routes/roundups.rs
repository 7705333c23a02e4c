//! Per-user round-up routes.
//!
//! Records a user's transaction round-up and serves history, summary and
//! deletion of their recorded calculations.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use untether_core::roundup::{RoundupReceipt, RoundupRecord, RoundupStatus, RoundupSummary};
use untether_shared::types::{PageRequest, RoundupId, UserId};

use crate::{
    AppState,
    error::ApiError,
    extractors::{JsonBody, PathParams, QueryParams},
};

/// Creates the per-user round-up routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/roundups",
            get(list_roundups).post(create_roundup),
        )
        .route("/users/{user_id}/roundups/summary", get(roundup_summary))
        .route(
            "/users/{user_id}/roundups/{roundup_id}",
            delete(delete_roundup),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for rounding up a user's transaction.
#[derive(Debug, Deserialize)]
pub struct CreateRoundupRequest {
    /// Purchase amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub transaction_amount: Decimal,
}

/// Receipt for a pending round-up.
#[derive(Debug, Serialize)]
pub struct CreateRoundupResponse {
    /// ID of the stored record.
    pub roundup_id: RoundupId,
    /// Spare change set aside.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_rounded: Decimal,
}

impl From<RoundupReceipt> for CreateRoundupResponse {
    fn from(receipt: RoundupReceipt) -> Self {
        Self {
            roundup_id: receipt.roundup_id,
            amount_rounded: receipt.amount_rounded,
        }
    }
}

/// Recorded calculation as returned by the history endpoint.
#[derive(Debug, Serialize)]
pub struct RoundupRecordResponse {
    /// Record ID.
    pub id: RoundupId,
    /// Owning user.
    pub user_id: Option<UserId>,
    /// Caller's transaction reference.
    pub transaction_id: Option<String>,
    /// Original amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Rule that was applied.
    pub rounding_rule: String,
    /// Increment for the `custom` rule.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub custom_rounding_amount: Option<Decimal>,
    /// Rounded amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub rounded_amount: Decimal,
    /// Spare change.
    #[serde(with = "rust_decimal::serde::float")]
    pub roundup_amount: Decimal,
    /// Record status.
    pub status: RoundupStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<RoundupRecord> for RoundupRecordResponse {
    fn from(record: RoundupRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            transaction_id: record.transaction_id,
            amount: record.amount,
            rounding_rule: record.rounding_rule,
            custom_rounding_amount: record.custom_rounding_amount,
            rounded_amount: record.rounded_amount,
            roundup_amount: record.roundup_amount,
            status: record.status,
            created_at: record.created_at,
        }
    }
}

/// Summary query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Trailing period in days.
    pub days: Option<i64>,
}

/// Count and total for one rounding rule.
#[derive(Debug, Serialize)]
pub struct RuleStatsResponse {
    /// Number of calculations.
    pub count: u64,
    /// Sum of round-ups.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Round-up summary over a trailing period.
#[derive(Debug, Serialize)]
pub struct RoundupSummaryResponse {
    /// Period length in days.
    pub period_days: i64,
    /// Sum of round-ups.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_roundup: Decimal,
    /// Number of calculations.
    pub total_transactions: u64,
    /// Mean round-up.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_roundup: Decimal,
    /// Stats keyed by rule name.
    pub rounding_rule_stats: BTreeMap<String, RuleStatsResponse>,
    /// Period start.
    pub start_date: DateTime<Utc>,
    /// Period end.
    pub end_date: DateTime<Utc>,
}

impl From<RoundupSummary> for RoundupSummaryResponse {
    fn from(summary: RoundupSummary) -> Self {
        Self {
            period_days: summary.period_days,
            total_roundup: summary.total_roundup,
            total_transactions: summary.total_transactions,
            average_roundup: summary.average_roundup,
            rounding_rule_stats: summary
                .rounding_rule_stats
                .into_iter()
                .map(|(rule, stats)| {
                    (
                        rule,
                        RuleStatsResponse {
                            count: stats.count,
                            total: stats.total,
                        },
                    )
                })
                .collect(),
            start_date: summary.start_date,
            end_date: summary.end_date,
        }
    }
}

/// Deletion acknowledgement.
#[derive(Debug, Serialize)]
pub struct DeleteRoundupResponse {
    /// Always true; failures are returned as errors.
    pub success: bool,
    /// Confirmation text.
    pub message: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// Rounds up a user's transaction to the next dollar as a pending saving.
async fn create_roundup(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<UserId>,
    JsonBody(request): JsonBody<CreateRoundupRequest>,
) -> Result<(StatusCode, Json<CreateRoundupResponse>), ApiError> {
    let receipt = state
        .roundups
        .roundup_transaction(user_id, request.transaction_amount)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt.into())))
}

/// Lists a user's recorded calculations, newest first.
async fn list_roundups(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<UserId>,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<Json<Vec<RoundupRecordResponse>>, ApiError> {
    let cfg = &state.roundup_config;
    let page = page.resolve(cfg.history_default_limit, cfg.history_max_limit);

    let records = state.roundups.history(user_id, page).await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Summarizes a user's round-ups over the trailing period.
async fn roundup_summary(
    State(state): State<AppState>,
    PathParams(user_id): PathParams<UserId>,
    QueryParams(query): QueryParams<SummaryQuery>,
) -> Result<Json<RoundupSummaryResponse>, ApiError> {
    let days = query
        .days
        .unwrap_or(state.roundup_config.summary_default_days);

    let summary = state.roundups.summary(user_id, days).await?;

    Ok(Json(summary.into()))
}

/// Deletes one of the user's recorded calculations.
async fn delete_roundup(
    State(state): State<AppState>,
    PathParams((user_id, roundup_id)): PathParams<(UserId, RoundupId)>,
) -> Result<Json<DeleteRoundupResponse>, ApiError> {
    state.roundups.delete(user_id, roundup_id).await?;

    Ok(Json(DeleteRoundupResponse {
        success: true,
        message: "Calculation deleted",
    }))
}
