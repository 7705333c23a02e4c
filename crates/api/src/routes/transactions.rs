//! Round-up calculation routes.
//!
//! `POST /transactions/calculate-roundup` computes and records one round-up;
//! `POST /transactions/batch-calculate` applies one rule to many amounts.

use axum::{Json, Router, extract::State, routing::post};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use untether_core::roundup::{
    BatchItemResult, BatchRoundupInput, BatchRoundupResult, BatchTransaction, RoundupRequest,
    RoundupResult,
};
use untether_shared::types::UserId;

use crate::{AppState, error::ApiError, extractors::JsonBody};

/// Creates the calculation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/calculate-roundup", post(calculate_roundup))
        .route("/transactions/batch-calculate", post(batch_calculate))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a single calculation.
#[derive(Debug, Deserialize)]
pub struct CalculateRoundupRequest {
    /// Transaction amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Rounding rule: `dollar`, `quarter` or `custom` (any case).
    pub rounding_rule: String,
    /// Increment for the `custom` rule.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub custom_rounding_amount: Option<Decimal>,
    /// User to attribute the record to.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Caller's transaction reference.
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// Response for a single calculation.
#[derive(Debug, Serialize)]
pub struct CalculateRoundupResponse {
    /// Echo of the input amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub original_amount: Decimal,
    /// Rounded target amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub rounded_amount: Decimal,
    /// Spare change.
    #[serde(with = "rust_decimal::serde::float")]
    pub roundup_amount: Decimal,
    /// Lower-cased rule that was applied.
    pub rounding_rule_used: String,
}

impl From<RoundupResult> for CalculateRoundupResponse {
    fn from(result: RoundupResult) -> Self {
        Self {
            original_amount: result.original_amount,
            rounded_amount: result.rounded_amount,
            roundup_amount: result.roundup_amount,
            rounding_rule_used: result.rounding_rule_used,
        }
    }
}

/// One transaction in a batch request.
#[derive(Debug, Deserialize)]
pub struct BatchTransactionRequest {
    /// Transaction reference; numbers are accepted and kept as text.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Transaction amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Request body for a batch calculation.
#[derive(Debug, Deserialize)]
pub struct BatchCalculateRequest {
    /// User to attribute the records to.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Transactions to round up.
    pub transactions: Vec<BatchTransactionRequest>,
    /// Rounding rule, `dollar` when omitted.
    #[serde(default = "default_rounding_rule")]
    pub rounding_rule: String,
    /// Increment for the `custom` rule.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub custom_rounding_amount: Option<Decimal>,
}

fn default_rounding_rule() -> String {
    "dollar".to_string()
}

/// Per-transaction batch result.
#[derive(Debug, Serialize)]
pub struct BatchItemResponse {
    /// Transaction reference.
    pub transaction_id: Option<String>,
    /// Original amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub original_amount: Decimal,
    /// Rounded amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub rounded_amount: Decimal,
    /// Spare change.
    #[serde(with = "rust_decimal::serde::float")]
    pub roundup_amount: Decimal,
}

/// Response for a batch calculation.
#[derive(Debug, Serialize)]
pub struct BatchCalculateResponse {
    /// Number of transactions rounded.
    pub processed_transactions: usize,
    /// Sum of round-ups.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_roundup: Decimal,
    /// Individual results.
    pub results: Vec<BatchItemResponse>,
}

impl From<BatchItemResult> for BatchItemResponse {
    fn from(item: BatchItemResult) -> Self {
        Self {
            transaction_id: item.transaction_id,
            original_amount: item.original_amount,
            rounded_amount: item.rounded_amount,
            roundup_amount: item.roundup_amount,
        }
    }
}

impl From<BatchRoundupResult> for BatchCalculateResponse {
    fn from(result: BatchRoundupResult) -> Self {
        Self {
            processed_transactions: result.processed_transactions,
            total_roundup: result.total_roundup,
            results: result.results.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Computes and records a round-up.
async fn calculate_roundup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CalculateRoundupRequest>,
) -> Result<Json<CalculateRoundupResponse>, ApiError> {
    let roundup_request = RoundupRequest {
        amount: request.amount,
        rounding_rule: request.rounding_rule,
        custom_rounding_amount: request.custom_rounding_amount,
    };

    let result = state
        .roundups
        .calculate_and_record(request.user_id, request.transaction_id, &roundup_request)
        .await?;

    Ok(Json(result.into()))
}

/// Computes and records round-ups for several transactions.
async fn batch_calculate(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BatchCalculateRequest>,
) -> Result<Json<BatchCalculateResponse>, ApiError> {
    let input = BatchRoundupInput {
        transactions: request
            .transactions
            .into_iter()
            .map(|t| BatchTransaction {
                id: t.id.and_then(transaction_reference),
                amount: t.amount,
            })
            .collect(),
        rounding_rule: request.rounding_rule,
        custom_rounding_amount: request.custom_rounding_amount,
    };

    let result = state
        .roundups
        .batch_calculate(request.user_id, &input)
        .await?;

    Ok(Json(result.into()))
}

/// Renders a JSON transaction reference as text.
fn transaction_reference(id: serde_json::Value) -> Option<String> {
    match id {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{
        assert_close, failing_app, in_memory_app, send, send_raw,
    };
    use axum::http::StatusCode;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"amount": 4.55, "rounding_rule": "dollar"}), 5.00, 0.45, "dollar")]
    #[case(json!({"amount": 4.55, "rounding_rule": "custom", "custom_rounding_amount": 0.50}), 5.00, 0.45, "custom")]
    #[case(json!({"amount": 10.75, "rounding_rule": "DOLLAR"}), 11.00, 0.25, "dollar")]
    #[case(json!({"amount": 4, "rounding_rule": "Dollar"}), 4.00, 0.00, "dollar")]
    #[case(json!({"amount": 5.10, "rounding_rule": "quarter"}), 5.25, 0.15, "quarter")]
    #[tokio::test]
    async fn test_calculate_roundup(
        #[case] body: serde_json::Value,
        #[case] rounded: f64,
        #[case] roundup: f64,
        #[case] rule: &str,
    ) {
        let (app, _) = in_memory_app();

        let (status, response) = send(app, "POST", "/transactions/calculate-roundup", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_close(&response["rounded_amount"], rounded);
        assert_close(&response["roundup_amount"], roundup);
        assert_eq!(response["rounding_rule_used"], rule);
    }

    #[tokio::test]
    async fn test_calculate_roundup_records_audit_row() {
        let (app, repo) = in_memory_app();

        let (status, response) = send(
            app,
            "POST",
            "/transactions/calculate-roundup",
            json!({"amount": 4.55, "rounding_rule": "dollar", "transaction_id": "tx-9"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_close(&response["original_amount"], 4.55);
        assert_eq!(repo.len(), 1);
    }

    #[rstest]
    #[case(json!({"amount": 4.55, "rounding_rule": "invalid"}), "invalid rounding rule: invalid")]
    #[case(json!({"amount": 4.55, "rounding_rule": "custom", "custom_rounding_amount": 0}), "custom rounding amount must be positive")]
    #[case(json!({"amount": 4.55, "rounding_rule": "custom"}), "custom rounding amount must be positive")]
    #[tokio::test]
    async fn test_calculate_roundup_rejects_invalid_arguments(
        #[case] body: serde_json::Value,
        #[case] message: &str,
    ) {
        let (app, repo) = in_memory_app();

        let (status, response) = send(app, "POST", "/transactions/calculate-roundup", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "VALIDATION_ERROR");
        assert_eq!(response["message"], message);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_calculate_roundup_rejects_negative_amount() {
        let (app, _) = in_memory_app();

        let (status, response) = send(
            app,
            "POST",
            "/transactions/calculate-roundup",
            json!({"amount": -4.55, "rounding_rule": "dollar"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "VALIDATION_ERROR");
    }

    #[rstest]
    #[case("{not json")]
    #[case(r#"{"amount": 4.55, "rounding_rule": 7}"#)]
    #[case(r#"{"rounding_rule": "dollar"}"#)]
    #[tokio::test]
    async fn test_malformed_body_is_rejected(#[case] raw: &str) {
        let (app, repo) = in_memory_app();

        let (status, response) =
            send_raw(app, "POST", "/transactions/calculate-roundup", raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "INVALID_REQUEST");
        assert_eq!(response["message"], "Invalid request body");
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let app = failing_app();

        let (status, response) = send(
            app,
            "POST",
            "/transactions/calculate-roundup",
            json!({"amount": 4.55, "rounding_rule": "dollar"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response["error"], "INTERNAL_ERROR");
        assert_eq!(response["message"], "An error occurred");
        assert!(response.get("roundup_amount").is_none());
    }

    #[tokio::test]
    async fn test_batch_calculate() {
        let (app, repo) = in_memory_app();

        let (status, response) = send(
            app,
            "POST",
            "/transactions/batch-calculate",
            json!({
                "transactions": [
                    {"id": "coffee", "amount": 4.55},
                    {"id": 42, "amount": 10.75},
                    {"id": "refund", "amount": -2.00},
                    {"amount": 0}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["processed_transactions"], 2);
        assert_close(&response["total_roundup"], 0.70);
        assert_eq!(response["results"][0]["transaction_id"], "coffee");
        assert_eq!(response["results"][1]["transaction_id"], "42");
        assert_close(&response["results"][1]["rounded_amount"], 11.0);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_calculate_rejects_invalid_rule() {
        let (app, repo) = in_memory_app();

        let (status, response) = send(
            app,
            "POST",
            "/transactions/batch-calculate",
            json!({"transactions": [{"amount": 1.5}], "rounding_rule": "weekly"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["message"], "invalid rounding rule: weekly");
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_batch_total_out_of_range_is_rejected() {
        let (app, repo) = in_memory_app();

        let (status, response) = send(
            app,
            "POST",
            "/transactions/batch-calculate",
            json!({
                "transactions": [{"amount": 1}, {"amount": 1}],
                "rounding_rule": "custom",
                "custom_rounding_amount": 5e28
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "VALIDATION_ERROR");
        assert_eq!(
            response["message"],
            "invalid amount: round-up total is out of range"
        );
        assert!(repo.is_empty());
    }

    #[test]
    fn test_transaction_reference() {
        assert_eq!(transaction_reference(json!("abc")), Some("abc".to_string()));
        assert_eq!(transaction_reference(json!(7)), Some("7".to_string()));
        assert_eq!(transaction_reference(serde_json::Value::Null), None);
    }
}
