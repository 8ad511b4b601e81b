use crate::assets::BaselineWeights;
use crate::data::HistoricalDataset;
use crate::error::AllocError;
use crate::pipeline::{AllocationReport, AllocationRequest, FallbackPolicy, run_pipeline};
use crate::risk::{RiskTier, get_risk_profile};
use crate::scenario::MarketScenario;
use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Read-only state shared by every request.
#[derive(Clone)]
struct ServerState {
    dataset: Arc<HistoricalDataset>,
}

#[derive(Clone, Debug, Serialize)]
struct ApiError {
    error: String,
}

#[derive(Debug, Deserialize)]
struct AllocateRequest {
    /// Raw label; anything other than "Low" or "Medium" selects High.
    risk: String,
    scenario: Option<MarketScenario>,
    /// Overrides the scenario's multiplier when present.
    multiplier: Option<f64>,
    amount: Option<f64>,
    fallback: Option<FallbackPolicy>,
}

#[derive(Debug, Serialize)]
struct AllocateResponse {
    generated_at: String,
    report: AllocationReport,
}

pub async fn run_server(port: u16, dataset: HistoricalDataset) -> Result<()> {
    let app = router(ServerState {
        dataset: Arc::new(dataset),
    });

    let addr = format!("0.0.0.0:{}", port);
    info!("Allocation service listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/profiles", get(profiles))
        .route("/api/allocate", post(allocate))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn profiles() -> Json<BTreeMap<&'static str, BaselineWeights>> {
    Json(
        RiskTier::ALL
            .into_iter()
            .map(|tier| (tier.as_str(), get_risk_profile(tier)))
            .collect(),
    )
}

async fn allocate(
    State(state): State<ServerState>,
    Json(req): Json<AllocateRequest>,
) -> Result<Json<AllocateResponse>, (StatusCode, Json<ApiError>)> {
    let multiplier = req
        .multiplier
        .unwrap_or_else(|| req.scenario.unwrap_or_default().multiplier());
    if !multiplier.is_finite() {
        return Err(api_err(StatusCode::BAD_REQUEST, "multiplier must be finite"));
    }
    if let Some(amount) = req.amount {
        if !amount.is_finite() || amount < 0.0 {
            return Err(api_err(
                StatusCode::BAD_REQUEST,
                "amount must be a finite, non-negative number",
            ));
        }
    }

    let request = AllocationRequest {
        tier: RiskTier::from_label(&req.risk),
        multiplier,
        investment_amount: req.amount,
        fallback: req.fallback.unwrap_or_default(),
    };

    let report = run_pipeline(&state.dataset, &request).map_err(|err| match err {
        e @ AllocError::DivisionUndefined => {
            warn!("Allocation undefined for tier {}", request.tier);
            api_err(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
        }
        e @ AllocError::InvalidMultiplier(_) => api_err(StatusCode::BAD_REQUEST, &e.to_string()),
        other => internal_err(other),
    })?;

    Ok(Json(AllocateResponse {
        generated_at: chrono::Local::now().to_rfc3339(),
        report,
    }))
}

fn api_err(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: message.to_string(),
        }),
    )
}

fn internal_err<E: std::fmt::Display>(err: E) -> (StatusCode, Json<ApiError>) {
    api_err(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Asset;

    fn state(csv: &str) -> ServerState {
        ServerState {
            dataset: Arc::new(HistoricalDataset::from_reader(csv.as_bytes()).unwrap()),
        }
    }

    const TREND: &str = "Year,Equity,Bonds,Gold,Cash\n2020,0.10,0.05,0.08,0.02\n2021,0.12,0.04,0.07,0.02\n2022,0.14,0.03,0.06,0.02\n";
    const FLAT: &str = "Year,Equity,Bonds,Gold,Cash\n2020,0,0,0,0\n2021,0,0,0,0\n";

    fn body(json: serde_json::Value) -> Json<AllocateRequest> {
        Json(serde_json::from_value(json).unwrap())
    }

    #[tokio::test]
    async fn test_allocate_with_scenario_and_amount() {
        let res = allocate(
            State(state(TREND)),
            body(serde_json::json!({ "risk": "Low", "scenario": "bear", "amount": 10000.0 })),
        )
        .await
        .unwrap();

        let report = &res.0.report;
        assert_eq!(report.tier, RiskTier::Low);
        assert_eq!(report.multiplier, 0.85);
        assert!((report.adjusted_returns[Asset::Equity] - 0.136).abs() < 1e-9);
        assert!(report.amounts.is_some());
    }

    #[tokio::test]
    async fn test_unrecognized_risk_label_uses_high() {
        let res = allocate(State(state(TREND)), body(serde_json::json!({ "risk": "Medium " })))
            .await
            .unwrap();
        assert_eq!(res.0.report.tier, RiskTier::High);
        assert_eq!(res.0.report.baseline_weights, get_risk_profile(RiskTier::High));
    }

    #[tokio::test]
    async fn test_undefined_blend_maps_to_422() {
        let err = allocate(State(state(FLAT)), body(serde_json::json!({ "risk": "Low" })))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);

        let ok = allocate(
            State(state(FLAT)),
            body(serde_json::json!({ "risk": "Low", "fallback": "equal-weight" })),
        )
        .await
        .unwrap();
        assert_eq!(ok.0.report.fallback_applied, Some(FallbackPolicy::EqualWeight));
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected() {
        let err = allocate(
            State(state(TREND)),
            body(serde_json::json!({ "risk": "Low", "amount": -5.0 })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_finite_multiplier_is_bad_request() {
        // JSON has no NaN literal; build the request directly.
        let req = AllocateRequest {
            risk: "Low".to_string(),
            scenario: None,
            multiplier: Some(f64::NAN),
            amount: None,
            fallback: Some(FallbackPolicy::EqualWeight),
        };
        let err = allocate(State(state(TREND)), Json(req)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_data_errors_map_to_500() {
        let err = allocate(
            State(state("Year,Equity,Bonds,Gold,Cash\n2020,0.1,0.1,0.1,0.1\n")),
            body(serde_json::json!({ "risk": "High" })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_profiles_lists_every_tier() {
        let Json(table) = profiles().await;
        assert_eq!(table.len(), 3);
        assert_eq!(table["Medium"], get_risk_profile(RiskTier::Medium));
    }
}
