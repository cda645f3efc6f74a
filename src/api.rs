//! HTTP surface: DTOs, handlers and the router.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::category::{self, FactorStats, FactorView};
use crate::charts::{self, ChartBundle, TerrainSurface};
use crate::config::Config;
use crate::error::ApiError;
use crate::feasibility::{self, ActionPlan, FeasibilityResult};
use crate::image::ImageHeuristicsProvider;
use crate::notify::{self, SmsClient, SmsError};
use crate::risk::{self, ImageHeuristics, RiskInput, RiskResult, RockProfile, ROCK_CATALOG};
use crate::terrain;

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Shared, read-only service state.
pub struct AppState {
    pub config: Config,
    /// Alert client, or why alerts are off.
    pub sms: Result<SmsClient, SmsError>,
    pub images: Arc<dyn ImageHeuristicsProvider>,
}

impl AppState {
    pub fn new(config: Config, images: Arc<dyn ImageHeuristicsProvider>) -> Self {
        let sms = SmsClient::from_settings(&config.sms);
        match &sms {
            Ok(client) => tracing::info!(from = %client.from_number(), "SMS alerts ready"),
            Err(e) => tracing::warn!(error = %e, "SMS alerts disabled"),
        }
        Self { config, sms, images }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // Allows a local HTML dashboard to talk to this API
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/rock-types", get(rock_types))
        .route("/assess", post(assess))
        .route("/charts", post(charts))
        .route("/terrain", post(terrain_map))
        .route(
            "/image/analyze",
            post(analyze_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .layer(cors)
        .with_state(state)
}

// --- API DTOs ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyRequest {
    #[serde(default)]
    pub enabled: bool,
    /// E.164; falls back to the configured default recipient.
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    #[serde(flatten)]
    pub input: RiskInput,
    #[serde(default)]
    pub notify: Option<NotifyRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Disabled,
    Sent { to: String },
    MissingRecipient,
    Unavailable { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub input: RiskInput,
    pub risk: RiskResult,
    pub feasibility: FeasibilityResult,
    pub factors: Vec<FactorView>,
    pub stats: FactorStats,
    pub actions: ActionPlan,
    pub notification: NotificationOutcome,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub risk: RiskResult,
    pub charts: ChartBundle,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TerrainRequest {
    #[serde(default)]
    pub image_heuristics: Option<ImageHeuristics>,
}

// --- Handlers ---

pub async fn rock_types() -> Json<Vec<RockProfile>> {
    Json(ROCK_CATALOG.to_vec())
}

pub async fn assess(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request.input.clamped();

    let result = risk::score(&input);
    let verdict = feasibility::classify(result.tier, result.score, result.confidence);
    tracing::info!(
        score = result.score,
        tier = %result.tier,
        confidence = result.confidence,
        mining = %verdict.status,
        "Assessed rockfall risk"
    );

    let notification = dispatch_alert(&state, request.notify, &result, &verdict).await;

    Ok(Json(AssessmentResponse {
        factors: category::factor_views(&result.contributions),
        stats: category::factor_stats(&result.contributions),
        actions: feasibility::action_plan(result.tier),
        input,
        risk: result,
        feasibility: verdict,
        notification,
    }))
}

async fn dispatch_alert(
    state: &AppState,
    notify: Option<NotifyRequest>,
    result: &RiskResult,
    verdict: &FeasibilityResult,
) -> NotificationOutcome {
    let Some(request) = notify.filter(|n| n.enabled) else {
        return NotificationOutcome::Disabled;
    };

    let recipient = request
        .to
        .or_else(|| state.config.sms.default_recipient.clone())
        .map(|to| to.trim().to_string())
        .filter(|to| !to.is_empty());
    let Some(to) = recipient else {
        tracing::warn!("SMS alerts enabled, but no recipient number provided");
        return NotificationOutcome::MissingRecipient;
    };

    let client = match &state.sms {
        Ok(client) => client,
        Err(e) => {
            return NotificationOutcome::Unavailable {
                reason: e.to_string(),
            };
        }
    };

    let message = notify::precaution_message(result.tier, result.score, verdict.status);
    match client.send(&to, &message).await {
        Ok(()) => NotificationOutcome::Sent { to },
        Err(e) => {
            tracing::warn!(to = %to, error = %e, "Failed to send SMS alert");
            NotificationOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

pub async fn charts(
    payload: Result<Json<AssessmentRequest>, JsonRejection>,
) -> Result<Json<ChartsResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request.input.clamped();
    let result = risk::score(&input);

    let mut rng = ChaCha8Rng::from_entropy();
    let charts = charts::bundle(&input, &result, &mut rng);

    Ok(Json(ChartsResponse {
        risk: result,
        charts,
    }))
}

pub async fn terrain_map(
    payload: Result<Json<TerrainRequest>, JsonRejection>,
) -> Result<Json<TerrainSurface>, ApiError> {
    let Json(request) = payload?;
    let supplied = request
        .image_heuristics
        .map(ImageHeuristics::clamped)
        .filter(|h| !h.is_empty());

    let heuristics = supplied.unwrap_or(terrain::NEUTRAL_HEURISTICS);
    let field = terrain::generate(&heuristics);
    tracing::debug!(
        seed = field.params.seed(),
        from_image = supplied.is_some(),
        "Generated terrain"
    );

    Ok(Json(charts::terrain_surface(&field, supplied.is_some())))
}

pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ImageHeuristics>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::EmptyImage);
    }
    Ok(Json(state.images.analyze(&body)))
}
