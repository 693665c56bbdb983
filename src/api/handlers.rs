//! API handlers for the organizer agent endpoints

use super::models::{
    error_codes, error_response, ApiError, ChatRequestBody, ChatResponseBody, ContextResponseBody,
    HealthResponse, InsightResponseBody, ProviderHealth, ResponseMetadata, TestProviderQuery,
    TestProviderResponseBody,
};
use crate::agent::{ChatOptions, OrganizerAgent, Provider};
use crate::context::format_context_for_prompt;
use crate::error::Result;
use crate::metrics::METRICS;
use crate::middleware::AuthenticatedUser;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Maximum accepted chat message length in characters
const MAX_MESSAGE_LENGTH: usize = 1000;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<OrganizerAgent>,
}

/// Chat with the organizer agent
///
/// POST /api/organizer/chat
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChatRequestBody>,
) -> std::result::Result<Json<ChatResponseBody>, (StatusCode, Json<ApiError>)> {
    let start = Instant::now();

    info!("Organizer chat request: user={}", user.id);

    let message = request.message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                error_codes::VALIDATION_ERROR,
                "Message is required",
            )),
        ));
    }

    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(
                error_codes::VALIDATION_ERROR,
                "Message cannot exceed 1000 characters",
            )),
        ));
    }

    let options = ChatOptions {
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        provider: request.provider,
    };

    let result = state.agent.chat(&user.id, message, &options).await;
    finish("chat", start, result.map(|response| {
        Json(ChatResponseBody {
            success: true,
            response,
            metadata: ResponseMetadata::new(&user.id, "chat"),
        })
    }))
}

/// Get task organization suggestions
///
/// GET /api/organizer/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> std::result::Result<Json<InsightResponseBody>, (StatusCode, Json<ApiError>)> {
    insight_handler(
        state,
        user,
        "organization_suggestions",
        |agent, user_id| async move { agent.organization_suggestions(&user_id, None).await },
    )
    .await
}

/// Get a daily task plan
///
/// GET /api/organizer/daily-plan
pub async fn daily_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> std::result::Result<Json<InsightResponseBody>, (StatusCode, Json<ApiError>)> {
    insight_handler(state, user, "daily_plan", |agent, user_id| async move {
        agent.daily_plan(&user_id, None).await
    })
    .await
}

/// Analyze productivity patterns
///
/// GET /api/organizer/productivity-analysis
pub async fn productivity_analysis(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> std::result::Result<Json<InsightResponseBody>, (StatusCode, Json<ApiError>)> {
    insight_handler(
        state,
        user,
        "productivity_analysis",
        |agent, user_id| async move { agent.productivity_analysis(&user_id, None).await },
    )
    .await
}

/// Get a motivational message
///
/// GET /api/organizer/motivation
pub async fn motivation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> std::result::Result<Json<InsightResponseBody>, (StatusCode, Json<ApiError>)> {
    insight_handler(state, user, "motivation", |agent, user_id| async move {
        agent.motivation(&user_id, None).await
    })
    .await
}

/// Inspect the retrieved context, raw and formatted
///
/// GET /api/organizer/context
pub async fn context(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> std::result::Result<Json<ContextResponseBody>, (StatusCode, Json<ApiError>)> {
    let start = Instant::now();

    let result = state.agent.retrieve_context(&user.id).await;
    finish("context", start, result.map(|context| {
        let formatted_context = format_context_for_prompt(&context);
        Json(ContextResponseBody {
            success: true,
            context,
            formatted_context,
        })
    }))
}

/// Probe AI provider connectivity
///
/// GET /api/organizer/test-provider
pub async fn test_provider(
    State(state): State<AppState>,
    Query(query): Query<TestProviderQuery>,
) -> std::result::Result<Json<TestProviderResponseBody>, (StatusCode, Json<ApiError>)> {
    let start = Instant::now();

    info!("Provider probe request: provider={:?}", query.provider);

    let result = state.agent.test_provider(query.provider).await;
    finish("test_provider", start, result.map(|test_result| {
        Json(TestProviderResponseBody {
            success: true,
            test_result,
        })
    }))
}

/// Service health with provider credential availability
///
/// GET /api/organizer/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.agent.registry();

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        service: "organizer-agent",
        providers: ProviderHealth {
            deepseek: registry.is_configured(Provider::Deepseek),
            openrouter: registry.is_configured(Provider::Openrouter),
        },
        features: &[
            "chat",
            "organization-suggestions",
            "daily-plan",
            "productivity-analysis",
            "motivation",
            "provider-test",
        ],
    })
}

/// Export metrics in Prometheus text format
///
/// GET /metrics
pub async fn metrics_export() -> String {
    METRICS.export_prometheus()
}

/// Shared wrapper for the context-grounded insight operations
async fn insight_handler<F, Fut>(
    state: AppState,
    user: AuthenticatedUser,
    kind: &'static str,
    operation: F,
) -> std::result::Result<Json<InsightResponseBody>, (StatusCode, Json<ApiError>)>
where
    F: FnOnce(Arc<OrganizerAgent>, String) -> Fut,
    Fut: std::future::Future<Output = Result<String>>,
{
    let start = Instant::now();

    info!("Organizer {} request: user={}", kind, user.id);

    let result = operation(state.agent.clone(), user.id.clone()).await;
    finish(kind, start, result.map(|insight| {
        Json(InsightResponseBody {
            success: true,
            result: insight,
            metadata: ResponseMetadata::new(&user.id, kind),
        })
    }))
}

/// Record metrics for an operation outcome and map errors to responses
fn finish<T>(
    operation: &'static str,
    start: Instant,
    result: Result<T>,
) -> std::result::Result<T, (StatusCode, Json<ApiError>)> {
    let success = result.is_ok();
    METRICS.record_agent_request(operation, success);
    METRICS
        .agent_request_duration
        .with_label_values(&[operation])
        .observe(start.elapsed().as_secs_f64());

    result.map_err(|e| {
        error!("Organizer {} failed: {}", operation, e);
        error_response(&e)
    })
}
