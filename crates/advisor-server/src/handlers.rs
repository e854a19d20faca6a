//! HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, Session, SessionId};
use wealth_advisor::{
    allocate, AdvisorError, Allocation, GrowthReport, InvestmentPlan, PlanMode, Rating, Report,
    UserProfile,
};

use crate::state::AppState;

const MAX_LOOKBACK_YEARS: u32 = 30;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_connected: bool,
    pub price_source: &'static str,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub allocation: Allocation,
    pub chart: String,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub mode: PlanMode,

    /// Target corpus in `goal` mode, monthly contribution in `monthly` mode
    pub amount: Decimal,

    /// Expected annual return in percent
    pub rate: Decimal,

    pub years: u32,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    #[serde(flatten)]
    pub plan: InvestmentPlan,
    /// `null` when the sum is past the `Decimal` range
    pub total_contributed: Option<Decimal>,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct GrowthQuery {
    pub years: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub profile: UserProfile,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub session_id: String,
    /// Messages recorded in the session so far
    pub history_len: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub profile: UserProfile,
    pub explanation: String,
    #[serde(default)]
    pub plan: Option<InvestmentPlan>,
    #[serde(default)]
    pub growth: Option<GrowthReport>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Text,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub rating: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
    pub rating: &'static str,
}

// ============================================================================
// Error Mapping
// ============================================================================

fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.into(),
        }),
    )
}

fn agent_error(err: &AgentError) -> ApiError {
    let (status, code) = match err {
        AgentError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
        AgentError::RateLimited(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        AgentError::ProviderUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE"),
        AgentError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
        AgentError::Auth(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_AUTH"),
        AgentError::Provider(_) | AgentError::Parse(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR"),
    };
    if status.is_server_error() {
        tracing::error!("Advisory request failed: {}", err);
    }
    api_error(status, code, err.user_message())
}

fn advisor_error(err: &AdvisorError) -> ApiError {
    let (status, code) = match err {
        AdvisorError::Agent(inner) => return agent_error(inner),
        AdvisorError::InvalidPlan(_) => (StatusCode::BAD_REQUEST, "INVALID_PLAN"),
        AdvisorError::UnknownRiskLevel(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_RISK"),
        AdvisorError::UnknownRating(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_RATING"),
        AdvisorError::InvalidProfile(_) => (StatusCode::BAD_REQUEST, "INVALID_PROFILE"),
        AdvisorError::EmptyQuestion => (StatusCode::BAD_REQUEST, "EMPTY_QUESTION"),
        AdvisorError::MarketData { .. } | AdvisorError::Network(_) => {
            (StatusCode::BAD_GATEWAY, "MARKET_DATA")
        }
        AdvisorError::Report(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REPORT_ERROR"),
        AdvisorError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    api_error(status, code, err.to_string())
}

async fn load_session(state: &AppState, id: SessionId) -> ApiResult<Session> {
    state
        .sessions
        .load(&id)
        .await
        .map_err(|e| agent_error(&e))?
        .ok_or_else(|| agent_error(&AgentError::SessionNotFound(id.to_string())))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.provider.name().to_string(),
        provider_connected,
        price_source: state.config.price_source.as_str(),
        active_sessions: state.sessions.len().await,
    })
}

/// Allocation for the profile plus an explanation of it
pub async fn portfolio(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> ApiResult<Json<PortfolioResponse>> {
    profile.validate().map_err(|e| advisor_error(&e))?;

    let allocation = allocate(profile.risk);
    let explanation = state
        .advisor()
        .explain(&profile, allocation)
        .await
        .map_err(|e| advisor_error(&e))?;

    Ok(Json(PortfolioResponse {
        allocation,
        chart: allocation.chart(),
        explanation,
    }))
}

/// Solve a monthly investment plan
pub async fn plan_investment(Json(payload): Json<PlanRequest>) -> ApiResult<Json<PlanResponse>> {
    let plan = InvestmentPlan::solve(payload.mode, payload.amount, payload.rate, payload.years)
        .map_err(|e| advisor_error(&e))?;

    Ok(Json(PlanResponse {
        total_contributed: plan.total_contributed(),
        summary: plan.summary(),
        plan,
    }))
}

/// Trailing CAGR for each asset class
pub async fn growth_estimates(
    State(state): State<AppState>,
    Query(query): Query<GrowthQuery>,
) -> ApiResult<Json<GrowthReport>> {
    let years = query.years.unwrap_or(state.config.lookback_years);
    if !(1..=MAX_LOOKBACK_YEARS).contains(&years) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_LOOKBACK",
            format!("years must be between 1 and {MAX_LOOKBACK_YEARS}"),
        ));
    }

    Ok(Json(state.growth_estimator(years).report().await))
}

/// Follow-up question; creates a session when none is given
pub async fn ask_question(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> ApiResult<Json<AskResponse>> {
    payload.profile.validate().map_err(|e| advisor_error(&e))?;

    let mut session = match payload.session_id {
        Some(id) => load_session(&state, SessionId::from_string(id)).await?,
        None => Session::new(),
    };

    let answer = state
        .advisor()
        .ask(&payload.profile, allocate(payload.profile.risk), &payload.question)
        .await
        .map_err(|e| advisor_error(&e))?;

    session.user_name = Some(payload.profile.name.clone());
    session.record_answer(payload.question.trim(), answer.clone());
    state.sessions.save(&session).await.map_err(|e| agent_error(&e))?;

    Ok(Json(AskResponse {
        answer,
        session_id: session.id.to_string(),
        history_len: session.message_count(),
    }))
}

/// Full report as PDF (default) or plain text
pub async fn generate_report(
    Query(query): Query<ReportQuery>,
    Json(payload): Json<ReportRequest>,
) -> ApiResult<Response> {
    payload.profile.validate().map_err(|e| advisor_error(&e))?;

    let mut report = Report::new(payload.profile, payload.explanation);
    if let Some(plan) = payload.plan {
        report = report.with_plan(plan);
    }
    if let Some(growth) = payload.growth {
        report = report.with_growth(growth);
    }

    let response = match query.format {
        ReportFormat::Text => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report.render_text(),
        )
            .into_response(),
        ReportFormat::Pdf => {
            let bytes = report.render_pdf().map_err(|e| advisor_error(&e))?;
            (
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"Wealth_Report.pdf\"",
                    ),
                ],
                bytes,
            )
                .into_response()
        }
    };
    Ok(response)
}

/// Store an end-of-session rating
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<FeedbackRequest>,
) -> ApiResult<Json<FeedbackResponse>> {
    let rating: Rating = payload.rating.parse().map_err(|e| advisor_error(&e))?;

    let mut session = load_session(&state, SessionId::from_string(payload.session_id)).await?;
    session.set_feedback(rating.label());
    state.sessions.save(&session).await.map_err(|e| agent_error(&e))?;

    tracing::info!(session = %session.id, rating = rating.label(), "Feedback received");

    Ok(Json(FeedbackResponse {
        message: "Thank you for your feedback! You may restart the app now.",
        rating: rating.label(),
    }))
}

/// Drop a session (restart)
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = SessionId::from_string(id);
    if state.sessions.delete(&id).await.map_err(|e| agent_error(&e))? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(agent_error(&AgentError::SessionNotFound(id.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use agent_core::provider::ModelInfo;
    use agent_core::{
        Completion, GenerationOptions, LlmProvider, MemorySessionStore, Message, SessionStore,
    };
    use async_trait::async_trait;
    use axum::{body::Body, http::Request, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wealth_advisor::MockPriceHistory;

    use super::*;
    use crate::config::ServerConfig;
    use crate::routes::router;

    struct StubProvider {
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn health_check(&self) -> agent_core::Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> agent_core::Result<Completion> {
            if self.fail {
                return Err(AgentError::RateLimited("quota".into()));
            }
            Ok(Completion {
                content: "Stay diversified.".into(),
                model: options.model.clone(),
                usage: None,
                finish_reason: None,
            })
        }

        async fn list_models(&self) -> agent_core::Result<Vec<ModelInfo>> {
            Ok(vec![])
        }
    }

    fn app_with(fail: bool) -> (Router, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        let state = AppState::new(
            Arc::new(StubProvider { fail }),
            Arc::new(MockPriceHistory::with_benchmarks()),
            store.clone(),
            ServerConfig::default(),
        );
        (router(state), store)
    }

    fn app() -> Router {
        app_with(false).0
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn as_json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    fn profile() -> Value {
        json!({
            "name": "Asha",
            "age": 30,
            "monthly_income": 50000,
            "risk": "Medium",
            "goal": "retirement"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);

        let body = as_json(&body);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider_connected"], true);
        assert_eq!(body["price_source"], "yahoo");
    }

    #[tokio::test]
    async fn test_portfolio_returns_allocation_and_explanation() {
        let (status, body) = send(&app(), "POST", "/api/portfolio", Some(profile())).await;
        assert_eq!(status, StatusCode::OK);

        let body = as_json(&body);
        assert_eq!(body["allocation"], json!({"Equity": 50, "Debt": 40, "Gold": 10}));
        assert_eq!(body["explanation"], "Stay diversified.");
        assert!(body["chart"].as_str().unwrap().contains("Equity"));
    }

    #[tokio::test]
    async fn test_portfolio_rejects_out_of_range_age() {
        let mut profile = profile();
        profile["age"] = json!(12);

        let (status, body) = send(&app(), "POST", "/api/portfolio", Some(profile)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["code"], "INVALID_PROFILE");
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let (app, _) = app_with(true);
        let (status, body) = send(&app, "POST", "/api/portfolio", Some(profile())).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(as_json(&body)["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn test_goal_plan() {
        let request = json!({"mode": "goal", "amount": 4500000, "rate": 12, "years": 10});
        let (status, body) = send(&app(), "POST", "/api/plan", Some(request)).await;
        assert_eq!(status, StatusCode::OK);

        let body = as_json(&body);
        assert_eq!(body["mode"], "goal");
        assert_eq!(body["monthly"], "19562");
        assert_eq!(
            body["summary"],
            "To reach INR 4,500,000 in 10 years at 12% return, invest INR 19,562/month."
        );
    }

    #[tokio::test]
    async fn test_plan_rejects_zero_years() {
        let request = json!({"mode": "monthly", "amount": 5000, "rate": 12, "years": 0});
        let (status, body) = send(&app(), "POST", "/api/plan", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["code"], "INVALID_PLAN");
    }

    #[tokio::test]
    async fn test_plan_rejects_unrepresentable_terms() {
        for request in [
            json!({"mode": "goal", "amount": 1000, "rate": 12, "years": 400_000_000}),
            json!({"mode": "monthly", "amount": "79228162514264337593543950335", "rate": 12, "years": 10}),
            json!({"mode": "monthly", "amount": 1000, "rate": 1000, "years": 40}),
        ] {
            let (status, body) = send(&app(), "POST", "/api/plan", Some(request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(as_json(&body)["code"], "INVALID_PLAN");
        }
    }

    #[tokio::test]
    async fn test_goal_plan_at_extreme_rate() {
        let request = json!({"mode": "goal", "amount": 1000000, "rate": 1000, "years": 40});
        let (status, body) = send(&app(), "POST", "/api/plan", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body)["monthly"], "0");
    }

    #[tokio::test]
    async fn test_growth_from_mock_benchmarks() {
        let (status, body) = send(&app(), "GET", "/api/growth?years=5", None).await;
        assert_eq!(status, StatusCode::OK);

        let body = as_json(&body);
        assert_eq!(body["lookback_years"], 5);
        assert_eq!(body["estimates"].as_array().unwrap().len(), 3);
        assert_eq!(body["estimates"][0]["cagr_percent"].as_f64(), Some(12.0));
        assert_eq!(body["average_percent"].as_f64(), Some(9.33));
    }

    #[tokio::test]
    async fn test_growth_rejects_zero_years() {
        let (status, _) = send(&app(), "GET", "/api/growth?years=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_question() {
        let request = json!({"profile": profile(), "question": "  "});
        let (status, body) = send(&app(), "POST", "/api/ask", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["code"], "EMPTY_QUESTION");
    }

    #[tokio::test]
    async fn test_ask_feedback_and_restart() {
        let (app, store) = app_with(false);

        let request = json!({"profile": profile(), "question": "Why gold?"});
        let (status, body) = send(&app, "POST", "/api/ask", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        let body = as_json(&body);
        assert_eq!(body["answer"], "Stay diversified.");
        assert_eq!(body["history_len"], 2);
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let request = json!({"session_id": session_id, "profile": profile(), "question": "And debt?"});
        let (_, body) = send(&app, "POST", "/api/ask", Some(request)).await;
        assert_eq!(as_json(&body)["history_len"], 4);

        let feedback = json!({"session_id": session_id, "rating": "good"});
        let (status, body) = send(&app, "POST", "/api/feedback", Some(feedback)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(as_json(&body)["rating"], "Good");

        let stored = store
            .load(&SessionId::from_string(session_id.clone()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.feedback.unwrap().rating, "Good");
        assert_eq!(stored.user_name.as_deref(), Some("Asha"));

        let uri = format!("/api/session/{session_id}");
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feedback_validation() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/feedback",
            Some(json!({"session_id": "missing", "rating": "Brilliant"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(as_json(&body)["code"], "UNKNOWN_RATING");

        let (status, _) = send(
            &app(),
            "POST",
            "/api/feedback",
            Some(json!({"session_id": "missing", "rating": "Poor"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_formats() {
        let request = json!({
            "profile": profile(),
            "explanation": "Stay diversified.",
            "plan": {
                "mode": "monthly",
                "monthly": "5000",
                "years": 10,
                "annual_rate_percent": "12",
                "future_value": "1150193"
            }
        });

        let (status, body) = send(&app(), "POST", "/api/report?format=text", Some(request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("Portfolio Allocation"));
        assert!(text.contains("Future Corpus: INR 1,150,193"));

        let (status, body) = send(&app(), "POST", "/api/report", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(b"%PDF"));
    }
}
