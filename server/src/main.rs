mod api;
mod config;
mod telemetry;

use std::any::Any;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use larder_core::{create_provider, LlmProvider};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::ErrorResponse;
use crate::config::ServerConfig;

/// Application state shared across all handlers: the upstream model.
pub type AppState = Arc<dyn LlmProvider>;

/// Anything that escapes a handler still gets the generic JSON error.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(
            "Failed to generate recipes. Please try again.",
        )),
    )
        .into_response()
}

/// One span per request. Handlers fill in `ingredients` once the body is parsed.
fn request_span<B>(request: &Request<B>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or(request.uri().path());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %path,
        ingredients = tracing::field::Empty,
    )
}

fn log_response(status: StatusCode, latency: Duration) {
    let latency_ms = latency.as_millis();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), latency_ms, "request failed with server error");
    } else {
        tracing::info!(status = status.as_u16(), latency_ms, "request completed");
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .nest("/api", api::recipes::router())
        .merge(swagger_ui)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| request_span(request))
                .on_response(|response: &Response<_>, latency: Duration, _span: &Span| {
                    log_response(response.status(), latency)
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        tracing::error!(error = %error, latency_ms = latency.as_millis(), "request failed");
                    },
                ),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    let telemetry = telemetry::init_telemetry();

    let config = ServerConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Configuration error, set GEMINI_API_KEY (or LARDER_LLM_PROVIDER=fake)");
    })?;

    if let Some(prefix) = config.llm.redacted_key() {
        tracing::info!("API key starts with: {}", prefix);
    }

    let provider = create_provider(&config.llm)?;
    tracing::info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        cache = config.llm.cache_dir.is_some(),
        "Upstream model configured"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", config.bind_addr);

    axum::serve(listener, app(provider))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    Ok(())
}
