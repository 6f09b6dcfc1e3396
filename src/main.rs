//! Strategy Payoff Backend Server
//!
//! REST API server for strategy payoffs, open interest and portfolio analysis.

use std::sync::Arc;
use strategy_payoff_backend::api::create_router;
use strategy_payoff_backend::config::Config;
use strategy_payoff_backend::state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use strategy_payoff_backend::error::ErrorResponse;
use strategy_payoff_backend::market_data::StockQuote;
use strategy_payoff_backend::models::{
    AnalyzePortfolioRequest, HealthResponse, LegRequest, OpenInterestResponse, PayoffPoint,
    PayoffRequest, PayoffResponse, StockDataRequest, StockDataResponse,
};
use strategy_payoff_backend::open_interest::{
    ExpiryGroup, OiTotals, OptionQuote, StrikeRow,
};
use strategy_payoff_backend::portfolio::{
    AllocationEntry, Holding, HoldingKind, OptionRight, PortfolioAnalysis, PortfolioMetrics,
    Priority, Recommendation, RecommendationKind,
};
use strategy_payoff_backend::sentiment::{Sentiment, SentimentReport};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        strategy_payoff_backend::api::handlers::health_check,
        strategy_payoff_backend::api::handlers::build_payoff,
        strategy_payoff_backend::api::handlers::get_open_interest,
        strategy_payoff_backend::api::handlers::get_stock_data,
        strategy_payoff_backend::api::handlers::analyze_portfolio,
        strategy_payoff_backend::api::handlers::get_benchmark,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            LegRequest,
            PayoffRequest,
            PayoffPoint,
            PayoffResponse,
            OpenInterestResponse,
            ExpiryGroup,
            StrikeRow,
            OptionQuote,
            OiTotals,
            Sentiment,
            SentimentReport,
            StockDataRequest,
            StockDataResponse,
            StockQuote,
            AnalyzePortfolioRequest,
            Holding,
            HoldingKind,
            OptionRight,
            PortfolioAnalysis,
            PortfolioMetrics,
            AllocationEntry,
            Recommendation,
            RecommendationKind,
            Priority,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Builder", description = "Strategy payoff computation"),
        (name = "Open Interest", description = "Option chain open interest and sentiment"),
        (name = "Portfolio", description = "Quotes and portfolio analysis"),
    ),
    info(
        title = "Strategy Payoff API",
        version = "0.1.0",
        description = "REST API for option strategy payoffs, open interest and portfolio analysis",
        license(name = "MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, then apply environment overrides
    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => {
            info!("Loading configuration from {}", path);
            Config::load(&path)?
        }
        Err(_) => Config::default(),
    }
    .apply_env()?;

    let host = config.server.host.clone();
    let port = config.server.port;

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);

    info!("Starting Strategy Payoff Backend on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
