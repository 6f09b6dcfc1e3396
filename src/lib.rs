//! # Strategy Payoff Backend - REST API Server
//!
//! A REST API backend for building multi-leg option strategies and reading
//! their payoff at expiry, with NSE option-chain open-interest analytics and
//! a small portfolio analyzer. Built with [Axum](https://crates.io/crates/axum)
//! for async HTTP handling and provides OpenAPI/Swagger documentation via
//! [utoipa](https://crates.io/crates/utoipa).
//!
//! ## Key Features
//!
//! - **Payoff Engine**: Expiry P&L of any combination of calls, puts,
//!   futures and the underlying, with breakevens and maximum profit and loss
//!   that know when a tail is unbounded.
//!
//! - **Open Interest**: Option chains fetched from NSE, filtered by expiry
//!   and strike range, with put-call ratio sentiment.
//!
//! - **Portfolio Analysis**: Metrics, allocation and rule-based
//!   recommendations for a holdings snapshot, plus equity quotes from
//!   Alpha Vantage.
//!
//! - **OpenAPI Documentation**: Auto-generated Swagger UI at `/swagger-ui/`.
//!
//! - **Structured Logging**: Request tracing with `tower-http`.
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`payoff`] | Pure payoff engine: legs, price sweeps, extremes, breakevens |
//! | [`market_data`] | NSE option chain and Alpha Vantage quote clients |
//! | [`open_interest`] | Option chain snapshots and open-interest totals |
//! | [`sentiment`] | Put-call ratio buckets |
//! | [`portfolio`] | Portfolio metrics and recommendations |
//! | [`api`] | Route handlers and router configuration |
//! | [`config`] | TOML configuration |
//! | [`error`] | API error types with `IntoResponse` implementation |
//! | [`models`] | Request/response DTOs with OpenAPI schemas |
//! | [`state`] | Application state management |
//!
//! ## API Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/builder` | Strategy payoff |
//! | GET | `/api/v1/open-interest` | Filtered option chain with OI totals |
//! | POST | `/api/v1/portfolio/stock-data` | Quotes for several symbols |
//! | POST | `/api/v1/portfolio/analyze` | Portfolio analysis |
//! | GET | `/api/v1/portfolio/benchmark/{symbol}` | Benchmark quote |
//!
//! ## Example Usage
//!
//! ### Starting the Server
//!
//! ```bash
//! # Development mode
//! cargo run
//!
//! # With a configuration file and custom port
//! CONFIG_PATH=config.toml PORT=3000 cargo run
//!
//! # Enable quote endpoints
//! ALPHA_VANTAGE_API_KEY=... cargo run
//! ```
//!
//! ### API Requests
//!
//! ```bash
//! # Bull call spread on NIFTY, lot size 75
//! curl -X POST http://localhost:6123/api/v1/builder \
//!   -H "Content-Type: application/json" \
//!   -d '{"lot_size": 75, "underlying_price": 24000,
//!        "legs": [
//!          {"instrument_type": "CE", "action": "BUY", "strike": 24000, "premium": 180, "quantity": 1},
//!          {"instrument_type": "CE", "action": "SELL", "strike": 24200, "premium": 95, "quantity": 1}
//!        ]}'
//!
//! # Open interest for the nearest NIFTY expiry around the money
//! curl "http://localhost:6123/api/v1/open-interest?identifier=NIFTY&min_strike=23500&max_strike=24500"
//! ```
//!
//! ## Dependencies
//!
//! - **axum** (0.8): Async web framework
//! - **tower-http** (0.6): HTTP middleware (CORS, tracing)
//! - **reqwest** (0.13): Upstream market data
//! - **utoipa** (5.4): OpenAPI documentation generation
//! - **utoipa-swagger-ui** (9.0): Swagger UI integration
//! - **tokio** (1.49): Async runtime
//! - **serde** (1.0): Serialization/deserialization
//! - **tracing** (0.1): Structured logging

pub mod api;
pub mod config;
pub mod error;
pub mod market_data;
pub mod models;
pub mod open_interest;
pub mod payoff;
pub mod portfolio;
pub mod sentiment;
pub mod state;
