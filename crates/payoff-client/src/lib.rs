//! HTTP client library for the Strategy Payoff API.
//!
//! This crate provides a typed HTTP client for the strategy payoff backend:
//! payoff computation, open interest and portfolio endpoints.
//!
//! # Example
//!
//! ```no_run
//! use payoff_client::{ClientConfig, Leg, LegAction, PayoffClient, PayoffRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), payoff_client::Error> {
//!     let client = PayoffClient::new(ClientConfig {
//!         base_url: "http://localhost:6123".into(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!
//!     let request = PayoffRequest {
//!         legs: vec![Leg::call(LegAction::Buy, 24000.0, 180.0, 1)],
//!         lot_size: Some(75),
//!         underlying_price: Some(24000.0),
//!         ..Default::default()
//!     };
//!     let payoff = client.build_payoff(&request).await?;
//!     println!("Breakevens: {:?}", payoff.breakevens);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{ClientConfig, PayoffClient};
pub use error::Error;
pub use types::*;
