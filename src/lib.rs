//! Coinbase wrapped-assets SDK for Rust.
//!
//! A small, resilient client for the Coinbase REST endpoints that price and
//! perform wrapped-asset conversions (e.g. `ETH` → `cbETH`).
//!
//! # What This SDK Provides
//!
//! - High-level client: [`WrappedClient`]
//! - HMAC request signing: [`CoinbaseAuth`] behind the [`RestAuth`] capability
//! - A pluggable HTTP execution service: [`RestExecutor`], with a `reqwest`
//!   implementation in [`ReqwestExecutor`]
//! - Conversion tracking that polls until a terminal status or a timeout
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use coinbase_wrapped::{Credentials, WrappedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), coinbase_wrapped::WrappedError> {
//!     let client = WrappedClient::new(Credentials::from_env()?);
//!
//!     match client.get_conversion_rate("ETH", "cbETH").await? {
//!         Some(rate) => println!("1 ETH = {rate} cbETH"),
//!         None => println!("pair not listed"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Wrapping
//!
//! ```rust,no_run
//! use coinbase_wrapped::{Credentials, WrapAmount, WrappedClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), coinbase_wrapped::WrappedError> {
//!     let client = WrappedClient::new(Credentials::from_env()?);
//!     let amount: WrapAmount = "0.5".parse()?;
//!
//!     // Fire and forget, then poll on your own schedule.
//!     let submitted = client.submit_wrap("ETH", "cbETH", &amount, false).await?;
//!     println!("submitted: {submitted:?}");
//!
//!     // Or submit and wait for a terminal status.
//!     let outcome = client.wrap_and_wait("ETH", "cbETH", &amount).await?;
//!     println!("{} finished as {}", outcome.conversion_id, outcome.status);
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! This crate emits logs through the [`log`](https://docs.rs/log/) facade:
//! `debug` for request flow and polling, `warn` for retried failures and
//! timeouts. Configure any compatible logger in your binary, then set
//! `RUST_LOG=debug` to inspect it.
//!
//! # Errors
//!
//! All fallible operations return [`WrappedError`]:
//!
//! - `RetryableStatus` / `HttpError` are transient and retried internally
//! - `HttpStatus` is a client error (4xx other than 429) and is never retried
//! - `RetriesExhausted` wraps the last transient failure once the budget is spent
//! - `ConfigError` covers requests that cannot be built and is never retried
//! - `PollTimeout` means the conversion exists but was still in progress when
//!   waiting stopped; the exchange did not report it as failed
pub mod auth;
pub mod client;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod http;
pub mod models;

// Re-export primary types for convenience.
pub use auth::{CoinbaseAuth, Credentials, FixedTimeProvider, RestAuth, SystemTimeProvider, TimeProvider};
pub use client::WrappedClient;
pub use config::{ClientConfig, PollConfig, RateLimit, RetryPolicy};
pub use decimal::WrapAmount;
pub use errors::WrappedError;
pub use http::{RequestBody, ReqwestExecutor, RestExecutor, RestMethod, RestRequest, RestResponse};
pub use models::{ConversionOutcome, ConversionStatus, JsonMap, PricingEntry};
