//! Fuel economy service library
//!
//! HTTP API over the EPA fuel economy data set:
//!
//! - **API Endpoints**: health check, on-demand ingestion, vehicle
//!   lookup and search
//! - **Ingestion**: bounded worker pool pulling the upstream vehicle,
//!   emissions and fuel price feeds
//! - **Storage**: Postgres in production, sqlite for tests, via the
//!   `fe-srm` record mapper
//! - **Configuration**: environment-based
//!
//! # Example
//!
//! ```no_run
//! use fe_server::api::{self, AppState};
//! use fe_server::ingest;
//! use fe_srm::DbMap;
//!
//! # async fn run(db: DbMap) {
//! let (queue, _dispatcher) = ingest::start(4);
//! let app = api::router(AppState { db, queue });
//! # let _ = app;
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;

pub use config::Config;
pub use error::{ApiResult, AppError};
