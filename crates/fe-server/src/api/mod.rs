//! HTTP surface: routes, responses, pagination

pub mod pagination;
pub mod response;
pub mod routes;

pub use routes::{router, AppState};
