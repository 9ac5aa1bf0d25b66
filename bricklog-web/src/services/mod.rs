//! Service layer for bricklog-web
//!
//! External API clients and the set-resolution pipeline.

pub mod rebrickable_client;
pub mod search_client;
pub mod set_resolver;

pub use rebrickable_client::RebrickableClient;
pub use search_client::HttpSearchClient;
pub use set_resolver::{ResolveError, SetResolver};
