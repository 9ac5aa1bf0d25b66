//! HTTP API handlers for bricklog-web

pub mod health;
pub mod sets;
pub mod web_search;

pub use health::health_routes;
pub use sets::sets_routes;
pub use web_search::web_search_routes;
