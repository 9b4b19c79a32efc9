//! HTTP surface: routing, form validation and views

pub mod forms;
pub mod middleware;
pub mod routes;
pub mod views;

pub use routes::build_router;
