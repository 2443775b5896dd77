pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod site;
pub mod telemetry;

pub use reqwest;
