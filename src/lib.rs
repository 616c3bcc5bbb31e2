pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod service;
pub mod store;
pub mod types;
