//! ThreatScope API — typed contract layer between the dashboard, the HTTP
//! handlers and the hosted model.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod routes;
pub mod state;
