//! vetbook-server: veterinary appointment-booking backend
//!
//! Users register as vets or clients; vets maintain a profile and an offered
//! service list, clients book appointments, pay simulated deposits, and
//! leave reviews. The service list is kept consistent with the global
//! catalog by a transactional reconciliation routine
//! ([`db::repos::VetServiceRepo::reconcile`]).

pub mod auth;
pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, create_pool_with_options};
pub use http::{run_server, AppState, ServerConfig, ServerError};
