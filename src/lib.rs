//! plan-viaje - Dog-friendly travel planning API
//!
//! This library assembles a curated trip plan (lodging, dining, experiences,
//! dog beaches) by querying an Airtable base per request, filtering and
//! ranking records per category and applying a deterministic variety shuffle.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{shuffle::shuffle_seeded, Planner};
pub use crate::models::{Category, CategoryRecord, PlanResponse, TravelRequest};
