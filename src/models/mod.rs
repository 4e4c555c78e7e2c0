// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Category, CategoryRecord, ScoredCandidate, ID_FIELD};
pub use requests::TravelRequest;
pub use responses::{CategoryError, ErrorResponse, HealthResponse, PlanResponse};
