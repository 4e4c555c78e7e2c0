use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::CategoryRecord;

/// Per-category failure detail surfaced in the `errors` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Response for the plan endpoint
///
/// Echoes the normalized request fields alongside the curated lists.
/// `ok` is true iff no category pipeline failed; partial failures keep
/// HTTP 200 and show up in `errors` keyed by category tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub ok: bool,
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub errors: BTreeMap<String, CategoryError>,
    pub zona: Option<String>,
    pub municipio_preferido: Option<String>,
    pub tamano_perro: Option<String>,
    pub duracion_dias: Option<u32>,
    pub tipo_viaje: Option<String>,
    pub alojamientos: Vec<CategoryRecord>,
    pub restaurantes: Vec<CategoryRecord>,
    pub experiencias: Vec<CategoryRecord>,
    pub playas: Vec<CategoryRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
