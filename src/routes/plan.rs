use actix_web::{http::Method, web, HttpResponse, Responder};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

use crate::core::Planner;
use crate::models::{
    Category, CategoryError, CategoryRecord, ErrorResponse, HealthResponse, PlanResponse,
    TravelRequest,
};
use crate::services::{AirtableClient, AirtableError};

/// Application state shared across all handlers
///
/// `airtable` is `None` when the backend credentials are absent; requests
/// then fail with a configuration error instead of the server refusing to
/// boot, mirroring how the hosting platform surfaces misconfiguration.
#[derive(Clone)]
pub struct AppState {
    pub airtable: Option<Arc<AirtableClient>>,
    pub planner: Planner,
}

/// Configure all plan-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::resource("/plan-viaje")
            .route(web::post().to(plan_viaje))
            .route(web::method(Method::OPTIONS).to(preflight))
            .route(web::route().to(method_not_allowed)),
    );
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// CORS preflight; headers are attached by the Cors middleware.
async fn preflight() -> impl Responder {
    HttpResponse::Ok().finish()
}

async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(ErrorResponse {
        error: "method_not_allowed".to_string(),
        message: "Método no permitido. Usa POST.".to_string(),
        status_code: 405,
    })
}

/// Trip planning endpoint
///
/// POST /plan-viaje
///
/// Request body:
/// ```json
/// {
///   "zona": "maresme",
///   "municipio_preferido": "Calella",
///   "tamano_perro": "mediano",
///   "quiere_playa": true,
///   "tipo_viaje": "familias",
///   "duracion_dias": 4
/// }
/// ```
///
/// The four catalog pipelines run concurrently; a failing category shows up
/// in `errors` while the others still return records, with HTTP 200 and
/// `ok:false`.
async fn plan_viaje(
    state: web::Data<AppState>,
    req: web::Json<TravelRequest>,
) -> impl Responder {
    let request = req.into_inner();

    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for plan request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    if !request.has_locality() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "missing_locality".to_string(),
            message: "Falta la zona o el municipio. Envía al menos 'zona' (por ejemplo, 'maresme')."
                .to_string(),
            status_code: 400,
        });
    }

    let Some(airtable) = state.airtable.as_deref() else {
        tracing::error!("Plan request received but Airtable credentials are not configured");
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "configuration_error".to_string(),
            message: "Faltan las credenciales de Airtable en el servidor.".to_string(),
            status_code: 500,
        });
    };

    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        request_id = %request_id,
        zona = ?request.zona,
        municipio = ?request.municipio_preferido,
        "Planning trip"
    );

    // One task per category; a failure in one never cancels the siblings.
    let (alojamientos, restaurantes, experiencias, playas) = tokio::join!(
        airtable.fetch_all(Category::Alojamientos, &request),
        airtable.fetch_all(Category::Restaurantes, &request),
        airtable.fetch_all(Category::Experiencias, &request),
        fetch_playas(airtable, &request),
    );

    let outcomes = vec![
        (Category::Alojamientos, alojamientos),
        (Category::Restaurantes, restaurantes),
        (Category::Experiencias, experiencias),
        (Category::Playas, playas),
    ];

    let raw_counts: Vec<(Category, usize)> = outcomes
        .iter()
        .map(|(c, r)| (*c, r.as_ref().map(Vec::len).unwrap_or(0)))
        .collect();

    let response = build_response(&request, &request_id, &state.planner, outcomes);

    log_outcome(&response, &raw_counts);

    HttpResponse::Ok().json(response)
}

/// Beaches are only fetched when the caller wants them; a skipped fetch is
/// an empty success, not an error.
async fn fetch_playas(
    client: &AirtableClient,
    request: &TravelRequest,
) -> Result<Vec<CategoryRecord>, AirtableError> {
    if request.quiere_playa {
        client.fetch_all(Category::Playas, request).await
    } else {
        Ok(Vec::new())
    }
}

/// Settle the four category outcomes into the response payload. Successful
/// categories run through the selection pipeline; failed ones contribute an
/// empty list plus an `errors` entry.
pub fn build_response(
    request: &TravelRequest,
    request_id: &str,
    planner: &Planner,
    outcomes: Vec<(Category, Result<Vec<CategoryRecord>, AirtableError>)>,
) -> PlanResponse {
    let mut errors: BTreeMap<String, CategoryError> = BTreeMap::new();
    let mut selected: Vec<(Category, Vec<CategoryRecord>)> = Vec::with_capacity(outcomes.len());

    for (category, outcome) in outcomes {
        match outcome {
            Ok(records) => {
                let selection = planner.select(category, records, request, request_id);
                selected.push((category, selection.records));
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    category = category.tag(),
                    error = %err,
                    "Category pipeline failed"
                );
                errors.insert(
                    category.tag().to_string(),
                    CategoryError {
                        error: err.to_string(),
                        status: err.status(),
                    },
                );
                selected.push((category, Vec::new()));
            }
        }
    }

    let mut take = |category: Category| -> Vec<CategoryRecord> {
        selected
            .iter_mut()
            .find(|(c, _)| *c == category)
            .map(|(_, records)| std::mem::take(records))
            .unwrap_or_default()
    };

    PlanResponse {
        ok: errors.is_empty(),
        request_id: request_id.to_string(),
        errors,
        zona: request.zona.clone(),
        municipio_preferido: request.municipio_preferido.clone(),
        tamano_perro: request.tamano_perro.clone(),
        duracion_dias: request.duracion_dias,
        tipo_viaje: request.tipo_viaje.clone(),
        alojamientos: take(Category::Alojamientos),
        restaurantes: take(Category::Restaurantes),
        experiencias: take(Category::Experiencias),
        playas: take(Category::Playas),
    }
}

/// One structured diagnostic line per request.
fn log_outcome(response: &PlanResponse, raw_counts: &[(Category, usize)]) {
    let raw = |category: Category| {
        raw_counts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    };

    tracing::info!(
        request_id = %response.request_id,
        ok = response.ok,
        failed = ?response.errors.keys().collect::<Vec<_>>(),
        alojamientos_raw = raw(Category::Alojamientos),
        alojamientos = response.alojamientos.len(),
        restaurantes_raw = raw(Category::Restaurantes),
        restaurantes = response.restaurantes.len(),
        experiencias_raw = raw(Category::Experiencias),
        experiencias = response.experiencias.len(),
        playas_raw = raw(Category::Playas),
        playas = response.playas.len(),
        "Plan request completed"
    );
}
