use crate::models::{Category, CategoryRecord, TravelRequest};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// How many records to request per page.
const DEFAULT_PAGE_SIZE: usize = 100;
/// Bound on a single page fetch, including connect time.
const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(8);
/// Pagination safety cap. Guarantees termination even if the backend keeps
/// handing out continuation tokens.
const MAX_PAGES: usize = 30;

/// Errors that can occur when querying Airtable
#[derive(Debug, Error)]
pub enum AirtableError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Airtable returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl AirtableError {
    /// HTTP status attached to the failure, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AirtableError::Api { status, .. } => Some(*status),
            AirtableError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Retry policy for transient page-fetch failures
///
/// Only network-level failures (timeout, connection refused) are retryable;
/// a non-success HTTP status surfaces immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(450),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, err: &AirtableError) -> bool {
        match err {
            AirtableError::Transport(e) => {
                e.is_timeout() || e.is_connect() || e.is_request()
            }
            AirtableError::Api { .. } => false,
        }
    }
}

/// Table names of the four catalogs in the Airtable base
#[derive(Debug, Clone)]
pub struct AirtableTables {
    pub alojamientos: String,
    pub restaurantes: String,
    pub experiencias: String,
    pub playas: String,
}

impl Default for AirtableTables {
    fn default() -> Self {
        Self {
            alojamientos: "Alojamientos".to_string(),
            restaurantes: "Restaurantes".to_string(),
            experiencias: "Experiencias".to_string(),
            playas: "Playas caninas".to_string(),
        }
    }
}

impl AirtableTables {
    pub fn name(&self, category: Category) -> &str {
        match category {
            Category::Alojamientos => &self.alojamientos,
            Category::Restaurantes => &self.restaurantes,
            Category::Experiencias => &self.experiencias,
            Category::Playas => &self.playas,
        }
    }
}

/// Airtable REST query client
///
/// Handles all communication with the Airtable base:
/// - Filter formula building from the locality fields
/// - Sequential offset pagination with per-page timeout and single retry
/// - Hard per-category record limits and a page-count safety cap
pub struct AirtableClient {
    api_url: String,
    base_id: String,
    token: String,
    view: Option<String>,
    page_size: usize,
    page_timeout: Duration,
    retry: RetryPolicy,
    tables: AirtableTables,
    client: Client,
}

impl AirtableClient {
    /// Create a new Airtable client
    pub fn new(
        api_url: String,
        base_id: String,
        token: String,
        tables: AirtableTables,
    ) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url,
            base_id,
            token,
            view: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            retry: RetryPolicy::default(),
            tables,
            client,
        }
    }

    /// Restrict queries to a named Airtable view.
    pub fn with_view(mut self, view: Option<String>) -> Self {
        self.view = view;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch every matching record of one category, following continuation
    /// tokens until the backend stops returning them, the category's hard
    /// limit is reached, or the page cap triggers.
    pub async fn fetch_all(
        &self,
        category: Category,
        request: &TravelRequest,
    ) -> Result<Vec<CategoryRecord>, AirtableError> {
        let table = self.tables.name(category);
        let hard_limit = category.hard_limit();
        let formula = build_filter_formula(request);

        let base_url = format!(
            "{}/{}/{}",
            self.api_url.trim_end_matches('/'),
            self.base_id,
            urlencoding::encode(table)
        );

        let mut raw: Vec<Value> = Vec::new();
        let mut offset: Option<String> = None;

        for page in 0..MAX_PAGES {
            let url = self.page_url(&base_url, formula.as_deref(), offset.as_deref());
            tracing::debug!(table, page, "fetching Airtable page");

            let body = self.get_page(&url).await?;

            if let Some(records) = body.get("records").and_then(Value::as_array) {
                raw.extend(records.iter().cloned());
            }

            if raw.len() >= hard_limit {
                tracing::debug!(table, hard_limit, "hard limit reached, truncating");
                raw.truncate(hard_limit);
                break;
            }

            offset = body
                .get("offset")
                .and_then(Value::as_str)
                .map(String::from);
            if offset.is_none() {
                break;
            }
        }

        Ok(normalize_records(raw))
    }

    fn page_url(&self, base_url: &str, formula: Option<&str>, offset: Option<&str>) -> String {
        let mut url = format!("{}?pageSize={}", base_url, self.page_size);
        if let Some(formula) = formula {
            url.push_str(&format!(
                "&filterByFormula={}",
                urlencoding::encode(formula)
            ));
        }
        if let Some(view) = &self.view {
            url.push_str(&format!("&view={}", urlencoding::encode(view)));
        }
        if let Some(offset) = offset {
            url.push_str(&format!("&offset={}", urlencoding::encode(offset)));
        }
        url
    }

    /// Fetch one page, retrying transient failures per the policy.
    async fn get_page(&self, url: &str) -> Result<Value, AirtableError> {
        let mut attempt = 1;
        loop {
            match self.request_page(url).await {
                Ok(body) => return Ok(body),
                Err(err) if attempt < self.retry.max_attempts && self.retry.is_retryable(&err) => {
                    tracing::warn!(attempt, error = %err, "transient Airtable failure, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn request_page(&self, url: &str) -> Result<Value, AirtableError> {
        let response = self
            .client
            .get(url)
            .timeout(self.page_timeout)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(AirtableError::Api {
                status: status.as_u16(),
                message: truncate_message(&message, 300),
            });
        }

        Ok(response.json().await?)
    }
}

/// Build the `filterByFormula` expression for a request. Municipality wins
/// over zone; no locality yields no formula (full table scan).
pub fn build_filter_formula(request: &TravelRequest) -> Option<String> {
    fn filled(v: &Option<String>) -> Option<&str> {
        v.as_deref().filter(|s| !s.trim().is_empty())
    }

    if let Some(municipio) = filled(&request.municipio_preferido) {
        return Some(format!("{{municipio}}='{}'", escape_formula_value(municipio)));
    }
    if let Some(zona) = filled(&request.zona) {
        return Some(format!("{{zona}}='{}'", escape_formula_value(zona)));
    }
    None
}

/// Neutralize single quotes so a value cannot break out of the formula's
/// string literal.
fn escape_formula_value(value: &str) -> String {
    value.replace('\'', "\\'")
}

/// Flatten raw Airtable records into [`CategoryRecord`]s, dropping records
/// without an id and duplicates (overlapping pages keep the first occurrence).
pub fn normalize_records(raw: Vec<Value>) -> Vec<CategoryRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());

    for value in raw {
        let Some(id) = value.get("id").and_then(Value::as_str) else {
            tracing::debug!("skipping Airtable record without id");
            continue;
        };
        if !seen.insert(id.to_string()) {
            continue;
        }
        let fields = value
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        records.push(CategoryRecord::new(id, fields));
    }

    records
}

fn truncate_message(message: &str, max: usize) -> String {
    if message.len() <= max {
        message.to_string()
    } else {
        let mut end = max;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message[..end].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(zona: Option<&str>, municipio: Option<&str>) -> TravelRequest {
        TravelRequest {
            zona: zona.map(String::from),
            municipio_preferido: municipio.map(String::from),
            tamano_perro: None,
            quiere_playa: true,
            tipo_viaje: None,
            duracion_dias: None,
        }
    }

    #[test]
    fn test_formula_prefers_municipio() {
        let req = request(Some("maresme"), Some("Calella"));
        assert_eq!(
            build_filter_formula(&req).as_deref(),
            Some("{municipio}='Calella'")
        );
    }

    #[test]
    fn test_formula_falls_back_to_zona() {
        let req = request(Some("maresme"), None);
        assert_eq!(
            build_filter_formula(&req).as_deref(),
            Some("{zona}='maresme'")
        );
    }

    #[test]
    fn test_formula_escapes_single_quotes() {
        let req = request(None, Some("L'Escala"));
        assert_eq!(
            build_filter_formula(&req).as_deref(),
            Some("{municipio}='L\\'Escala'")
        );
    }

    #[test]
    fn test_blank_municipio_falls_through_to_zona() {
        let req = request(Some("garraf"), Some("  "));
        assert_eq!(
            build_filter_formula(&req).as_deref(),
            Some("{zona}='garraf'")
        );
    }

    #[test]
    fn test_no_locality_yields_no_formula() {
        assert!(build_filter_formula(&request(None, None)).is_none());
    }

    #[test]
    fn test_normalize_flattens_and_dedupes() {
        let raw = vec![
            json!({ "id": "rec1", "fields": { "municipio": "Calella" } }),
            json!({ "id": "rec2", "fields": { "municipio": "Pineda" } }),
            // Overlapping page returned rec1 again with different fields;
            // first occurrence wins.
            json!({ "id": "rec1", "fields": { "municipio": "Sitges" } }),
            json!({ "fields": { "municipio": "Huérfano" } }),
        ];

        let records = normalize_records(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "rec1");
        assert_eq!(records[0].text("municipio"), Some("Calella"));
        assert_eq!(records[1].id, "rec2");
    }

    #[test]
    fn test_normalize_tolerates_missing_fields_container() {
        let records = normalize_records(vec![json!({ "id": "rec1" })]);
        assert_eq!(records.len(), 1);
        assert!(records[0].fields.is_empty());
    }

    #[test]
    fn test_page_url_composition() {
        let client = AirtableClient::new(
            "https://api.airtable.test/v0".to_string(),
            "appBase".to_string(),
            "token".to_string(),
            AirtableTables::default(),
        )
        .with_page_size(50)
        .with_view(Some("Publicados".to_string()));

        let url = client.page_url(
            "https://api.airtable.test/v0/appBase/Alojamientos",
            Some("{zona}='maresme'"),
            Some("itrNext/rec99"),
        );

        assert!(url.contains("pageSize=50"));
        assert!(url.contains("filterByFormula=%7Bzona%7D%3D%27maresme%27"));
        assert!(url.contains("view=Publicados"));
        assert!(url.contains("offset=itrNext%2Frec99"));
    }

    #[test]
    fn test_retry_policy_does_not_retry_api_errors() {
        let policy = RetryPolicy::default();
        let err = AirtableError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!policy.is_retryable(&err));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_message_truncation_respects_char_boundaries() {
        assert_eq!(truncate_message("corto", 300), "corto");
        let long = "á".repeat(200);
        let cut = truncate_message(&long, 301);
        assert!(cut.len() <= 301);
        assert!(cut.chars().all(|c| c == 'á'));
    }
}
