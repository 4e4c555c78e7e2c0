use crate::models::{CategoryRecord, TravelRequest};

/// Normalize a locality value for comparison: trimmed, lowercased.
#[inline]
fn normalize_locality(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Check whether a record belongs to the requested locality
///
/// Municipality takes precedence over the broader zone; when neither is
/// given the record matches unconditionally (request validation should make
/// that case unreachable).
#[inline]
pub fn matches_locality(record: &CategoryRecord, request: &TravelRequest) -> bool {
    if let Some(municipio) = request.municipio_preferido.as_deref() {
        if !municipio.trim().is_empty() {
            return record
                .text("municipio")
                .map(|m| normalize_locality(m) == normalize_locality(municipio))
                .unwrap_or(false);
        }
    }

    if let Some(zona) = request.zona.as_deref() {
        if !zona.trim().is_empty() {
            return record
                .text("zona")
                .map(|z| normalize_locality(z) == normalize_locality(zona))
                .unwrap_or(false);
        }
    }

    true
}

/// Check whether a lodging record admits the requested dog size
///
/// No size requested means every record qualifies.
#[inline]
pub fn accepts_dog_size(record: &CategoryRecord, tamano_perro: Option<&str>) -> bool {
    match tamano_perro {
        Some(size) if !size.trim().is_empty() => {
            record.list("tamanos_admitidos").contains(&size)
        }
        _ => true,
    }
}

/// Whether the trip style asks for family-oriented experiences.
#[inline]
pub fn is_family_trip(tipo_viaje: Option<&str>) -> bool {
    matches!(tipo_viaje, Some("familias") | Some("familias_naturaleza"))
}

/// Whether an experience record targets families.
#[inline]
pub fn targets_families(record: &CategoryRecord) -> bool {
    record.list("ideal_para").contains(&"familias")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: serde_json::Value) -> CategoryRecord {
        CategoryRecord::new("rec", fields.as_object().unwrap().clone())
    }

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
    fn test_municipio_match_is_case_and_whitespace_insensitive() {
        let r = record(json!({ "municipio": " Sitges " }));
        let req = request(None, Some("sitges"));
        assert!(matches_locality(&r, &req));
    }

    #[test]
    fn test_municipio_takes_precedence_over_zona() {
        let r = record(json!({ "municipio": "Calella", "zona": "maresme" }));
        // Zone matches but municipality does not; municipality wins.
        let req = request(Some("maresme"), Some("Pineda"));
        assert!(!matches_locality(&r, &req));
    }

    #[test]
    fn test_zona_match_when_no_municipio() {
        let r = record(json!({ "zona": "Maresme" }));
        assert!(matches_locality(&r, &request(Some("maresme"), None)));
        assert!(!matches_locality(&r, &request(Some("garraf"), None)));
    }

    #[test]
    fn test_record_without_locality_fields_does_not_match() {
        let r = record(json!({ "nombre": "Casa Rural" }));
        assert!(!matches_locality(&r, &request(Some("maresme"), None)));
    }

    #[test]
    fn test_no_locality_requested_matches_everything() {
        let r = record(json!({}));
        assert!(matches_locality(&r, &request(None, None)));
    }

    #[test]
    fn test_dog_size_filter() {
        let r = record(json!({ "tamanos_admitidos": ["pequeno", "mediano"] }));
        assert!(accepts_dog_size(&r, Some("mediano")));
        assert!(!accepts_dog_size(&r, Some("grande")));
        assert!(accepts_dog_size(&r, None));

        let missing = record(json!({}));
        assert!(!accepts_dog_size(&missing, Some("mediano")));
        assert!(accepts_dog_size(&missing, None));
    }

    #[test]
    fn test_family_trip_detection() {
        assert!(is_family_trip(Some("familias")));
        assert!(is_family_trip(Some("familias_naturaleza")));
        assert!(!is_family_trip(Some("pareja")));
        assert!(!is_family_trip(None));
    }

    #[test]
    fn test_targets_families() {
        let r = record(json!({ "ideal_para": ["familias", "grupos"] }));
        assert!(targets_families(&r));
        let r = record(json!({ "ideal_para": ["parejas"] }));
        assert!(!targets_families(&r));
    }
}
