use crate::models::CategoryRecord;

/// Activity tags that earn the outdoor bonus for experiences.
const OUTDOOR_TAGS: [&str; 3] = ["aire_libre", "senderismo", "naturaleza"];

/// Desirability score for a lodging record
///
/// Scoring:
///   +3 family-friendly, +2 eco-certified, +1 accessible,
///   +1 multi-pet allowed, +1 website, +1 map link
pub fn score_alojamiento(record: &CategoryRecord) -> u32 {
    let mut score = 0;
    if record.flag("apto_familias") {
        score += 3;
    }
    if record.flag("eco_friendly") {
        score += 2;
    }
    if record.flag("accesible") {
        score += 1;
    }
    if record.flag("admite_varios_perros") {
        score += 1;
    }
    if record.has_link("web") {
        score += 1;
    }
    if record.has_link("mapa") {
        score += 1;
    }
    score
}

/// Desirability score for a dining record: +2 terrace, +1 website, +1 map link
pub fn score_restaurante(record: &CategoryRecord) -> u32 {
    let mut score = 0;
    if record.flag("terraza") {
        score += 2;
    }
    if record.has_link("web") {
        score += 1;
    }
    if record.has_link("mapa") {
        score += 1;
    }
    score
}

/// Desirability score for an experience record
///
/// Scoring: +2 eco-certified, +1 website, +1 map link, +1 outdoor activity tag
pub fn score_experiencia(record: &CategoryRecord) -> u32 {
    let mut score = 0;
    if record.flag("eco_friendly") {
        score += 2;
    }
    if record.has_link("web") {
        score += 1;
    }
    if record.has_link("mapa") {
        score += 1;
    }
    let tags = record.list("tipo_actividad");
    if tags.iter().any(|t| OUTDOOR_TAGS.contains(t)) {
        score += 1;
    }
    score
}
