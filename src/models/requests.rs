use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to assemble a dog-friendly trip plan
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TravelRequest {
    /// Region code, e.g. "maresme". Ignored when `municipio_preferido` is set.
    /// Blank values count as absent, so no length rule here; `has_locality`
    /// does the normalization-aware check.
    #[serde(default)]
    pub zona: Option<String>,
    /// Exact municipality override, e.g. "Calella".
    #[serde(default)]
    pub municipio_preferido: Option<String>,
    /// Dog size class: "pequeno", "mediano" or "grande".
    #[serde(default)]
    pub tamano_perro: Option<String>,
    #[serde(default = "default_true")]
    pub quiere_playa: bool,
    /// Trip style, e.g. "familias" or "familias_naturaleza".
    #[serde(default)]
    pub tipo_viaje: Option<String>,
    /// Advisory only; echoed back untouched.
    #[serde(default)]
    pub duracion_dias: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl TravelRequest {
    /// At least one locality field must carry a usable value.
    pub fn has_locality(&self) -> bool {
        let filled = |v: &Option<String>| {
            v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
        };
        filled(&self.zona) || filled(&self.municipio_preferido)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiere_playa_defaults_to_true() {
        let req: TravelRequest = serde_json::from_str(r#"{"zona": "maresme"}"#).unwrap();
        assert!(req.quiere_playa);
        assert!(req.has_locality());
    }

    #[test]
    fn test_blank_locality_does_not_count() {
        let req: TravelRequest =
            serde_json::from_str(r#"{"zona": "   ", "quiere_playa": false}"#).unwrap();
        assert!(!req.has_locality());
        assert!(!req.quiere_playa);
    }

    #[test]
    fn test_municipio_alone_is_enough() {
        let req: TravelRequest =
            serde_json::from_str(r#"{"municipio_preferido": "Calella"}"#).unwrap();
        assert!(req.has_locality());
    }

    #[test]
    fn test_empty_zona_with_municipio_is_valid() {
        use validator::Validate;

        let req: TravelRequest =
            serde_json::from_str(r#"{"zona": "", "municipio_preferido": "Calella"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.has_locality());
    }
}
