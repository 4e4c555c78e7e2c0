use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key under which the record identifier is flattened into the
/// field map sent back to clients.
pub const ID_FIELD: &str = "id";

/// The four catalog tables queried per trip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Alojamientos,
    Restaurantes,
    Experiencias,
    Playas,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Alojamientos,
        Category::Restaurantes,
        Category::Experiencias,
        Category::Playas,
    ];

    /// Stable tag used in error maps, shuffle seeds and log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Alojamientos => "alojamientos",
            Category::Restaurantes => "restaurantes",
            Category::Experiencias => "experiencias",
            Category::Playas => "playas",
        }
    }

    /// Safety cap on total records fetched from the backend, independent of
    /// pagination cursor behavior.
    pub fn hard_limit(&self) -> usize {
        match self {
            Category::Alojamientos => 800,
            Category::Restaurantes => 800,
            Category::Experiencias => 1200,
            Category::Playas => 400,
        }
    }

    /// Size of the top-scored pool handed to the variety shuffle.
    /// `None` means the whole ranked set is eligible.
    pub fn pool_size(&self) -> Option<usize> {
        match self {
            Category::Alojamientos => Some(12),
            Category::Restaurantes => Some(15),
            Category::Experiencias => Some(30),
            Category::Playas => None,
        }
    }

    /// Number of records returned to the caller after the shuffle.
    pub fn final_size(&self) -> usize {
        match self {
            Category::Alojamientos => 3,
            Category::Restaurantes => 3,
            Category::Experiencias => 6,
            Category::Playas => 9,
        }
    }
}

/// One flattened backend record: a stable identifier plus the free-form
/// field map the filters and scorers read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>, mut fields: Map<String, Value>) -> Self {
        // "id" is reserved for the record identifier
        fields.remove(ID_FIELD);
        Self { id: id.into(), fields }
    }

    /// String value of a field, if present and actually a string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Checkbox-style field, `false` when absent or malformed.
    pub fn flag(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Multi-select field as a list of strings; malformed entries are skipped.
    pub fn list(&self, field: &str) -> Vec<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// True when the field holds a non-empty string, e.g. a URL.
    pub fn has_link(&self, field: &str) -> bool {
        self.text(field).map(|s| !s.trim().is_empty()).unwrap_or(false)
    }
}

/// A record paired with its desirability score, used transiently for ranking.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub record: CategoryRecord,
    pub score: u32,
}
