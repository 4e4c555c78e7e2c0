use crate::core::{
    filters::{accepts_dog_size, is_family_trip, matches_locality, targets_families},
    scoring::{score_alojamiento, score_experiencia, score_restaurante},
    shuffle::shuffle_seeded,
};
use crate::models::{Category, CategoryRecord, ScoredCandidate, TravelRequest};

/// Result of one category's selection pipeline
#[derive(Debug)]
pub struct Selection {
    pub records: Vec<CategoryRecord>,
    /// Size of the ranked pool the shuffle drew from, for diagnostics.
    pub pool_size: usize,
}

/// Per-category selection pipeline
///
/// # Pipeline stages
/// 1. Eligibility filtering (locality, category-specific rules)
/// 2. Desirability scoring
/// 3. Stable sort by score descending, truncated to the top-K pool
/// 4. Seeded variety shuffle and final truncation
#[derive(Debug, Clone, Default)]
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline for one category.
    ///
    /// The shuffle seed is `"{request_id}|{category_tag}"`, so retries of the
    /// same request reproduce the same selection while distinct requests see
    /// different orderings over the same pool.
    pub fn select(
        &self,
        category: Category,
        records: Vec<CategoryRecord>,
        request: &TravelRequest,
        request_id: &str,
    ) -> Selection {
        let mut pool = self.ranked_pool(category, records, request);
        let pool_size = pool.len();

        let seed = format!("{}|{}", request_id, category.tag());
        shuffle_seeded(&mut pool, &seed);
        pool.truncate(category.final_size());

        Selection {
            records: pool,
            pool_size,
        }
    }

    /// Stages 1–3: filter, score and rank, truncated to the category's pool.
    pub fn ranked_pool(
        &self,
        category: Category,
        records: Vec<CategoryRecord>,
        request: &TravelRequest,
    ) -> Vec<CategoryRecord> {
        let local: Vec<CategoryRecord> = records
            .into_iter()
            .filter(|r| matches_locality(r, request))
            .collect();

        let eligible = match category {
            Category::Alojamientos => {
                let size = request.tamano_perro.as_deref();
                local
                    .into_iter()
                    .filter(|r| accepts_dog_size(r, size))
                    .collect()
            }
            Category::Experiencias => {
                narrow_to_families(local, request.tipo_viaje.as_deref())
            }
            Category::Restaurantes | Category::Playas => local,
        };

        let mut scored: Vec<ScoredCandidate> = eligible
            .into_iter()
            .map(|record| ScoredCandidate {
                score: match category {
                    Category::Alojamientos => score_alojamiento(&record),
                    Category::Restaurantes => score_restaurante(&record),
                    Category::Experiencias => score_experiencia(&record),
                    // Beaches carry no scoring; pagination order stands.
                    Category::Playas => 0,
                },
                record,
            })
            .collect();

        // Stable sort keeps fetch order among equal scores.
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(pool_size) = category.pool_size() {
            scored.truncate(pool_size);
        }

        scored.into_iter().map(|c| c.record).collect()
    }
}

/// Narrow experiences to family-targeted records for family trips, but only
/// when the narrowing leaves at least one candidate. Over-filtering to an
/// empty list is worse than showing general experiences.
fn narrow_to_families(
    records: Vec<CategoryRecord>,
    tipo_viaje: Option<&str>,
) -> Vec<CategoryRecord> {
    if !is_family_trip(tipo_viaje) {
        return records;
    }

    let family: Vec<CategoryRecord> = records
        .iter()
        .filter(|r| targets_families(r))
        .cloned()
        .collect();

    if family.is_empty() {
        records
    } else {
        family
    }
}
