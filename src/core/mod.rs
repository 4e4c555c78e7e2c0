// Core algorithm exports
pub mod filters;
pub mod planner;
pub mod scoring;
pub mod shuffle;

pub use filters::{accepts_dog_size, is_family_trip, matches_locality, targets_families};
pub use planner::{Planner, Selection};
pub use scoring::{score_alojamiento, score_experiencia, score_restaurante};
pub use shuffle::{seed_from, shuffle_seeded, XorShift32};
