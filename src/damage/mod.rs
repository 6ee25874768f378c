pub mod pipeline;

pub use pipeline::{compute_damage, DamageResult, DefenseStats, SourceStats};
