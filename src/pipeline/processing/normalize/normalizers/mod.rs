// Base trait and utilities for kind-specific normalizers
pub mod base;

// Individual normalizer implementations
pub mod controversy;
pub mod participation;
pub mod popularity;

// Re-export the main components
pub use base::{FieldReader, KindNormalizer, LastWins, MetricsNormalizer};
pub use controversy::ControversyNormalizer;
pub use participation::ParticipationNormalizer;
pub use popularity::PopularityNormalizer;
