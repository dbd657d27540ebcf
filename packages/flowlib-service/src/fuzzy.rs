pub mod cache;
pub mod index;
pub mod matcher;

pub use cache::IndexCache;
pub use index::{Field, FieldWeights, FuzzyIndex, IndexOptions, SearchHit};
pub use matcher::{MAX_PATTERN_CHARS, MIN_PARTIAL_SCORE, Pattern};
