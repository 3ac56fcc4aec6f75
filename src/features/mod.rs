// Feature extractors: one scorer per rubric dimension, each returning a
// ScoreComponent.

pub mod keywords;
pub mod length;
pub mod redundancy;
pub mod semantic;
pub mod star;

pub use keywords::keyword_coverage_score;
pub use length::answer_length_score;
pub use redundancy::{diversity_index, redundancy_score};
pub use semantic::semantic_similarity_score;
pub use star::{star_structure_score, StarComponent};
