// Answer length: a plain word-count heuristic, no model involved.

use crate::scoring::thresholds::LengthBounds;
use crate::scoring::ScoreComponent;

const TOO_SHORT_RATIO: f64 = 0.5;
const DETAILED_RATIO: f64 = 0.9;

pub fn answer_length_score(user_text: &str, bounds: &LengthBounds) -> ScoreComponent {
    let words = user_text.split_whitespace().count();

    if words < bounds.min_words {
        ScoreComponent::from_ratio(
            TOO_SHORT_RATIO,
            format!(
                "Answer too short ({words} words), aim for {}+",
                bounds.min_words
            ),
        )
    } else if words > bounds.max_words {
        ScoreComponent::from_ratio(DETAILED_RATIO, format!("Answer detailed ({words} words)"))
    } else {
        ScoreComponent::from_ratio(1.0, format!("Answer length optimal ({words} words)"))
    }
}
