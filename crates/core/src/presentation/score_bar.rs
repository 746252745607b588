use crate::analysis::domain::score_map::ScoreMap;

/// One rendered result row: a label and a proportional bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreBar {
    pub label: String,
    pub value: f64,
    /// Bar length as a percentage of the full width, within [0, 100].
    pub fill_percent: f64,
}

impl ScoreBar {
    pub fn new(feature: &str, value: f64) -> Self {
        Self {
            label: format!("{}: {value}%", display_name(feature)),
            value,
            fill_percent: clamp_fill(value),
        }
    }

    /// Builds bars in the order the service returned the scores.
    pub fn from_scores(scores: &ScoreMap) -> Vec<Self> {
        scores.iter().map(|(name, value)| Self::new(name, value)).collect()
    }
}

/// `"jaw_line"` -> `"Jaw line"`.
pub fn display_name(feature: &str) -> String {
    let spaced = feature.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn clamp_fill(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
