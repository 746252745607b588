use crate::presentation::score_bar::ScoreBar;

pub const DEFAULT_BAR_WIDTH: usize = 30;

const RESULTS_HEADING: &str = "Your Facial Symmetry Score";

/// Renders score bars as plain text, one label line and one bar line
/// per score.
pub fn render_scores(bars: &[ScoreBar], width: usize) -> String {
    let mut out = String::from(RESULTS_HEADING);
    out.push('\n');
    for bar in bars {
        out.push_str(&bar.label);
        out.push('\n');
        out.push_str(&render_bar(bar.fill_percent, width));
        out.push('\n');
    }
    out
}

fn render_bar(fill_percent: f64, width: usize) -> String {
    let filled = ((fill_percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
