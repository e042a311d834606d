use pitch_core::ArticleMatch;

use crate::ranking::round_half_up;

/// One-paragraph explanation of why a reporter was ranked.
///
/// `articles` must already be ordered best match first.
pub fn build_justification(name: &str, articles: &[ArticleMatch], score: f64) -> String {
    let overall = percent(score);

    let Some(top) = articles.first() else {
        return format!("{} matches your brief. Overall relevance score: {}%.", name, overall);
    };

    let count = articles.len();
    format!(
        "{} has {} recent article{} closely matching your brief (top match: {}% similarity on \"{}\"). Overall relevance score: {}%.",
        name,
        count,
        if count == 1 { "" } else { "s" },
        percent(top.similarity),
        top.title,
        overall
    )
}

fn percent(value: f64) -> i64 {
    round_half_up(value * 100.0, 0) as i64
}
