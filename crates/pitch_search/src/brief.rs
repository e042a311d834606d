/// Appends optional publication and competitor context to a brief so the
/// embedding carries that signal too. Blank context is ignored.
pub fn enrich_brief(brief: &str, focus_publications: Option<&str>, competitors: Option<&str>) -> String {
    let mut enriched = brief.to_string();

    if let Some(focus) = non_blank(focus_publications) {
        enriched.push_str(&format!(" Focus publications: {}.", focus));
    }
    if let Some(competitors) = non_blank(competitors) {
        enriched.push_str(&format!(" Competitors and context: {}.", competitors));
    }

    enriched
}

/// Joins a conversation's follow-up refinements into the single text that is
/// embedded and blended into the brief vector. `None` when nothing is left
/// after dropping blank entries.
pub fn refinement_text(refinements: &[String]) -> Option<String> {
    let parts: Vec<&str> = refinements
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(". "))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
