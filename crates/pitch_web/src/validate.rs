use pitch_core::{Error, GeographyFilter, OutletType, Result};
use pitch_search::SearchRequest;
use serde_json::Value;
use std::str::FromStr;

/// Checks a raw search body and turns it into a [`SearchRequest`].
///
/// Fields are checked in order (brief, outlet_types, geography) and the
/// first problem is reported. Enumerated fields list every bad entry.
pub fn parse_search_body(body: &Value) -> Result<SearchRequest> {
    let brief = match body.get("brief").and_then(Value::as_str) {
        Some(brief) if !brief.trim().is_empty() => brief.to_string(),
        _ => return Err(Error::validation("brief is required and must be a non-empty string")),
    };

    let outlet_types = parse_choices::<OutletType>(body, "outlet_types", &OutletType::NAMES)?;
    let geography = parse_choices::<GeographyFilter>(body, "geography", &GeographyFilter::NAMES)?;

    Ok(SearchRequest {
        brief,
        outlet_types,
        geography,
        focus_publications: optional_text(body, "focus_publications"),
        competitors: optional_text(body, "competitors"),
        refinements: parse_refinements(body)?,
    })
}

fn parse_choices<T: FromStr>(body: &Value, field: &str, valid: &[&str]) -> Result<Vec<T>> {
    let entries = match body.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(Error::validation(format!("{} must be an array", field))),
    };

    let mut parsed = Vec::with_capacity(entries.len());
    let mut invalid = Vec::new();
    for entry in entries {
        match entry.as_str().map(T::from_str) {
            Some(Ok(value)) => parsed.push(value),
            Some(Err(_)) => invalid.push(entry.as_str().unwrap_or_default().to_string()),
            None => invalid.push(entry.to_string()),
        }
    }

    if !invalid.is_empty() {
        return Err(Error::invalid_choice(
            format!("Invalid {}: {}", field, invalid.join(", ")),
            valid,
        ));
    }
    Ok(parsed)
}

fn optional_text(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_refinements(body: &Value) -> Result<Vec<String>> {
    match body.get("refinements") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::validation("refinements must be an array of strings"))
            })
            .collect(),
        Some(_) => Err(Error::validation("refinements must be an array of strings")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rejection(body: Value) -> (String, Option<Vec<String>>) {
        match parse_search_body(&body).unwrap_err() {
            Error::Validation { message, valid } => (message, valid),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_body() {
        let request = parse_search_body(&json!({ "brief": "Grid-scale batteries" })).unwrap();
        assert_eq!(request, SearchRequest::new("Grid-scale batteries"));
    }

    #[test]
    fn test_full_body() {
        let request = parse_search_body(&json!({
            "brief": "Grid-scale batteries",
            "outlet_types": ["trade_specialist", "newsletter"],
            "geography": ["us_eu_uk"],
            "focus_publications": " Utility Dive ",
            "competitors": "",
            "refinements": ["more policy angle"]
        }))
        .unwrap();

        assert_eq!(request.outlet_types, vec![OutletType::TradeSpecialist, OutletType::Newsletter]);
        assert_eq!(request.geography, vec![GeographyFilter::UsEuUk]);
        assert_eq!(request.focus_publications.as_deref(), Some("Utility Dive"));
        assert_eq!(request.competitors, None);
        assert_eq!(request.refinements, vec!["more policy angle".to_string()]);
    }

    #[test]
    fn test_brief_checks() {
        for body in [json!({}), json!({ "brief": "   " }), json!({ "brief": 42 })] {
            let (message, valid) = rejection(body);
            assert_eq!(message, "brief is required and must be a non-empty string");
            assert!(valid.is_none());
        }
    }

    #[test]
    fn test_invalid_outlet_types_are_listed() {
        let (message, valid) = rejection(json!({
            "brief": "x",
            "outlet_types": ["newsletter", "blog", "tv"]
        }));
        assert_eq!(message, "Invalid outlet_types: blog, tv");
        assert_eq!(valid.unwrap().len(), 5);
    }

    #[test]
    fn test_shape_errors() {
        let (message, _) = rejection(json!({ "brief": "x", "outlet_types": "newsletter" }));
        assert_eq!(message, "outlet_types must be an array");

        let (message, _) = rejection(json!({ "brief": "x", "geography": "us" }));
        assert_eq!(message, "geography must be an array");
    }

    #[test]
    fn test_invalid_geography() {
        let (message, valid) = rejection(json!({ "brief": "x", "geography": ["mars"] }));
        assert_eq!(message, "Invalid geography: mars");
        assert_eq!(valid.unwrap(), vec!["us", "us_eu_uk", "global"]);
    }

    #[test]
    fn test_outlet_types_checked_before_geography() {
        let (message, _) = rejection(json!({
            "brief": "x",
            "outlet_types": ["blog"],
            "geography": ["mars"]
        }));
        assert_eq!(message, "Invalid outlet_types: blog");
    }
}
