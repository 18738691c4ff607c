//! Search Logic
//!
//! Pure functions for filtering stations by a search query.
//! Supports wildcard patterns using the glob crate.

use crate::api::Station;

/// Match a search query against a station name or id using wildcard patterns
///
/// # Pattern Rules
/// - "*" matches any sequence of characters
/// - Matches are case-insensitive
/// - Matches the whole text, any word of it, or any substring
///
/// # Examples
/// ```
/// use kelitui::logic::search::search_matches;
///
/// assert!(search_matches("oulu", "Vt4 Oulu, Kempele"));
/// assert!(search_matches("vt4*", "Vt4 Oulu, Kempele"));
/// assert!(search_matches("*kempele", "Vt4 Oulu, Kempele"));
/// assert!(!search_matches("tampere", "Vt4 Oulu, Kempele"));
/// ```
pub fn search_matches(query: &str, text: &str) -> bool {
    if query.is_empty() {
        return true; // Empty query matches everything
    }

    let query_lower = query.to_lowercase();
    let text_lower = text.to_lowercase();

    // Try glob pattern matching first
    if let Ok(pattern) = glob::Pattern::new(&query_lower) {
        if pattern.matches(&text_lower) {
            return true;
        }

        // Match against each word
        for word in text_lower.split(|c: char| c.is_whitespace() || c == ',') {
            if !word.is_empty() && pattern.matches(word) {
                return true;
            }
        }
    }

    // Fallback: simple substring match (also covers invalid glob patterns)
    text_lower.contains(&query_lower)
}

/// Filter stations by query, matching name or id.
///
/// Stations whose name starts with the query come first; otherwise the
/// list order is kept. At most `limit` results are returned.
pub fn filter_stations<'a>(stations: &'a [Station], query: &str, limit: usize) -> Vec<&'a Station> {
    let query_lower = query.trim().to_lowercase();
    let query = query.trim();

    let mut matches: Vec<&Station> = stations
        .iter()
        .filter(|s| search_matches(query, &s.name) || search_matches(query, &s.id))
        .collect();

    if !query_lower.is_empty() {
        // Stable sort keeps list order within each group
        matches.sort_by_key(|s| !s.name.to_lowercase().starts_with(&query_lower));
    }
    matches.truncate(limit);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, name: &str) -> Station {
        Station {
            id: id.to_string(),
            name: name.to_string(),
            longitude: 25.0,
            latitude: 64.0,
            updated_time: None,
        }
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(search_matches("", "anything"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(search_matches("OULU", "oulu"));
        assert!(search_matches("oulu", "OULU"));
    }

    #[test]
    fn test_wildcard_word() {
        assert!(search_matches("kemp*", "Vt4 Oulu, Kempele"));
        assert!(!search_matches("kemp*x", "Vt4 Oulu, Kempele"));
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_substring() {
        assert!(search_matches("[vt", "tie [vt4"));
    }

    #[test]
    fn test_filter_by_id() {
        let stations = vec![station("C01503", "Oulu"), station("C04507", "Kuopio")];
        let found = filter_stations(&stations, "c045", 10);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Kuopio");
    }

    #[test]
    fn test_prefix_matches_first() {
        let stations = vec![
            station("1", "Vt4 Oulu"),
            station("2", "Oulunsalo"),
            station("3", "Kt 20 Oulu"),
        ];
        let found = filter_stations(&stations, "oulu", 10);
        let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_limit() {
        let stations: Vec<Station> = (0..20).map(|i| station(&i.to_string(), "Tie")).collect();
        assert_eq!(filter_stations(&stations, "tie", 5).len(), 5);
    }
}
