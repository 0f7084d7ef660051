use crate::models::SearchResult;

/// `(place_id, name, latitude, longitude, type, importance)`
const PLACES: [(&str, &str, f64, f64, &str, f64); 3] = [
    (
        "local-golden-gate-bridge",
        "Golden Gate Bridge, San Francisco, CA",
        37.8199,
        -122.4783,
        "landmark",
        0.9,
    ),
    (
        "local-alcatraz-island",
        "Alcatraz Island, San Francisco, CA",
        37.8267,
        -122.4233,
        "island",
        0.8,
    ),
    (
        "local-fishermans-wharf",
        "Fisherman's Wharf, San Francisco, CA",
        37.8080,
        -122.4177,
        "tourism",
        0.7,
    ),
];

/// The built-in place set
pub fn places() -> Vec<SearchResult> {
    PLACES
        .iter()
        .map(
            |&(place_id, name, latitude, longitude, place_type, importance)| SearchResult {
                place_id: place_id.to_string(),
                display_name: name.to_string(),
                latitude,
                longitude,
                address: None,
                place_type: Some(place_type.to_string()),
                importance: Some(importance),
            },
        )
        .collect()
}

/// Built-in places whose display name contains `query`, ignoring case
pub fn search(query: &str) -> Vec<SearchResult> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    places()
        .into_iter()
        .filter(|place| place.display_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_ignores_case() {
        let hits = search("GOLDEN");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].latitude, 37.8199);
        assert_eq!(hits[0].longitude, -122.4783);

        assert_eq!(search("san francisco").len(), 3);
        assert!(search("Tokyo").is_empty());
        assert!(search("  ").is_empty());
    }
}
