//! Incident event feed parsing.
//!
//! The feed is `{ success, events: [{lat, lon, type, impact, location,
//! description}], source, timestamp }`. Each accepted element becomes one
//! [`IncidentEvent`]; elements inherit the feed timestamp when present,
//! otherwise the parse time.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    Error,
    overlay::{IncidentCategory, IncidentEvent},
};

#[derive(Debug, Deserialize)]
pub struct IncidentFeed {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub events: Vec<RawIncident>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RawIncident {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub category: IncidentCategory,
    /// Severity 0-100; out-of-range values are clamped, not rejected
    pub impact: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

/// Parses a feed payload into incident events.
///
/// # Errors
///
/// Returns an error when the payload is not a parseable feed; individual
/// malformed fields inside an otherwise valid feed are handled by serde
/// defaults and clamping instead.
pub fn parse_incident_feed(json: &str) -> Result<Vec<IncidentEvent>, Error> {
    let feed: IncidentFeed = serde_json::from_str(json)?;
    let stamp = feed.timestamp.unwrap_or_else(Utc::now);

    Ok(feed
        .events
        .into_iter()
        .map(|raw| {
            IncidentEvent::new(
                raw.lat,
                raw.lon,
                raw.category,
                raw.impact,
                raw.location,
                raw.description,
                stamp,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "success": true,
        "events": [
            {
                "lat": 43.6532,
                "lon": -79.3832,
                "type": "shooting",
                "impact": 95,
                "location": "King St W & Spadina Ave",
                "description": "Shots fired outside nightclub"
            },
            {
                "lat": 43.6608,
                "lon": -79.3857,
                "type": "vandalism",
                "impact": 140,
                "location": "Yonge St & Dundas St",
                "description": ""
            }
        ],
        "source": "hardcoded",
        "timestamp": "2026-08-30T02:30:00Z"
    }"#;

    #[test]
    fn parses_events_with_categories_and_clamping() {
        let events = parse_incident_feed(FEED).unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].category, IncidentCategory::Shooting);
        assert_eq!(events[0].impact_percent, 95.0);
        assert_eq!(events[0].geometry.x(), -79.3832);

        // Unknown category falls back to Other, impact clamps to 100.
        assert_eq!(events[1].category, IncidentCategory::Other);
        assert_eq!(events[1].impact_percent, 100.0);
    }

    #[test]
    fn feed_timestamp_propagates_to_events() {
        let events = parse_incident_feed(FEED).unwrap();
        assert_eq!(events[0].timestamp.to_rfc3339(), "2026-08-30T02:30:00+00:00");
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_incident_feed("[1, 2, 3]").is_err());
    }
}
