//! Raw serde types for the Overpass API JSON response.

use serde::Deserialize;

/// Top-level Overpass response. A body without an `elements` list fails
/// deserialization and is reported as a malformed upstream response.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[allow(dead_code)]
    pub id: i64,
    #[serde(default)]
    pub tags: Option<OverpassTags>,
    /// Present on way elements when the query asks for `out geom`.
    #[serde(default)]
    pub geometry: Option<Vec<OverpassVertex>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OverpassTags {
    pub highway: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct OverpassVertex {
    pub lat: f64,
    pub lon: f64,
}
