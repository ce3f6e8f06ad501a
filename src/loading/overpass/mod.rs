//! Road-data fetching from an Overpass-style provider.

mod model;

use geo::Point;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::Error;
use crate::geometry::BoundingBox;
use crate::loading::RouterConfig;
use crate::model::{RoadClass, Way};

use model::OverpassResponse;

/// A provider of road ways around a pair of endpoints.
///
/// [`OverpassSource`] is the production implementation; tests inject
/// in-memory implementations to exercise the routing pipeline without a
/// network.
pub trait RoadDataSource: Send + Sync {
    /// Fetches every routable way inside the padded bounding box enclosing
    /// the two endpoints. Fails with [`Error::EmptyArea`] when the area
    /// contains no roads.
    fn fetch(&self, source: Point<f64>, destination: Point<f64>) -> Result<Vec<Way>, Error>;
}

/// Blocking Overpass API client. One network request per `fetch` call, no
/// retries; errors propagate to the router.
pub struct OverpassSource {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl OverpassSource {
    pub fn new(config: &RouterConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("viaroute/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.overpass_url.clone(),
            timeout_secs: config.timeout.as_secs().max(1),
        })
    }

    /// Overpass QL query for all routable road classes inside the box.
    fn query(&self, bbox: &BoundingBox) -> String {
        format!(
            "[out:json][timeout:{}];\n\
             (\n  way[\"highway\"~\"^(motorway|trunk|primary|secondary|tertiary|residential|unclassified)$\"]\
             ({:.6},{:.6},{:.6},{:.6});\n);\nout geom;",
            self.timeout_secs, bbox.south, bbox.west, bbox.north, bbox.east
        )
    }
}

impl RoadDataSource for OverpassSource {
    fn fetch(&self, source: Point<f64>, destination: Point<f64>) -> Result<Vec<Way>, Error> {
        let bbox = BoundingBox::from_points(source, destination).with_default_padding();
        let query = self.query(&bbox);
        debug!("Overpass query:\n{query}");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    Error::UpstreamTimeout
                } else {
                    Error::Transport(e)
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(Error::UpstreamRateLimited);
        }
        if !status.is_success() {
            return Err(Error::UpstreamServerError(status.as_u16()));
        }

        let body = response.text().map_err(|e| {
            if e.is_timeout() {
                Error::UpstreamTimeout
            } else {
                Error::Transport(e)
            }
        })?;
        let parsed: OverpassResponse =
            serde_json::from_str(&body).map_err(|e| Error::UpstreamBadShape(e.to_string()))?;

        let ways = ways_from_elements(parsed);
        if ways.is_empty() {
            return Err(Error::EmptyArea);
        }
        info!(
            "Fetched {} ways for bbox {:.4},{:.4},{:.4},{:.4}",
            ways.len(),
            bbox.south,
            bbox.west,
            bbox.north,
            bbox.east
        );
        Ok(ways)
    }
}

/// Converts raw Overpass elements into [`Way`] records, dropping anything
/// that is not a way, has no `highway` tag, or carries fewer than two
/// geometry points.
fn ways_from_elements(response: OverpassResponse) -> Vec<Way> {
    response
        .elements
        .into_iter()
        .filter(|e| e.kind == "way")
        .filter_map(|e| {
            let tags = e.tags?;
            let class = RoadClass::from_highway(tags.highway.as_deref()?);
            let geometry: Vec<Point<f64>> = e
                .geometry?
                .iter()
                .map(|v| Point::new(v.lon, v.lat))
                .collect();
            if geometry.len() < 2 {
                return None;
            }
            Some(Way {
                geometry,
                class,
                name: tags.name,
            })
        })
        .collect()
}
