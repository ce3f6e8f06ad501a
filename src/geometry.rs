//! Great-circle geometry over WGS84 coordinates.

use geo::Point;

use crate::BBOX_PADDING_DEG;

/// Mean radius of Earth, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points using the haversine formula,
/// in kilometers. Points are `(x, y) = (lng, lat)` in degrees.
///
/// Symmetric in its arguments and zero for identical inputs.
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = (b.y() - a.y()).to_radians();
    let dlng = (b.x() - a.x()).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng * 0.5).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Geographic bounding box, `south <= north` and `west <= east`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Smallest box enclosing both points.
    pub fn from_points(a: Point<f64>, b: Point<f64>) -> Self {
        Self {
            south: a.y().min(b.y()),
            west: a.x().min(b.x()),
            north: a.y().max(b.y()),
            east: a.x().max(b.x()),
        }
    }

    /// The box grown by `degrees` on every side.
    pub fn padded(self, degrees: f64) -> Self {
        Self {
            south: self.south - degrees,
            west: self.west - degrees,
            north: self.north + degrees,
            east: self.east + degrees,
        }
    }

    /// The box grown by the default request padding.
    pub fn with_default_padding(self) -> Self {
        self.padded(BBOX_PADDING_DEG)
    }
}
