//! Road classification and the weight/speed tables attached to it.

use std::fmt;

/// Coarse OSM highway category used for routing.
///
/// The weight multiplier biases the shortest-path search toward faster road
/// classes; the assumed speed converts a finished path into a travel-time
/// estimate. Tags outside the routable set fall back to [`RoadClass::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unclassified,
    Unknown,
}

impl RoadClass {
    /// Maps an OSM `highway` tag value to a road class.
    pub fn from_highway(tag: &str) -> Self {
        match tag {
            "motorway" => RoadClass::Motorway,
            "trunk" => RoadClass::Trunk,
            "primary" => RoadClass::Primary,
            "secondary" => RoadClass::Secondary,
            "tertiary" => RoadClass::Tertiary,
            "residential" => RoadClass::Residential,
            "unclassified" => RoadClass::Unclassified,
            _ => RoadClass::Unknown,
        }
    }

    /// Multiplier applied to a segment's length to form its search weight.
    pub fn weight_multiplier(self) -> f64 {
        match self {
            RoadClass::Motorway => 1.0,
            RoadClass::Trunk => 1.2,
            RoadClass::Primary => 1.5,
            RoadClass::Secondary => 2.0,
            RoadClass::Tertiary => 2.5,
            RoadClass::Residential => 3.0,
            RoadClass::Unclassified => 3.5,
            RoadClass::Unknown => 2.0,
        }
    }

    /// Assumed driving speed for the class, in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            RoadClass::Motorway => 90.0,
            RoadClass::Trunk => 70.0,
            RoadClass::Primary => 60.0,
            RoadClass::Secondary => 50.0,
            RoadClass::Tertiary => 40.0,
            RoadClass::Residential => 30.0,
            RoadClass::Unclassified => 25.0,
            RoadClass::Unknown => 40.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway => "motorway",
            RoadClass::Trunk => "trunk",
            RoadClass::Primary => "primary",
            RoadClass::Secondary => "secondary",
            RoadClass::Tertiary => "tertiary",
            RoadClass::Residential => "residential",
            RoadClass::Unclassified => "unclassified",
            RoadClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
