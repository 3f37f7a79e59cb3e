//! Named tunables shared by every predicate and transition guard.

use serde::{Deserialize, Serialize};

/// Threshold constants, in metres and metres per second.
///
/// Predicates reference these at fixed multipliers (for example "twice the
/// walk/stay threshold"), so they are kept as named fields rather than inline
/// literals. Distance thresholds are multiplied by `distance_scale` before
/// being compared with record distances, which lets a machine consume feature
/// logs recorded in centimetres (`distance_scale = 100.0`).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Speed separating walking from standing.
    pub walk_stay_threshold: f64,
    /// Station proximity along X.
    pub close_to_station_x: f64,
    /// Station proximity along Y.
    pub close_to_station_y: f64,
    /// Radial station proximity.
    pub close_to_station: f64,
    /// Extra margin either side of a sidewalk.
    pub margin_near_sidewalks: f64,
    /// Length of a station along the sidewalk.
    pub station_length: f64,
    /// Half-angle of the gaze cone, in degrees. Consumed by feature generation.
    pub gazing_angle_deg: f64,
    /// Record distance units per metre.
    pub distance_scale: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            walk_stay_threshold: 0.3,
            close_to_station_x: 3.0,
            close_to_station_y: 2.0,
            close_to_station: 3.0,
            margin_near_sidewalks: 1.0,
            station_length: 5.0,
            gazing_angle_deg: 40.0,
            distance_scale: 1.0,
        }
    }
}

impl Thresholds {
    /// `factor` times the walk/stay threshold.
    pub fn walk(&self, factor: f64) -> f64 {
        factor * self.walk_stay_threshold
    }

    /// Convert a distance in metres into record units.
    pub fn distance(&self, metres: f64) -> f64 {
        metres * self.distance_scale
    }

    /// Cosine of the gaze half-angle.
    pub fn gazing_angle_cos(&self) -> f64 {
        self.gazing_angle_deg.to_radians().cos()
    }

    /// Every tunable with its field name, for validation and reporting.
    pub fn named_values(&self) -> [(&'static str, f64); 8] {
        [
            ("walk_stay_threshold", self.walk_stay_threshold),
            ("close_to_station_x", self.close_to_station_x),
            ("close_to_station_y", self.close_to_station_y),
            ("close_to_station", self.close_to_station),
            ("margin_near_sidewalks", self.margin_near_sidewalks),
            ("station_length", self.station_length),
            ("gazing_angle_deg", self.gazing_angle_deg),
            ("distance_scale", self.distance_scale),
        ]
    }
}
