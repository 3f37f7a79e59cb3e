//! Per-tick feature snapshot consumed by the classifier.
//!
//! Records are produced by an upstream feature-generation stage. The machine
//! treats every field as ground truth for the tick and performs no geometry of
//! its own. Field names on the wire match the feature-log column headers.

use crate::core::state::StateLabel;
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Problems that make a record unfit to reach the classifier.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    #[error("field '{field}' is not finite ({value})")]
    NonFinite { field: &'static str, value: f64 },

    #[error("timestamp went backwards ({previous} -> {current})")]
    TimestampRegressed { previous: i64, current: i64 },
}

/// One timestamped snapshot of pedestrian and AGV kinematics, spatial
/// relation to the nearest station, and gaze/orientation flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    // Kinematics
    #[serde(rename = "AGV_distance_X")]
    pub agv_distance_x: f64,
    #[serde(rename = "AGV_distance_Y")]
    pub agv_distance_y: f64,
    #[serde(rename = "AGV_speed_X")]
    pub agv_speed_x: f64,
    #[serde(rename = "AGV_speed_Y")]
    pub agv_speed_y: f64,
    #[serde(rename = "AGV_speed")]
    pub agv_speed: f64,
    #[serde(rename = "User_speed_X")]
    pub user_speed_x: f64,
    #[serde(rename = "User_speed_Y")]
    pub user_speed_y: f64,
    #[serde(rename = "User_speed")]
    pub user_speed: f64,
    #[serde(rename = "User_velocity_X")]
    pub user_velocity_x: f64,
    #[serde(rename = "User_velocity_Y")]
    pub user_velocity_y: f64,
    #[serde(rename = "Wait_time")]
    pub wait_time: f64,

    // Spatial relation
    #[serde(rename = "On_sidewalks")]
    pub on_sidewalks: bool,
    #[serde(rename = "On_road")]
    pub on_road: bool,
    #[serde(rename = "closest_station")]
    pub closest_station: i32,
    #[serde(rename = "distance_to_closest_station")]
    pub distance_to_closest_station: f64,
    #[serde(rename = "distance_to_closest_station_X")]
    pub distance_to_closest_station_x: f64,
    #[serde(rename = "distance_to_closest_station_Y")]
    pub distance_to_closest_station_y: f64,
    #[serde(rename = "closest_station_dir_X")]
    pub closest_station_dir_x: f64,
    #[serde(rename = "closest_station_dir_Y")]
    pub closest_station_dir_y: f64,
    #[serde(rename = "start_station_X")]
    pub start_station_x: f64,
    #[serde(rename = "start_station_Y")]
    pub start_station_y: f64,
    #[serde(rename = "end_station_X")]
    pub end_station_x: f64,
    #[serde(rename = "end_station_Y")]
    pub end_station_y: f64,
    #[serde(rename = "distance_from_start_station_X")]
    pub distance_from_start_station_x: f64,
    #[serde(rename = "distance_from_start_station_Y")]
    pub distance_from_start_station_y: f64,
    #[serde(rename = "distance_from_end_station_X")]
    pub distance_from_end_station_x: f64,
    #[serde(rename = "distance_from_end_station_Y")]
    pub distance_from_end_station_y: f64,
    #[serde(rename = "Gazing_station")]
    pub gazing_station: i32,
    #[serde(rename = "gazing_station_direction_cos")]
    pub gazing_station_direction_cos: f64,

    // Orientation and intent
    #[serde(rename = "facing_along_sidewalk")]
    pub facing_along_sidewalk: bool,
    #[serde(rename = "facing_to_road")]
    pub facing_to_road: bool,
    #[serde(rename = "facing_start_station")]
    pub facing_start_station: bool,
    #[serde(rename = "facing_end_station")]
    pub facing_end_station: bool,
    #[serde(rename = "looking_at_AGV")]
    pub looking_at_agv: bool,
    #[serde(rename = "looking_at_closest_station")]
    pub looking_at_closest_station: bool,
    #[serde(rename = "user_agv_direction_cos")]
    pub user_agv_direction_cos: f64,
    #[serde(rename = "possible_interaction")]
    pub possible_interaction: bool,
    #[serde(rename = "intent_to_cross")]
    pub intent_to_cross: bool,

    // Raw positions carried through from the source log
    #[serde(rename = "GazeDirection_X")]
    pub gaze_direction_x: f64,
    #[serde(rename = "GazeDirection_Y")]
    pub gaze_direction_y: f64,
    #[serde(rename = "AGV_X")]
    pub agv_x: f64,
    #[serde(rename = "AGV_Y")]
    pub agv_y: f64,
    #[serde(rename = "User_X")]
    pub user_x: f64,
    #[serde(rename = "User_Y")]
    pub user_y: f64,
    #[serde(rename = "TimestampID")]
    pub timestamp_id: i64,

    /// Ground-truth label, present only in annotated traces.
    #[serde(rename = "state", default)]
    pub state: Option<StateLabel>,
}

impl FeatureRecord {
    /// Every floating-point field with its wire name.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 32] {
        [
            ("AGV_distance_X", self.agv_distance_x),
            ("AGV_distance_Y", self.agv_distance_y),
            ("AGV_speed_X", self.agv_speed_x),
            ("AGV_speed_Y", self.agv_speed_y),
            ("AGV_speed", self.agv_speed),
            ("User_speed_X", self.user_speed_x),
            ("User_speed_Y", self.user_speed_y),
            ("User_speed", self.user_speed),
            ("User_velocity_X", self.user_velocity_x),
            ("User_velocity_Y", self.user_velocity_y),
            ("Wait_time", self.wait_time),
            ("distance_to_closest_station", self.distance_to_closest_station),
            ("distance_to_closest_station_X", self.distance_to_closest_station_x),
            ("distance_to_closest_station_Y", self.distance_to_closest_station_y),
            ("closest_station_dir_X", self.closest_station_dir_x),
            ("closest_station_dir_Y", self.closest_station_dir_y),
            ("start_station_X", self.start_station_x),
            ("start_station_Y", self.start_station_y),
            ("end_station_X", self.end_station_x),
            ("end_station_Y", self.end_station_y),
            ("distance_from_start_station_X", self.distance_from_start_station_x),
            ("distance_from_start_station_Y", self.distance_from_start_station_y),
            ("distance_from_end_station_X", self.distance_from_end_station_x),
            ("distance_from_end_station_Y", self.distance_from_end_station_y),
            ("gazing_station_direction_cos", self.gazing_station_direction_cos),
            ("user_agv_direction_cos", self.user_agv_direction_cos),
            ("GazeDirection_X", self.gaze_direction_x),
            ("GazeDirection_Y", self.gaze_direction_y),
            ("AGV_X", self.agv_x),
            ("AGV_Y", self.agv_y),
            ("User_X", self.user_x),
            ("User_Y", self.user_y),
        ]
    }

    /// Check every numeric field, accumulating ALL violations.
    ///
    /// The classifier itself is total over any values, but a NaN or infinity
    /// means the upstream stage failed to produce the field; such ticks are
    /// skipped at the ingestion boundary rather than classified.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<RecordError>> {
        let checks: Vec<Validation<(), NonEmptyVec<RecordError>>> = self
            .numeric_fields()
            .into_iter()
            .map(|(field, value)| {
                if value.is_finite() {
                    Validation::success(())
                } else {
                    Validation::fail(RecordError::NonFinite { field, value })
                }
            })
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// [`FeatureRecord::validate`] as a `Result`, listing every violation.
    pub fn check_finite(&self) -> Result<(), Vec<RecordError>> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }
}
