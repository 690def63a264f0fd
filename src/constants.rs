//! Scene constants shared by the navigation, proximity and camera systems.
//!
//! These are the defaults behind the settings resources; a config file can
//! override most of them at startup.

/// Distance the actor covers per rendered frame. Not scaled by frame time,
/// so walking speed follows the display refresh rate.
pub const WALK_STEP: f32 = 0.05;
/// Per-axis tolerance of the arrival test.
pub const ARRIVAL_TOLERANCE: f32 = 0.03;
/// Height at which the actor model rests above the floor.
pub const ACTOR_REST_HEIGHT: f32 = 0.3;
/// Name carried by the floor surface; only hits on it produce destinations.
pub const FLOOR_NAME: &str = "floor";
/// Name given to the actor model root.
pub const ACTOR_NAME: &str = "kiki";
/// Centre of the spot in front of the house, X axis.
pub const SPOT_CENTER_X: f32 = 5.0;
/// Centre of the spot in front of the house, Z axis.
pub const SPOT_CENTER_Z: f32 = 5.0;
/// Half the side length of the square trigger zone around the spot.
pub const SPOT_HALF_EXTENT: f32 = 1.5;
/// House translation Y once fully risen.
pub const HOUSE_RAISED_Y: f32 = 1.0;
/// House translation Y while hidden below the floor.
pub const HOUSE_LOWERED_Y: f32 = -3.3;
/// House translation X and Z.
pub const HOUSE_X: f32 = 5.0;
/// See [`HOUSE_X`].
pub const HOUSE_Z: f32 = 2.0;
/// Camera height while the house is shown.
pub const CAMERA_NEAR_Y: f32 = 3.0;
/// Camera height while the house is hidden.
pub const CAMERA_FAR_Y: f32 = 5.0;
/// Offset of the follow camera from the actor; Y is the resting height.
pub const CAMERA_BASE_OFFSET: [f32; 3] = [1.0, CAMERA_FAR_Y, 5.0];
/// Seconds taken by the house to rise.
pub const HOUSE_RISE_SECONDS: f32 = 1.0;
/// Seconds taken by the house to sink.
pub const HOUSE_SINK_SECONDS: f32 = 0.5;
/// Seconds taken by the camera to change height.
pub const CAMERA_SHIFT_SECONDS: f32 = 1.0;
