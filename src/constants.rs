//! Constants used throughout the library

/// Average adult interpupillary distance in meters
pub const DEFAULT_INTERPUPILLARY_DISTANCE_M: f64 = 0.063;

/// Physical width of the simulated window (a laptop panel)
pub const DEFAULT_SCREEN_WIDTH_M: f64 = 0.28;

/// Physical height of the simulated window
pub const DEFAULT_SCREEN_HEIGHT_M: f64 = 0.16;

/// Weight of the previous smoothed position per frame
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.7;

/// Frustum clipping planes
pub const DEFAULT_NEAR_PLANE: f64 = 0.01;
pub const DEFAULT_FAR_PLANE: f64 = 10.0;

/// Plausible range for the estimated viewer depth
pub const DEFAULT_MIN_DEPTH_M: f64 = 0.2;
pub const DEFAULT_MAX_DEPTH_M: f64 = 2.0;

/// Viewer depth assumed before the first detection
pub const DEFAULT_INITIAL_DEPTH_M: f64 = 0.5;

/// Horizontal field of view of a typical built-in webcam
pub const DEFAULT_CAMERA_HFOV_DEG: f64 = 60.0;

/// Face-mesh topology with iris refinement
pub const FACE_MESH_LANDMARK_COUNT: usize = 478;
pub const LEFT_IRIS_CENTER_INDEX: usize = 468;
pub const RIGHT_IRIS_CENTER_INDEX: usize = 473;

/// Default window size for the moving average smoother
pub const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 5;

/// Lower bound for the observed eye separation in pixels
pub const EPSILON: f64 = 1e-6;

/// Center of the normalized image space
pub const IMAGE_CENTER: f64 = 0.5;

/// Farthest the eye may sit from the screen center, in screen widths or heights
pub const MAX_LATERAL_SCREEN_EXTENTS: f64 = 4.0;
