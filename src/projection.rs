//! Off-axis perspective projection.
//!
//! The physical screen is a fixed rectangle centered on the world origin in
//! the `z = 0` plane. Projecting its corners through the viewer's eye onto the
//! near plane gives an asymmetric frustum, so the scene behind the screen stays
//! put while the eye moves and the screen behaves like a window.

use crate::{
    config::CalibrationConfig, constants::MAX_LATERAL_SCREEN_EXTENTS,
    position_estimator::ViewerPosition, Result,
};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::Serialize;

/// Asymmetric frustum extents on the near plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frustum {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub near: f64,
    pub far: f64,
}

impl Frustum {
    /// Frustum through the physical screen as seen from `eye`
    ///
    /// `eye.z` must be positive; use [`clamp_eye`] on untrusted positions.
    #[must_use]
    pub fn off_axis(eye: ViewerPosition, calibration: &CalibrationConfig) -> Self {
        let half_width = calibration.screen_width_m / 2.0;
        let half_height = calibration.screen_height_m / 2.0;
        let near = calibration.near_plane;
        let scale = near / eye.z;

        Self {
            left: (-half_width - eye.x) * scale,
            right: (half_width - eye.x) * scale,
            bottom: (-half_height - eye.y) * scale,
            top: (half_height - eye.y) * scale,
            near,
            far: calibration.far_plane,
        }
    }

    /// Stretch the horizontal extents by `factor` around the frustum center
    #[must_use]
    pub fn scale_horizontal(self, factor: f64) -> Self {
        let center = (self.left + self.right) / 2.0;
        let half = (self.right - self.left) / 2.0 * factor;
        Self {
            left: center - half,
            right: center + half,
            ..self
        }
    }

    /// OpenGL-style perspective matrix (right-handed, clip z in [-1, 1])
    #[must_use]
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let (l, r, b, t) = (self.left, self.right, self.bottom, self.top);
        let (n, f) = (self.near, self.far);

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            2.0 * n / (r - l), 0.0,               (r + l) / (r - l),  0.0,
            0.0,               2.0 * n / (t - b), (t + b) / (t - b),  0.0,
            0.0,               0.0,               -(f + n) / (f - n), -2.0 * f * n / (f - n),
            0.0,               0.0,               -1.0,               0.0,
        );
        matrix
    }
}

/// Where the virtual camera sits and what it looks at
///
/// The camera always aims at the screen center; only its position and the
/// frustum follow the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub position: Point3<f64>,
    pub look_at: Point3<f64>,
    pub up: Vector3<f64>,
}

impl CameraPlacement {
    #[must_use]
    pub fn looking_at_screen(eye: ViewerPosition) -> Self {
        Self {
            position: eye.to_point(),
            look_at: Point3::origin(),
            up: Vector3::y(),
        }
    }

    /// Right-handed view matrix for renderers that want one
    #[must_use]
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.look_at, &self.up)
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub frustum: Frustum,
    pub projection: Matrix4<f64>,
    pub camera: CameraPlacement,
}

/// Bring an eye position into the range the frustum math accepts
///
/// Depth is bounded to `[near_plane, far_plane]`, so the floor is the near
/// clipping distance and an eye beyond the far plane is pulled in to it.
/// Lateral offsets are bounded to [`MAX_LATERAL_SCREEN_EXTENTS`] screen widths
/// (heights for `y`) from the center. Non-finite lateral components fall back
/// to center and a non-finite depth falls back to the floor. An inverted
/// calibration never panics here; [`OffAxisProjector::new`] rejects it.
#[must_use]
pub fn clamp_eye(eye: ViewerPosition, calibration: &CalibrationConfig) -> ViewerPosition {
    let bound = |v: f64, extent: f64| {
        let limit = extent * MAX_LATERAL_SCREEN_EXTENTS;
        if v.is_finite() {
            v.max(-limit).min(limit)
        } else {
            0.0
        }
    };
    let z = if eye.z.is_nan() { calibration.near_plane } else { eye.z };

    ViewerPosition::new(
        bound(eye.x, calibration.screen_width_m),
        bound(eye.y, calibration.screen_height_m),
        z.min(calibration.far_plane).max(calibration.near_plane),
    )
}

/// Stateless projector from viewer position to render view
#[derive(Debug, Clone, Copy)]
pub struct OffAxisProjector {
    calibration: CalibrationConfig,
}

impl OffAxisProjector {
    /// Create a projector for a validated calibration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the calibration is invalid
    pub fn new(calibration: CalibrationConfig) -> Result<Self> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    /// Build the projection and camera placement for `eye`
    ///
    /// `aspect` is the viewport width over height. When it differs from the
    /// physical screen's aspect the horizontal extent is rescaled so pixels stay
    /// square; a non-positive or non-finite aspect is treated as a match.
    #[must_use]
    pub fn project(&self, eye: ViewerPosition, aspect: f64) -> RenderView {
        let eye = clamp_eye(eye, &self.calibration);
        let mut frustum = Frustum::off_axis(eye, &self.calibration);

        if aspect.is_finite() && aspect > 0.0 {
            let factor = aspect / self.calibration.screen_aspect();
            if (factor - 1.0).abs() > f64::EPSILON {
                frustum = frustum.scale_horizontal(factor);
            }
        }

        RenderView {
            frustum,
            projection: frustum.projection_matrix(),
            camera: CameraPlacement::looking_at_screen(eye),
        }
    }

    #[must_use]
    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }
}
