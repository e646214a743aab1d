//! Head-tracked off-axis projection for a "window into the screen" effect.
//!
//! The library turns a stream of noisy facial landmarks into a stable viewer
//! eye position and builds an asymmetric perspective frustum from it, so a
//! rendered scene appears to sit behind the physical display and shifts with
//! head motion (motion parallax).
//!
//! The pipeline consists of:
//! 1. Depth and lateral position from the two eye centers
//! 2. Temporal smoothing of the position
//! 3. Off-axis frustum through the fixed screen rectangle
//!
//! Face detection, video capture and rendering are collaborators supplied by
//! the caller through [`pipeline::LandmarkDetector`] and
//! [`pipeline::SceneRenderer`].
//!
//! # Examples
//!
//! ## Estimating and projecting directly
//!
//! ```
//! use parallax_window::{
//!     config::Config,
//!     landmarks::{FrameSize, Landmark, LandmarkFrame},
//!     position_estimator::PositionEstimator,
//!     projection::OffAxisProjector,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut estimator = PositionEstimator::new(&config)?;
//! let projector = OffAxisProjector::new(config.calibration)?;
//!
//! let face = LandmarkFrame::from_eyes(
//!     &config.landmarks,
//!     Landmark::new(0.45, 0.5),
//!     Landmark::new(0.55, 0.5),
//! );
//! let position = estimator.update(Some(&face), FrameSize::new(1280, 720));
//!
//! let view = projector.project(position, 16.0 / 9.0);
//! println!("eye at z = {:.3} m, frustum left = {:.5}", position.z, view.frustum.left);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving the frame pipeline
//!
//! ```
//! use parallax_window::{
//!     config::Config,
//!     landmarks::{FrameSize, LandmarkFrame},
//!     pipeline::{FrameId, FramePipeline, LandmarkDetector, VideoFrame},
//!     Result,
//! };
//!
//! struct NoFaces;
//!
//! impl LandmarkDetector for NoFaces {
//!     fn detect(&mut self, _frame: &VideoFrame<'_>) -> Result<Option<LandmarkFrame>> {
//!         Ok(None)
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut pipeline = FramePipeline::new(NoFaces, &Config::default())?;
//! let frame = VideoFrame { id: FrameId(1), size: FrameSize::new(640, 480), pixels: &[] };
//! let outcome = pipeline.step(Some(&frame), 1.75);
//! assert_eq!(outcome.position, pipeline.position());
//! # Ok(())
//! # }
//! ```

/// Headless replay application
pub mod app;

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Error types and result handling
pub mod error;

/// Position smoothing filters
pub mod filters;

/// Thread handoff for the viewer position
pub mod handoff;

/// Landmark frames from the face detector
pub mod landmarks;

/// Per-frame orchestration
pub mod pipeline;

/// Viewer position estimation from eye landmarks
pub mod position_estimator;

/// Off-axis projection
pub mod projection;

pub use error::{Error, Result};
