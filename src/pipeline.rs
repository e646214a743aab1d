//! Per-frame orchestration: detector, position estimator, projector, renderer.
//!
//! The pipeline runs once per redraw. A frame is handed to the detector only
//! if its id is newer than the last one processed, so redraws that outpace the
//! camera reuse the held position and stale frames are dropped.

use crate::{
    config::Config,
    landmarks::{FrameSize, LandmarkFrame},
    position_estimator::{PositionEstimator, ViewerPosition},
    projection::{OffAxisProjector, RenderView},
    Result,
};
use log::{info, warn};
use std::fmt;

/// Monotonically increasing identity of a captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u64);

/// A captured frame as handed over by the capture collaborator
#[derive(Debug, Clone, Copy)]
pub struct VideoFrame<'a> {
    pub id: FrameId,
    pub size: FrameSize,
    pub pixels: &'a [u8],
}

/// Face landmark detector collaborator
pub trait LandmarkDetector {
    /// Landmarks of the single tracked face, or `None` when no face is found
    ///
    /// # Errors
    ///
    /// Implementations report inference failures; the pipeline treats them as
    /// a frame without a face.
    fn detect(&mut self, frame: &VideoFrame<'_>) -> Result<Option<LandmarkFrame>>;
}

/// Scene renderer collaborator
pub trait SceneRenderer {
    /// Draw the scene with the given projection and camera
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer cannot draw this view
    fn render(&mut self, view: &RenderView) -> Result<()>;
}

/// Observable tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// A face was found in the last processed frame
    Tracking,
    /// No face in the last processed frame, position is held
    NoFaceDetected,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tracking => write!(f, "tracking"),
            Self::NoFaceDetected => write!(f, "no face detected"),
        }
    }
}

/// Counters for one pipeline's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub steps: u64,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub detections: u64,
    pub detector_errors: u64,
    pub status_changes: u64,
}

/// Result of one pipeline pass
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub view: RenderView,
    pub position: ViewerPosition,
    pub status: TrackingStatus,
    /// Whether a new frame reached the detector this pass
    pub processed: bool,
}

/// Owns the pipeline state that would otherwise be global
pub struct FramePipeline<D> {
    detector: D,
    estimator: PositionEstimator,
    projector: OffAxisProjector,
    last_frame: Option<FrameId>,
    status: TrackingStatus,
    stats: PipelineStats,
}

impl<D: LandmarkDetector> FramePipeline<D> {
    /// Create a pipeline around `detector`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(detector: D, config: &Config) -> Result<Self> {
        config.validate()?;
        info!("Initializing frame pipeline with {} smoothing", config.smoothing.filter);

        Ok(Self {
            detector,
            estimator: PositionEstimator::new(config)?,
            projector: OffAxisProjector::new(config.calibration)?,
            last_frame: None,
            status: TrackingStatus::NoFaceDetected,
            stats: PipelineStats::default(),
        })
    }

    /// Run one pass for the latest available frame
    ///
    /// `frame` is the most recent capture, if any; it is skipped when it is not
    /// newer than the last processed one. The view is produced every pass.
    pub fn step(&mut self, frame: Option<&VideoFrame<'_>>, aspect: f64) -> StepOutcome {
        self.stats.steps += 1;

        let processed = match frame {
            Some(frame) if self.is_new(frame.id) => {
                self.process(frame);
                true
            }
            Some(_) => {
                self.stats.frames_skipped += 1;
                false
            }
            None => false,
        };

        let position = self.estimator.position();
        StepOutcome {
            view: self.projector.project(position, aspect),
            position,
            status: self.status,
            processed,
        }
    }

    /// Run one pass and hand the view to `renderer`
    ///
    /// # Errors
    ///
    /// Returns the renderer's error
    pub fn render_frame<R: SceneRenderer>(
        &mut self,
        frame: Option<&VideoFrame<'_>>,
        aspect: f64,
        renderer: &mut R,
    ) -> Result<StepOutcome> {
        let outcome = self.step(frame, aspect);
        renderer.render(&outcome.view)?;
        Ok(outcome)
    }

    fn is_new(&self, id: FrameId) -> bool {
        self.last_frame.map_or(true, |last| id > last)
    }

    fn process(&mut self, frame: &VideoFrame<'_>) {
        self.last_frame = Some(frame.id);
        self.stats.frames_processed += 1;

        let landmarks = match self.detector.detect(frame) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                warn!("Detector failed on frame {}: {}", frame.id.0, e);
                self.stats.detector_errors += 1;
                None
            }
        };

        let detected = self.estimator.observe(landmarks.as_ref(), frame.size).is_some();
        if detected {
            self.stats.detections += 1;
        }
        self.set_status(if detected {
            TrackingStatus::Tracking
        } else {
            TrackingStatus::NoFaceDetected
        });
    }

    fn set_status(&mut self, status: TrackingStatus) {
        if status != self.status {
            info!("Tracking status: {} -> {}", self.status, status);
            self.status = status;
            self.stats.status_changes += 1;
        }
    }

    #[must_use]
    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    #[must_use]
    pub fn position(&self) -> ViewerPosition {
        self.estimator.position()
    }

    #[must_use]
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<FrameId> {
        self.last_frame
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }
}
