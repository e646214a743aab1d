//! Headless replay application.
//!
//! Capture, detection and rendering live outside this crate, so the binary
//! drives the pipeline from a recorded session: per-frame eye positions stored
//! as YAML, or a generated sweep. Each frame is redrawn `redraws_per_frame`
//! times the way a display faster than the camera would, and every view goes to
//! a renderer that logs it.

use crate::{
    config::{Config, LandmarkConfig},
    landmarks::{FrameSize, Landmark, LandmarkFrame},
    pipeline::{
        FrameId, FramePipeline, LandmarkDetector, PipelineStats, SceneRenderer, TrackingStatus,
        VideoFrame,
    },
    position_estimator::ViewerPosition,
    projection::RenderView,
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Eye centers of one recorded face, normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedFace {
    pub left_eye: [f64; 2],
    pub right_eye: [f64; 2],
}

/// One captured frame of a recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub sequence: u64,
    #[serde(default)]
    pub face: Option<RecordedFace>,
}

fn default_redraws() -> u32 {
    1
}

/// A recorded tracking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Viewport aspect; the screen aspect is used when absent
    #[serde(default)]
    pub aspect: Option<f64>,
    #[serde(default = "default_redraws")]
    pub redraws_per_frame: u32,
    pub frames: Vec<RecordedFrame>,
}

impl Recording {
    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for malformed recordings
    pub fn from_yaml(content: &str) -> Result<Self> {
        let recording: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse recording: {e}")))?;
        if recording.frame_width == 0 || recording.frame_height == 0 {
            return Err(Error::InvalidInput("Recording frame size must be non-zero".to_string()));
        }
        Ok(recording)
    }

    /// Generate a session where the viewer sways side to side and leans in
    ///
    /// Every 60 frames the face drops out for 10 frames to exercise tracking
    /// loss.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Frame counts are small
    pub fn synthetic(frames: u64, size: FrameSize) -> Self {
        let frames = (0..frames)
            .map(|i| {
                let t = i as f64 / 30.0;
                let face = (i % 60 < 50).then(|| {
                    let center_x = 0.5 + 0.15 * (t * 0.8).sin();
                    let center_y = 0.5 + 0.05 * (t * 0.5).cos();
                    let half_spread = 0.05 + 0.015 * (t * 0.3).sin();
                    RecordedFace {
                        left_eye: [center_x - half_spread, center_y],
                        right_eye: [center_x + half_spread, center_y],
                    }
                });
                RecordedFrame { sequence: i, face }
            })
            .collect();

        Self {
            frame_width: size.width,
            frame_height: size.height,
            aspect: None,
            redraws_per_frame: 2,
            frames,
        }
    }

    #[must_use]
    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.frame_width, self.frame_height)
    }
}

/// Detector that answers from a recording, keyed by frame id
pub struct ReplayDetector {
    topology: LandmarkConfig,
    faces: HashMap<u64, RecordedFace>,
}

impl ReplayDetector {
    #[must_use]
    pub fn new(recording: &Recording, topology: LandmarkConfig) -> Self {
        let faces = recording
            .frames
            .iter()
            .filter_map(|f| f.face.map(|face| (f.sequence, face)))
            .collect();
        Self { topology, faces }
    }
}

impl LandmarkDetector for ReplayDetector {
    fn detect(&mut self, frame: &VideoFrame<'_>) -> Result<Option<LandmarkFrame>> {
        Ok(self.faces.get(&frame.id.0).map(|face| {
            LandmarkFrame::from_eyes(
                &self.topology,
                Landmark::new(face.left_eye[0], face.left_eye[1]),
                Landmark::new(face.right_eye[0], face.right_eye[1]),
            )
        }))
    }
}

/// Renderer that logs each view instead of drawing it
#[derive(Debug, Default)]
pub struct LogRenderer {
    rendered: u64,
    last: Option<RenderView>,
}

impl LogRenderer {
    #[must_use]
    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    #[must_use]
    pub fn last(&self) -> Option<&RenderView> {
        self.last.as_ref()
    }
}

impl SceneRenderer for LogRenderer {
    fn render(&mut self, view: &RenderView) -> Result<()> {
        self.rendered += 1;
        let f = &view.frustum;
        debug!(
            "view {}: eye ({:.3}, {:.3}, {:.3}) frustum l={:.5} r={:.5} b={:.5} t={:.5}",
            self.rendered,
            view.camera.position.x,
            view.camera.position.y,
            view.camera.position.z,
            f.left,
            f.right,
            f.bottom,
            f.top
        );
        self.last = Some(*view);
        Ok(())
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, Copy)]
pub struct ReplaySummary {
    pub stats: PipelineStats,
    pub rendered: u64,
    pub final_position: ViewerPosition,
    pub final_status: TrackingStatus,
    pub final_view: Option<RenderView>,
}

/// Replays a recording through the full pipeline
pub struct ReplayApp {
    config: Config,
    recording: Recording,
}

impl ReplayApp {
    /// Create the application
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: Config, recording: Recording) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, recording })
    }

    /// Run every recorded frame through the pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline cannot be built or the renderer fails
    pub fn run(&self) -> Result<ReplaySummary> {
        let recording = &self.recording;
        info!(
            "Replaying {} frames at {}x{}",
            recording.frames.len(),
            recording.frame_width,
            recording.frame_height
        );

        let detector = ReplayDetector::new(recording, self.config.landmarks);
        let mut pipeline = FramePipeline::new(detector, &self.config)?;
        let mut renderer = LogRenderer::default();
        let aspect = recording
            .aspect
            .unwrap_or_else(|| self.config.calibration.screen_aspect());
        let size = recording.frame_size();

        for recorded in &recording.frames {
            let frame = VideoFrame {
                id: FrameId(recorded.sequence),
                size,
                pixels: &[],
            };
            for _ in 0..recording.redraws_per_frame.max(1) {
                pipeline.render_frame(Some(&frame), aspect, &mut renderer)?;
            }
        }

        let summary = ReplaySummary {
            stats: pipeline.stats(),
            rendered: renderer.rendered(),
            final_position: pipeline.position(),
            final_status: pipeline.status(),
            final_view: renderer.last().copied(),
        };
        info!(
            "Replay finished: {} frames processed, {} with a face, {} status changes",
            summary.stats.frames_processed, summary.stats.detections, summary.stats.status_changes
        );
        Ok(summary)
    }
}
