use crate::{CameraBackend, CameraStatus, CaptureLoop, Frame, Source};
use std::sync::Arc;
use std::time::Duration;

/// A camera with no frame newer than this is reported as disconnected.
pub const CONNECTED_THRESHOLD: Duration = Duration::from_secs(5);

/// Lifecycle and status wrapper around one camera's capture loop.
pub struct CameraController {
    name: String,
    source: Source,
    capture: CaptureLoop,
}

impl std::fmt::Debug for CameraController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraController")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl CameraController {
    pub fn new(name: impl Into<String>, source: Source, backend: Arc<dyn CameraBackend>) -> Self {
        let name = name.into();
        let capture = CaptureLoop::new(name.clone(), source.clone(), backend);
        Self {
            name,
            source,
            capture,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) {
        self.capture.start();
    }

    pub fn stop(&self) {
        self.capture.stop();
    }

    /// Independent copy of the most recent frame, if one exists.
    pub fn current_frame(&self) -> Option<Frame> {
        self.capture.buffer().read()
    }

    /// Status queries never fail; health is encoded in the fields.
    ///
    /// A stalled camera stays `running: true` but flips to
    /// `connected: false` once its last frame is older than
    /// [`CONNECTED_THRESHOLD`].
    pub fn status(&self) -> CameraStatus {
        let running = self.capture.is_running();
        let age = self.capture.buffer().age();
        CameraStatus {
            name: self.name.clone(),
            source: self.source.to_string(),
            running,
            connected: is_connected(running, age),
            last_frame_age: age.map(|age| round_to_centis(age.as_secs_f64())),
        }
    }
}

fn is_connected(running: bool, age: Option<Duration>) -> bool {
    running && age.is_some_and(|age| age < CONNECTED_THRESHOLD)
}

fn round_to_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
