//! camera-core: per-camera capture loops with a latest-frame handoff

mod types;
pub use types::{CameraStatus, Frame, PixelFormat, Source};

mod error;
pub use error::{Error, ReadError, Result};

mod traits;
pub use traits::{CameraBackend, CameraSource};

mod frame_buffer;
pub use frame_buffer::FrameBuffer;

mod capture;
pub use capture::CaptureLoop;

mod controller;
pub use controller::{CameraController, CONNECTED_THRESHOLD};

mod registry;
pub use registry::CameraRegistry;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockBackend, MockCamera};

#[cfg(feature = "opencv")]
mod opencv_backend;
#[cfg(feature = "opencv")]
pub use opencv_backend::{OpenCvBackend, OpenCvCamera};
