use crate::{Frame, ReadError, Result, Source};

/// An open camera device. Dropping the value releases the device handle.
pub trait CameraSource: Send {
    /// Read a single frame. Blocks until the device produces one or fails.
    fn read(&mut self) -> Result<Frame, ReadError>;
}

/// Factory for camera devices, keyed by source descriptor.
///
/// The capture loop opens the device lazily inside its worker, so the
/// backend is shared up front and `open` is called once per `start()`.
pub trait CameraBackend: Send + Sync {
    /// Open a device by its source descriptor.
    fn open(&self, source: &Source) -> Result<Box<dyn CameraSource>>;
}
