use crate::{CameraBackend, FrameBuffer, ReadError, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Target cadence of the acquisition loop, roughly 30 iterations per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Pause before retrying after a transient read failure.
const READ_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How long `stop` waits for the worker thread to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(1);

/// Background worker that pulls frames from one device into a [`FrameBuffer`].
///
/// The worker thread is the only code that touches the device handle: it is
/// opened after the thread starts and dropped when the loop exits, on the
/// stop path and the failure path alike. Cancellation is the `running` flag,
/// checked once per iteration.
pub struct CaptureLoop {
    name: String,
    source: Source,
    backend: Arc<dyn CameraBackend>,
    buffer: Arc<FrameBuffer>,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CaptureLoop {
    pub fn new(name: impl Into<String>, source: Source, backend: Arc<dyn CameraBackend>) -> Self {
        Self {
            name: name.into(),
            source,
            backend,
            buffer: Arc::new(FrameBuffer::new()),
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    pub fn buffer(&self) -> &Arc<FrameBuffer> {
        &self.buffer
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the capture worker. No-op when the loop is already running.
    ///
    /// Open failures are not reported here: the worker logs them and clears
    /// the running flag, which subsequent status queries observe.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        info!(camera = %self.name, source = %self.source, "starting capture");

        let name = self.name.clone();
        let source = self.source.clone();
        let backend = Arc::clone(&self.backend);
        let buffer = Arc::clone(&self.buffer);
        let running = Arc::clone(&self.running);
        let handle = std::thread::spawn(move || run_capture(name, source, backend, buffer, running));

        if let Ok(mut worker) = self.worker.lock() {
            *worker = Some(handle);
        }
    }

    /// Signal the worker to exit and wait for it, bounded by [`STOP_TIMEOUT`].
    ///
    /// Safe to call on a loop that already exited on its own or was never
    /// started. A worker stuck in a blocking driver read cannot be cancelled;
    /// after the timeout the handle is abandoned and the thread is left to
    /// finish whenever the read returns.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);

        let handle = self.worker.lock().ok().and_then(|mut worker| worker.take());
        let Some(handle) = handle else {
            return;
        };

        let deadline = Instant::now() + STOP_TIMEOUT;
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        if handle.is_finished() {
            let _ = handle.join();
        } else {
            warn!(camera = %self.name, "capture worker did not exit in time, abandoning it");
        }
    }
}

fn run_capture(
    name: String,
    source: Source,
    backend: Arc<dyn CameraBackend>,
    buffer: Arc<FrameBuffer>,
    running: Arc<AtomicBool>,
) {
    let mut device = match backend.open(&source) {
        Ok(device) => device,
        Err(err) => {
            error!(camera = %name, source = %source, %err, "failed to open camera");
            running.store(false, Ordering::SeqCst);
            return;
        }
    };

    while running.load(Ordering::SeqCst) {
        match device.read() {
            Ok(frame) => buffer.publish(frame),
            Err(ReadError::Transient(reason)) => {
                warn!(camera = %name, %reason, "failed to read frame");
                std::thread::sleep(READ_RETRY_DELAY);
                continue;
            }
            Err(ReadError::Fatal(reason)) => {
                error!(camera = %name, %reason, "device failure, capture loop exiting");
                break;
            }
        }

        // Fixed inter-iteration delay to bound CPU and device load.
        std::thread::sleep(FRAME_INTERVAL);
    }

    running.store(false, Ordering::SeqCst);
    info!(camera = %name, "capture loop stopped");
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::{CameraSource, Error, Frame, PixelFormat, Result};
    use std::sync::atomic::AtomicUsize;

    pub fn test_frame(value: u8) -> Frame {
        Frame {
            width: 8,
            height: 8,
            pixel_format: PixelFormat::Gray8,
            data: vec![value; 64],
        }
    }

    /// What a scripted device does on one `read` call.
    #[derive(Clone)]
    pub enum Step {
        Yield(u8),
        Drop,
        Die,
    }

    pub struct ScriptedCamera {
        script: Vec<Step>,
        cursor: usize,
    }

    impl CameraSource for ScriptedCamera {
        fn read(&mut self) -> Result<Frame, ReadError> {
            // Past the end of the script, keep yielding the last frame value.
            let step = self
                .script
                .get(self.cursor)
                .or_else(|| self.script.last())
                .cloned()
                .unwrap_or(Step::Drop);
            self.cursor += 1;
            match step {
                Step::Yield(value) => Ok(test_frame(value)),
                Step::Drop => Err(ReadError::Transient("dropped frame".into())),
                Step::Die => Err(ReadError::Fatal("device unplugged".into())),
            }
        }
    }

    /// Backend whose devices replay a fixed script, counting opens.
    pub struct ScriptedBackend {
        script: Vec<Step>,
        pub opens: AtomicUsize,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<Step>) -> Self {
            Self {
                script,
                opens: AtomicUsize::new(0),
            }
        }

        pub fn yielding(value: u8) -> Self {
            Self::new(vec![Step::Yield(value)])
        }
    }

    impl CameraBackend for ScriptedBackend {
        fn open(&self, _source: &Source) -> Result<Box<dyn CameraSource>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedCamera {
                script: self.script.clone(),
                cursor: 0,
            }))
        }
    }

    /// Backend whose `open` always fails.
    pub struct BrokenBackend;

    impl CameraBackend for BrokenBackend {
        fn open(&self, source: &Source) -> Result<Box<dyn CameraSource>> {
            Err(Error::Open(source.to_string(), "no such device".into()))
        }
    }

    /// Poll `cond` every 10ms until it holds or `timeout` elapses.
    pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        cond()
    }
}
