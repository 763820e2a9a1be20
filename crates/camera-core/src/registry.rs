use crate::{CameraController, CameraStatus, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Named collection of camera controllers.
///
/// Populated once at startup and shared read-only behind an `Arc`
/// afterwards, so lookups need no locking. `register` overwrites an
/// existing entry with the same name.
#[derive(Default)]
pub struct CameraRegistry {
    cameras: HashMap<String, Arc<CameraController>>,
}

impl CameraRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, controller: CameraController) {
        self.cameras
            .insert(controller.name().to_string(), Arc::new(controller));
    }

    pub fn get(&self, name: &str) -> Option<Arc<CameraController>> {
        self.cameras.get(name).cloned()
    }

    /// Like `get`, but a lookup miss becomes [`Error::NotFound`].
    pub fn lookup(&self, name: &str) -> Result<Arc<CameraController>> {
        self.get(name).ok_or_else(|| Error::NotFound(name.to_string()))
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &Arc<CameraController>)> {
        self.cameras
            .iter()
            .map(|(name, controller)| (name.as_str(), controller))
    }

    /// Status of every registered camera, keyed by name.
    pub fn statuses(&self) -> HashMap<String, CameraStatus> {
        self.cameras
            .iter()
            .map(|(name, controller)| (name.clone(), controller.status()))
            .collect()
    }

    pub fn start_all(&self) {
        for controller in self.cameras.values() {
            controller.start();
        }
    }

    pub fn stop_all(&self) {
        for controller in self.cameras.values() {
            controller.stop();
        }
    }
}
