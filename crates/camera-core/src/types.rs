use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelFormat {
    Bgr8,
    Rgb8,
    Gray8,
}

/// One decoded image captured from a device.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub data: Vec<u8>,
}

/// Where a camera's frames come from: a local device index or a network URI.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Index(u32),
    Uri(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Index(idx) => write!(f, "{idx}"),
            Source::Uri(uri) => write!(f, "{uri}"),
        }
    }
}

/// Snapshot of one camera's health, as reported over the API.
///
/// `last_frame_age` is seconds since the most recent frame, `None` when the
/// camera has never produced one.
#[derive(Clone, Debug, Serialize)]
pub struct CameraStatus {
    pub name: String,
    pub source: String,
    pub running: bool,
    pub connected: bool,
    pub last_frame_age: Option<f64>,
}
