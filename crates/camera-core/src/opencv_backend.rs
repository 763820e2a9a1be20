use crate::{CameraBackend, CameraSource, Error, Frame, PixelFormat, ReadError, Result, Source};
use opencv::prelude::*;
use opencv::{core, videoio};

/// Backend for real devices via OpenCV `VideoCapture`.
///
/// Handles both local device indices and network stream URIs.
pub struct OpenCvBackend;

impl CameraBackend for OpenCvBackend {
    fn open(&self, source: &Source) -> Result<Box<dyn CameraSource>> {
        let cap = match source {
            Source::Index(idx) => videoio::VideoCapture::new(*idx as i32, videoio::CAP_ANY)
                .map_err(|e| Error::Open(source.to_string(), e.to_string()))?,
            Source::Uri(uri) => videoio::VideoCapture::from_file(uri, videoio::CAP_ANY)
                .map_err(|e| Error::Open(source.to_string(), e.to_string()))?,
        };
        let opened = videoio::VideoCapture::is_opened(&cap)
            .map_err(|e| Error::Backend(e.to_string()))?;
        if !opened {
            return Err(Error::Open(source.to_string(), "device not opened".into()));
        }
        Ok(Box::new(OpenCvCamera { cap }))
    }
}

pub struct OpenCvCamera {
    cap: videoio::VideoCapture,
}

impl CameraSource for OpenCvCamera {
    fn read(&mut self) -> Result<Frame, ReadError> {
        let mut mat = core::Mat::default();
        let grabbed = self
            .cap
            .read(&mut mat)
            .map_err(|e| ReadError::Fatal(e.to_string()))?;
        if !grabbed || mat.empty() {
            return Err(ReadError::Transient("empty frame".into()));
        }

        let width = mat.cols() as u32;
        let height = mat.rows() as u32;
        let data = mat
            .data_bytes()
            .map_err(|e| ReadError::Fatal(e.to_string()))?
            .to_vec();
        Ok(Frame {
            width,
            height,
            pixel_format: PixelFormat::Bgr8,
            data,
        })
    }
}
