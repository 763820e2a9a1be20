use crate::{CameraBackend, CameraSource, Frame, PixelFormat, ReadError, Result, Source};

/// Backend producing synthetic frames, for demos and tests.
pub struct MockBackend;

impl CameraBackend for MockBackend {
    fn open(&self, _source: &Source) -> Result<Box<dyn CameraSource>> {
        Ok(Box::new(MockCamera { counter: 0 }))
    }
}

pub struct MockCamera {
    counter: u64,
}

impl CameraSource for MockCamera {
    fn read(&mut self) -> Result<Frame, ReadError> {
        self.counter += 1;
        // Gray ramp shifted by the frame counter so streams visibly move
        let width = 320u32;
        let height = 240u32;
        let mut data = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) as usize;
                data[idx] = ((x + y + self.counter as u32) % 256) as u8;
            }
        }
        Ok(Frame {
            width,
            height,
            pixel_format: PixelFormat::Gray8,
            data,
        })
    }
}
