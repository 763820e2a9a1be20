use anyhow::{Context, Result};
use camera_core::{Frame, PixelFormat};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

/// Encode a raw frame as JPEG.
pub fn encode(frame: &Frame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new(&mut out);
    match frame.pixel_format {
        PixelFormat::Gray8 => encoder
            .encode(&frame.data, frame.width, frame.height, ExtendedColorType::L8)
            .context("encoding gray frame")?,
        PixelFormat::Rgb8 => encoder
            .encode(
                &frame.data,
                frame.width,
                frame.height,
                ExtendedColorType::Rgb8,
            )
            .context("encoding rgb frame")?,
        PixelFormat::Bgr8 => {
            // The JPEG encoder has no BGR input, swap channels first.
            let rgb = bgr_to_rgb(&frame.data);
            encoder
                .encode(&rgb, frame.width, frame.height, ExtendedColorType::Rgb8)
                .context("encoding bgr frame")?;
        }
    }
    Ok(out)
}

fn bgr_to_rgb(data: &[u8]) -> Vec<u8> {
    let mut rgb = data.to_vec();
    for px in rgb.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    rgb
}
