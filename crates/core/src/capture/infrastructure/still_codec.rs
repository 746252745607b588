//! Conversions between encoded image bytes and [`Frame`]s.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;

use crate::capture::domain::capture_error::CaptureError;
use crate::shared::constants::UPLOAD_EXTENSIONS;
use crate::shared::frame::Frame;

/// Decodes any format the `image` crate understands into an RGB frame.
pub fn decode(bytes: &[u8]) -> Result<Frame, CaptureError> {
    let rgb = image::load_from_memory(bytes)
        .map_err(|e| CaptureError::Decode(e.to_string()))?
        .to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::new(rgb.into_raw(), width, height, 3, 0))
}

pub fn decode_file(path: &Path) -> Result<Frame, CaptureError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CaptureError::Decode(format!("{}: {e}", path.display())))?;
    decode(&bytes)
}

/// Encodes an RGB frame as baseline JPEG.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, CaptureError> {
    if frame.channels() != 3 {
        return Err(CaptureError::Encode(format!(
            "expected 3 channels, got {}",
            frame.channels()
        )));
    }
    let rgb = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or_else(|| CaptureError::Encode("pixel buffer does not match dimensions".into()))?;

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// True when the file name already carries an extension the analysis
/// endpoint accepts.
pub fn has_upload_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| UPLOAD_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// `portrait.png` -> `portrait.jpg`.
pub fn jpeg_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("upload");
    format!("{stem}.jpg")
}
