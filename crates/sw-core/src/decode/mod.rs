//! Pixel buffers handed to the QR decoder.
//!
//! Frames from the camera and rasterized uploads share this type, so both
//! paths run the same decode routine.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One byte per pixel.
    Luma8,
    /// Four bytes per pixel, canvas order.
    Rgba8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Luma8 => 1,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// A snapshot of one frame.
///
/// `stride` is the number of bytes per row and may exceed
/// `width * bytes_per_pixel` (padded rows).
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl FrameBuffer {
    /// Tightly packed buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width as usize * format.bytes_per_pixel(),
            format,
            data,
        }
    }

    pub fn luma(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self::new(width, height, PixelFormat::Luma8, data)
    }

    pub fn rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self::new(width, height, PixelFormat::Rgba8, data)
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `data` covers every row at the declared stride.
    pub fn is_well_formed(&self) -> bool {
        let row = self.width as usize * self.format.bytes_per_pixel();
        if self.stride < row {
            return false;
        }
        match self.height as usize {
            0 => true,
            h => self.data.len() >= self.stride * (h - 1) + row,
        }
    }

    /// Grayscale view, row-major and tightly packed.
    ///
    /// Luma input without padding is borrowed as-is.
    pub fn to_luma(&self) -> Cow<'_, [u8]> {
        let width = self.width as usize;
        let height = self.height as usize;

        match self.format {
            PixelFormat::Luma8 if self.stride == width => {
                Cow::Borrowed(&self.data[..(width * height).min(self.data.len())])
            }
            PixelFormat::Luma8 => {
                let mut out = Vec::with_capacity(width * height);
                for y in 0..height {
                    let start = y * self.stride;
                    let end = (start + width).min(self.data.len());
                    if start >= end {
                        break;
                    }
                    out.extend_from_slice(&self.data[start..end]);
                }
                Cow::Owned(out)
            }
            PixelFormat::Rgba8 => {
                let mut out = Vec::with_capacity(width * height);
                for y in 0..height {
                    for x in 0..width {
                        let i = y * self.stride + x * 4;
                        let Some(px) = self.data.get(i..i + 3) else {
                            return Cow::Owned(out);
                        };
                        // ITU-R BT.601 luma
                        let l = (299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32)
                            / 1000;
                        out.push(l as u8);
                    }
                }
                Cow::Owned(out)
            }
        }
    }
}

/// Still-image and frame decode failures. All recoverable.
///
/// 解码错误，均可恢复。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("no QR code found in the image")]
    NoSymbolFound,

    #[error("unsupported file type {mime_type}; please select an image")]
    InvalidImageFormat { mime_type: String },

    #[error("error reading image: {message}")]
    ImageReadError { message: String },
}

impl DecodeError {
    pub fn read(message: impl Into<String>) -> Self {
        DecodeError::ImageReadError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_without_padding_is_borrowed() {
        let frame = FrameBuffer::luma(2, 2, vec![1, 2, 3, 4]);
        assert!(matches!(frame.to_luma(), Cow::Borrowed(_)));
        assert_eq!(&*frame.to_luma(), &[1, 2, 3, 4]);
    }

    #[test]
    fn padded_luma_rows_are_compacted() {
        let frame = FrameBuffer::luma(2, 2, vec![1, 2, 0, 3, 4, 0]).with_stride(3);
        assert!(frame.is_well_formed());
        assert_eq!(&*frame.to_luma(), &[1, 2, 3, 4]);
    }

    #[test]
    fn rgba_converts_to_grey() {
        let frame = FrameBuffer::rgba(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 255]);
        assert_eq!(&*frame.to_luma(), &[255, 0]);
    }

    #[test]
    fn short_buffer_is_not_well_formed() {
        let frame = FrameBuffer::rgba(4, 4, vec![0; 10]);
        assert!(!frame.is_well_formed());
    }

    #[test]
    fn invalid_format_message_names_the_mime() {
        let err = DecodeError::InvalidImageFormat {
            mime_type: "text/plain".into(),
        };
        assert!(err.to_string().contains("text/plain"));
    }
}
