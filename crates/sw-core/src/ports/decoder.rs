//! QR decode ports.

use crate::decode::{DecodeError, FrameBuffer};

/// Decode a QR symbol from a pixel buffer.
///
/// Shared by the frame scanner and the still-image decoder. Non-inverted
/// symbols only.
pub trait QrDecoderPort: Send + Sync {
    /// First decoded symbol's text, `None` when nothing decodes.
    fn decode(&self, frame: &FrameBuffer) -> Option<String>;
}

/// Rasterize encoded image bytes at their native dimensions.
///
/// 将图片字节解码为原始尺寸的像素缓冲区。
pub trait ImageRasterizerPort: Send + Sync {
    fn rasterize(&self, bytes: &[u8]) -> Result<FrameBuffer, DecodeError>;
}
