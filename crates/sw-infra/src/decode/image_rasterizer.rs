use image::GenericImageView;
use sw_core::ports::ImageRasterizerPort;
use sw_core::{DecodeError, FrameBuffer};
use tracing::debug;

/// Rasterizes uploaded images with the `image` crate.
///
/// 使用 `image` crate 将上传图片解码为原始尺寸的灰度缓冲区。
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateRasterizer;

impl ImageCrateRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl ImageRasterizerPort for ImageCrateRasterizer {
    fn rasterize(&self, bytes: &[u8]) -> Result<FrameBuffer, DecodeError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| DecodeError::read(format!("decode image bytes: {}", e)))?;
        let (width, height) = decoded.dimensions();
        debug!(width, height, "Rasterized uploaded image");

        let luma = decoded.to_luma8();
        Ok(FrameBuffer::luma(width, height, luma.into_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::fixtures::qr_frame;
    use crate::decode::RqrrQrDecoder;
    use image::{DynamicImage, GrayImage, ImageFormat};
    use std::io::Cursor;
    use sw_core::ports::QrDecoderPort;

    fn encode_png(frame: &FrameBuffer) -> Vec<u8> {
        let img = GrayImage::from_raw(frame.width, frame.height, frame.data.clone()).unwrap();
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_rasterize_keeps_native_dimensions() {
        let frame = qr_frame("https://issuer.example/o/1", 3);
        let png = encode_png(&frame);

        let raster = ImageCrateRasterizer::new().rasterize(&png).unwrap();

        assert_eq!((raster.width, raster.height), (frame.width, frame.height));
        assert!(raster.is_well_formed());
    }

    #[test]
    fn test_rasterized_png_decodes() {
        let png = encode_png(&qr_frame("https://issuer.example/credential-offer/7", 4));

        let raster = ImageCrateRasterizer::new().rasterize(&png).unwrap();

        assert_eq!(
            RqrrQrDecoder::new().decode(&raster).as_deref(),
            Some("https://issuer.example/credential-offer/7")
        );
    }

    #[test]
    fn test_garbage_bytes_are_a_read_error() {
        let err = ImageCrateRasterizer::new()
            .rasterize(b"definitely not an image")
            .unwrap_err();

        assert!(matches!(err, DecodeError::ImageReadError { .. }));
    }
}
