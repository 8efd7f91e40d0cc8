//! QR decoding adapters.
//!
//! 二维码解码适配器：帧解码与图片栅格化。

mod image_rasterizer;
mod rqrr_decoder;

pub use image_rasterizer::ImageCrateRasterizer;
pub use rqrr_decoder::RqrrQrDecoder;
