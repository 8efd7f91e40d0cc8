//! QR acquisition: live frame polling and still-image decoding.

mod frame_scanner;
mod image_decoder;

pub use frame_scanner::{FrameScanner, ScanHandle};
pub use image_decoder::{mime_type_for, DecodeUploadedImage, UploadedImage};
