//! Still-image QR decoding (upload path).

use std::path::Path;
use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use sw_core::decode::DecodeError;
use sw_core::payload::{DecodedPayload, PayloadSource};
use sw_core::ports::{ImageRasterizerPort, QrDecoderPort};

/// A user-supplied file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: None,
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file, guessing the MIME type from its extension.
    pub async fn read_from_path(path: &Path) -> Result<Self, DecodeError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DecodeError::read(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            mime_type: mime_type_for(path).to_string(),
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// MIME type from a file extension; unknown extensions are opaque bytes.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Use case: decode a QR symbol from an uploaded image.
///
/// 用例：从上传的图片中识别二维码。所有错误均可恢复。
pub struct DecodeUploadedImage {
    rasterizer: Arc<dyn ImageRasterizerPort>,
    decoder: Arc<dyn QrDecoderPort>,
}

impl DecodeUploadedImage {
    pub fn new(rasterizer: Arc<dyn ImageRasterizerPort>, decoder: Arc<dyn QrDecoderPort>) -> Self {
        Self {
            rasterizer,
            decoder,
        }
    }

    pub fn from_ports(
        rasterizer: Arc<dyn ImageRasterizerPort>,
        decoder: Arc<dyn QrDecoderPort>,
    ) -> Self {
        Self::new(rasterizer, decoder)
    }

    pub async fn execute(&self, image: &UploadedImage) -> Result<DecodedPayload, DecodeError> {
        let span = info_span!(
            "usecase.decode_uploaded_image.execute",
            mime_type = %image.mime_type,
            size = image.bytes.len()
        );
        async {
            if !image.is_image() {
                warn!("uploaded file is not an image");
                return Err(DecodeError::InvalidImageFormat {
                    mime_type: image.mime_type.clone(),
                });
            }

            let frame = self.rasterizer.rasterize(&image.bytes)?;
            info!(width = frame.width, height = frame.height, "image rasterized");

            match self.decoder.decode(&frame) {
                Some(text) => {
                    info!(raw_url = %text, "QR code decoded from image");
                    Ok(DecodedPayload::new(text, PayloadSource::Upload))
                }
                None => {
                    warn!("no QR code found in uploaded image");
                    Err(DecodeError::NoSymbolFound)
                }
            }
        }
        .instrument(span)
        .await
    }
}
