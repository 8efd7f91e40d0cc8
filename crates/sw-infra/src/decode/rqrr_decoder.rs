use sw_core::ports::QrDecoderPort;
use sw_core::FrameBuffer;
use tracing::{debug, trace};

/// Pure-Rust QR decoder backed by `rqrr`.
///
/// Returns the first grid that decodes; later symbols in the same frame
/// are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrQrDecoder;

impl RqrrQrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoderPort for RqrrQrDecoder {
    fn decode(&self, frame: &FrameBuffer) -> Option<String> {
        if frame.is_empty() || !frame.is_well_formed() {
            trace!(?frame, "Skipping unusable frame");
            return None;
        }

        let width = frame.width as usize;
        let height = frame.height as usize;
        let luma = frame.to_luma();
        if luma.len() < width * height {
            return None;
        }

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| luma[y * width + x]);

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => return Some(content),
                Err(e) => debug!(error = %e, "Grid detected but failed to decode"),
            }
        }
        None
    }
}
