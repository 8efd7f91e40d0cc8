//! Video constraint sets requested from the platform camera API.

use serde::{Deserialize, Serialize};

use super::state::FacingMode;

/// How strictly a facing mode is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "mode", rename_all = "lowercase")]
pub enum FacingConstraint {
    /// The platform may fall back to another camera.
    Ideal(FacingMode),
    /// The platform must use exactly this camera or fail.
    Exact(FacingMode),
}

impl FacingConstraint {
    pub fn mode(&self) -> FacingMode {
        match self {
            FacingConstraint::Ideal(mode) | FacingConstraint::Exact(mode) => *mode,
        }
    }
}

/// A constraint set for a single stream request.
///
/// `facing: None` with no resolution is the bare `{ video: true }` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    pub facing: Option<FacingConstraint>,
    pub ideal_width: Option<u32>,
    pub ideal_height: Option<u32>,
    /// `Some(false)` asks the platform explicitly for no audio track.
    pub audio: Option<bool>,
}

impl VideoConstraints {
    /// `{ video: true }`
    pub fn bare() -> Self {
        Self {
            facing: None,
            ideal_width: None,
            ideal_height: None,
            audio: None,
        }
    }

    /// `{ video: true, audio: false }`
    pub fn minimal() -> Self {
        Self {
            audio: Some(false),
            ..Self::bare()
        }
    }

    pub fn facing(mode: FacingMode) -> Self {
        Self {
            facing: Some(FacingConstraint::Ideal(mode)),
            ..Self::bare()
        }
    }

    pub fn preferred(mode: FacingMode, width: u32, height: u32) -> Self {
        Self {
            facing: Some(FacingConstraint::Ideal(mode)),
            ideal_width: Some(width),
            ideal_height: Some(height),
            audio: Some(false),
        }
    }

    pub fn exact(mode: FacingMode, width: u32, height: u32) -> Self {
        Self {
            facing: Some(FacingConstraint::Exact(mode)),
            ideal_width: Some(width),
            ideal_height: Some(height),
            audio: None,
        }
    }

    pub fn is_bare(&self) -> bool {
        self.facing.is_none() && self.ideal_width.is_none() && self.ideal_height.is_none()
    }
}
