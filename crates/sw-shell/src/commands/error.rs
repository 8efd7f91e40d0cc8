use serde::Serialize;
use sw_app::ScreenError;
use sw_core::decode::DecodeError;
use thiserror::Error;

use crate::bootstrap::WiringError;

/// Command failure, serialized as `{"code": .., "message": ..}`.
///
/// 命令错误，序列化为 `{"code": .., "message": ..}`。
#[derive(Debug, Error, Serialize)]
#[serde(tag = "code", content = "message", rename_all = "snake_case")]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("scanner error: {0}")]
    Screen(String),

    #[error("startup failed: {0}")]
    Wiring(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::InvalidInput(_) => "invalid_input",
            CommandError::Decode(_) => "decode",
            CommandError::Screen(_) => "screen",
            CommandError::Wiring(_) => "wiring",
            CommandError::Internal(_) => "internal",
        }
    }
}

impl From<ScreenError> for CommandError {
    fn from(err: ScreenError) -> Self {
        match err {
            ScreenError::EmptyInput => CommandError::InvalidInput(err.to_string()),
            ScreenError::Decode(inner) => inner.into(),
            other => CommandError::Screen(other.to_string()),
        }
    }
}

impl From<DecodeError> for CommandError {
    fn from(err: DecodeError) -> Self {
        CommandError::Decode(err.to_string())
    }
}

impl From<WiringError> for CommandError {
    fn from(err: WiringError) -> Self {
        CommandError::Wiring(err.to_string())
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        CommandError::Internal(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_maps_to_invalid_input() {
        let err: CommandError = ScreenError::EmptyInput.into();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn screen_decode_error_is_unwrapped() {
        let err: CommandError = ScreenError::Decode(DecodeError::NoSymbolFound).into();
        assert!(matches!(err, CommandError::Decode(_)));
    }

    #[test]
    fn serializes_with_code_and_message() {
        let err = CommandError::InvalidInput("please enter a URL".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "invalid_input");
        assert_eq!(json["message"], "please enter a URL");
    }
}
