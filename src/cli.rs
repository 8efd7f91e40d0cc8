use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sw_core::camera::{FacingMode, PermissionState};
use sw_core::payload::PayloadType;
use sw_platform::RuntimeProbe;
use sw_shell::bootstrap::tracing::init_tracing_subscriber;
use sw_shell::bootstrap::wiring::resolve_app_dirs;
use sw_shell::bootstrap::{resolve_config, wire_dependencies};
use sw_shell::commands::scanner::{self, ScanRequest};
use sw_shell::commands::CommandError;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "ssi-wallet")]
#[command(about = "SSI wallet QR scanner pipeline", long_about = None)]
pub struct Cli {
    /// Config file (TOML). Defaults to ./config.toml when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Host user agent, used for runtime detection
    #[arg(long, global = true, default_value = "")]
    pub user_agent: String,

    /// Running as an installed app (standalone display mode)
    #[arg(long, global = true)]
    pub standalone: bool,

    /// Page is not served from a secure context
    #[arg(long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the detected runtime context
    Probe,
    /// Decode the QR code in an image file
    Decode {
        /// Image file
        image: PathBuf,
    },
    /// Classify a URL and store its payload (manual entry)
    Classify {
        url: String,
    },
    /// Run the scanner screen against a directory of still frames
    Scan {
        /// Directory of image files replayed as camera frames
        #[arg(short, long)]
        frames: PathBuf,
        #[arg(long, value_enum, default_value_t = FacingArg::Environment)]
        facing: FacingArg,
        /// Simulate a denied camera permission
        #[arg(long)]
        deny: bool,
        /// Force manual (true) or camera (false) mode on mount
        #[arg(long)]
        manual: Option<bool>,
        /// Stop waiting for a symbol after this many milliseconds
        #[arg(long, default_value_t = 5_000)]
        timeout_ms: u64,
    },
    /// Read and clear a stored payload
    Take {
        #[arg(value_enum)]
        kind: PayloadKindArg,
    },
    /// Forget the "camera access issues" flag
    ResetPreference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FacingArg {
    Environment,
    User,
}

impl From<FacingArg> for FacingMode {
    fn from(arg: FacingArg) -> Self {
        match arg {
            FacingArg::Environment => FacingMode::Environment,
            FacingArg::User => FacingMode::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadKindArg {
    CredentialOffer,
    PresentationRequest,
}

impl From<PayloadKindArg> for PayloadType {
    fn from(arg: PayloadKindArg) -> Self {
        match arg {
            PayloadKindArg::CredentialOffer => PayloadType::CredentialOffer,
            PayloadKindArg::PresentationRequest => PayloadType::PresentationRequest,
        }
    }
}

impl Cli {
    pub fn probe(&self) -> RuntimeProbe {
        RuntimeProbe {
            user_agent: self.user_agent.clone(),
            display_mode_standalone: self.standalone,
            navigator_standalone: false,
            is_secure_context: Some(!self.insecure),
        }
    }
}

/// Run one subcommand. Returns the process exit code.
///
/// Command failures are printed as JSON and yield exit code 1; only
/// startup failures (config, tracing) surface as `Err`.
pub async fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = resolve_config(cli.config.as_deref())?;
    let probe = cli.probe();

    let logs_dir = resolve_app_dirs(&config).ok().map(|dirs| dirs.logs_dir());
    if let Err(e) = init_tracing_subscriber(logs_dir.as_deref()) {
        eprintln!("tracing already initialized: {e}");
    }

    let runtime = match wire_dependencies(config, &probe) {
        Ok(runtime) => runtime,
        Err(e) => return Ok(print_error(&CommandError::from(e))),
    };

    let result = match cli.command {
        Command::Probe => print_json(&scanner::probe_runtime(&probe)),
        Command::Decode { image } => scanner::decode_image(&runtime, image)
            .await
            .and_then(|dto| print_json(&dto)),
        Command::Classify { url } => scanner::classify_url(&runtime, &url)
            .await
            .and_then(|dto| print_json(&dto)),
        Command::Scan {
            frames,
            facing,
            deny,
            manual,
            timeout_ms,
        } => {
            let request = ScanRequest {
                frames_dir: frames,
                facing_mode: facing.into(),
                permission: if deny {
                    PermissionState::Denied
                } else {
                    PermissionState::Granted
                },
                manual_override: manual,
                deadline: Duration::from_millis(timeout_ms),
            };
            scanner::scan_frames(&runtime, request)
                .await
                .and_then(|dto| print_json(&dto))
        }
        Command::Take { kind } => scanner::take_payload(&runtime, kind.into())
            .await
            .and_then(|dto| print_json(&dto)),
        Command::ResetPreference => scanner::reset_preference(&runtime)
            .await
            .and_then(|()| print_json(&serde_json::json!({ "reset": true }))),
    };

    Ok(match result {
        Ok(()) => 0,
        Err(e) => print_error(&e),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::Internal(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_error(err: &CommandError) -> i32 {
    error!(code = err.code(), error = %err, "command failed");
    let body = serde_json::to_string_pretty(&serde_json::json!({ "error": err }))
        .unwrap_or_else(|_| format!(r#"{{"error":{{"code":"{}"}}}}"#, err.code()));
    println!("{body}");
    1
}
