//! QR capture collaborator
//!
//! A capture is a photo chosen with the native file picker, decoded by an
//! external QR decoder (zbarimg by default). Only a capture that yields both
//! a photo and a decoded value becomes a scan; everything else is dropped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::CaptureConfig;
use crate::error::{Error, Result};

/// Raw result handed back by the capture collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureResult {
    pub photo: Option<PathBuf>,
    pub value: Option<String>,
}

impl CaptureResult {
    /// Photo and value, if both are present
    pub fn into_scan(self) -> Option<(PathBuf, String)> {
        Some((self.photo?, self.value?))
    }
}

/// How a capture attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured { photo: PathBuf, value: String },
    /// The user backed out of the picker
    Cancelled,
    /// The photo or the decoder could not be accessed
    PermissionDenied,
    /// No photo or no decoded value
    Incomplete,
}

impl From<CaptureResult> for CaptureOutcome {
    fn from(result: CaptureResult) -> Self {
        match result.into_scan() {
            Some((photo, value)) => CaptureOutcome::Captured { photo, value },
            None => CaptureOutcome::Incomplete,
        }
    }
}

/// Run one capture: pick a photo, then decode it
pub async fn capture_scan(config: CaptureConfig) -> CaptureOutcome {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Select QR Code Photo")
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "gif", "webp"])
        .pick_file()
        .await;

    let Some(handle) = picked else {
        debug!("Capture cancelled");
        return CaptureOutcome::Cancelled;
    };

    decode_photo(&config, handle.path().to_path_buf()).await
}

/// Decode an already chosen photo into a capture outcome
pub async fn decode_photo(config: &CaptureConfig, photo: PathBuf) -> CaptureOutcome {
    match run_decoder(config, &photo).await {
        Ok(value) => CaptureOutcome::from(CaptureResult {
            photo: Some(photo),
            value,
        }),
        Err(Error::Io(e)) if e.kind() == ErrorKind::PermissionDenied => {
            warn!("Permission denied while decoding {}: {}", photo.display(), e);
            CaptureOutcome::PermissionDenied
        }
        Err(e) => {
            warn!("Could not decode {}: {}", photo.display(), e);
            CaptureOutcome::Incomplete
        }
    }
}

/// Run the decoder on a photo. `Ok(None)` means nothing was decoded.
async fn run_decoder(config: &CaptureConfig, photo: &Path) -> Result<Option<String>> {
    // Surface unreadable photos before blaming the decoder
    tokio::fs::File::open(photo).await?;

    let output = Command::new(&config.decoder_program)
        .args(&config.decoder_args)
        .arg(photo)
        .output()
        .await?;

    if !output.status.success() {
        info!(
            "Decoder found no QR code in {} ({})",
            photo.display(),
            output.status
        );
        return Ok(None);
    }

    Ok(decoded_value(&String::from_utf8_lossy(&output.stdout)))
}

/// Decoder output minus its trailing line break.
///
/// Line breaks inside a payload are kept. With several codes in one photo
/// the decoder prints one per line and all of them end up in the value.
fn decoded_value(stdout: &str) -> Option<String> {
    let value = stdout
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(stdout);

    (!value.is_empty()).then(|| value.to_string())
}
