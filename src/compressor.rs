use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::ToolError;

/// Name the external binary is looked up under; Windows resolves the
/// .exe suffix through the normal search rules.
pub const CWEBP_BIN: &str = "cwebp";

/// Seam around the external WebP encoder so the batch loop can be
/// exercised in tests without spawning a real process.
pub trait Compressor {
    /// Whether the compressor can be invoked from the search path.
    fn is_available(&self) -> bool;

    /// Encode `input` into `output` at the given quality.
    /// Returns Ok(true) on a zero exit status, Ok(false) otherwise.
    fn convert(&self, input: &Path, output: &Path, quality: u8) -> Result<bool, ToolError>;
}

/// The real cwebp binary.
pub struct Cwebp;

impl Compressor for Cwebp {
    fn is_available(&self) -> bool {
        Command::new(CWEBP_BIN)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn convert(&self, input: &Path, output: &Path, quality: u8) -> Result<bool, ToolError> {
        let mut cmd = Command::new(CWEBP_BIN);
        cmd.arg("-q")
            .arg(quality.to_string())
            .arg(input)
            .arg("-o")
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        log::debug!("Executing: cwebp {:?}", cmd.get_args().collect::<Vec<_>>());

        let status = cmd.status().map_err(|e| ToolError::Spawn {
            program: CWEBP_BIN.to_string(),
            source: e,
        })?;

        Ok(status.success())
    }
}
