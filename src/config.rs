use std::path::PathBuf;

/// Name of the output subdirectory used when `--output` is not given.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "converted_images";

/// Immutable per-run settings, built once from the parsed CLI.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Quality 0-100 passed to cwebp (lower = smaller file, worse quality)
    pub quality: u8,
    /// Directory scanned for source images (non-recursive)
    pub source_dir: PathBuf,
    /// Directory receiving the .webp files
    pub output_dir: PathBuf,
    /// Overwrite existing .webp outputs instead of skipping them
    pub force: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from(".").join(DEFAULT_OUTPUT_SUBDIR),
            force: false,
        }
    }
}
