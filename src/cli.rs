use std::path::PathBuf;

use clap::Parser;

use crate::config::{RunConfig, DEFAULT_OUTPUT_SUBDIR};

/// Convert all .jpg, .jpeg and .png images in a directory to WebP
#[derive(Debug, Parser)]
#[command(name = "folder_to_webp", version, about)]
pub struct Cli {
    /// Compression quality passed to cwebp (0-100)
    #[arg(long = "compress", default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub compress: u8,

    /// Directory with the source images
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Directory for the converted images (default: "converted_images" inside the source directory)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing .webp files
    #[arg(long)]
    pub force: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> RunConfig {
        let output_dir = self
            .output
            .clone()
            .unwrap_or_else(|| self.source.join(DEFAULT_OUTPUT_SUBDIR));
        RunConfig {
            quality: self.compress,
            source_dir: self.source.clone(),
            output_dir,
            force: self.force,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["folder_to_webp"]);
        let config = cli.to_config();
        assert_eq!(config.quality, 80);
        assert_eq!(config.source_dir, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from(".").join("converted_images"));
        assert!(!config.force);
    }

    #[test]
    fn test_output_defaults_inside_source() {
        let cli = Cli::parse_from(["folder_to_webp", "--source", "/data/photos"]);
        let config = cli.to_config();
        assert_eq!(
            config.output_dir,
            PathBuf::from("/data/photos").join("converted_images")
        );
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::parse_from([
            "folder_to_webp",
            "--compress",
            "55",
            "--source",
            "in",
            "--output",
            "out",
            "--force",
        ]);
        let config = cli.to_config();
        assert_eq!(config.quality, 55);
        assert_eq!(config.source_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.force);
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["folder_to_webp", "--compress", "101"]).is_err());
    }
}
