use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::compressor::Compressor;
use crate::config::RunConfig;
use crate::error::ToolError;
use crate::report::Report;

/// Eligible source extensions, in report order. Matching is
/// case-sensitive: "JPG" is not picked up.
pub const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Success,
    Error,
    AlreadyExists,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::Success => "Success",
            ConversionStatus::Error => "Error",
            ConversionStatus::AlreadyExists => "Already exists",
        }
    }
}

/// Outcome of one source file. Sizes are present exactly when the
/// conversion succeeded.
#[derive(Debug)]
pub struct ConversionResult {
    pub path: PathBuf,
    pub original_kib: Option<u64>,
    pub converted_kib: Option<u64>,
    pub saved_kib: Option<i64>,
    pub status: ConversionStatus,
}

impl ConversionResult {
    fn success(path: PathBuf, original_kib: u64, converted_kib: u64) -> Self {
        Self {
            path,
            original_kib: Some(original_kib),
            converted_kib: Some(converted_kib),
            saved_kib: Some(original_kib as i64 - converted_kib as i64),
            status: ConversionStatus::Success,
        }
    }

    fn without_sizes(path: PathBuf, status: ConversionStatus) -> Self {
        Self {
            path,
            original_kib: None,
            converted_kib: None,
            saved_kib: None,
            status,
        }
    }
}

/// Collect eligible images directly inside `source_dir`, grouped by
/// extension in the order of `EXTENSIONS` and sorted by path within
/// each group.
pub fn collect_images(source_dir: &Path) -> Result<Vec<PathBuf>, ToolError> {
    let mut groups: Vec<Vec<PathBuf>> = vec![Vec::new(); EXTENSIONS.len()];

    for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if let Some(idx) = EXTENSIONS.iter().position(|&e| e == ext) {
            groups[idx].push(path);
        }
    }

    for group in &mut groups {
        group.sort();
    }

    Ok(groups.into_iter().flatten().collect())
}

/// Derived target path: `<output_dir>/<stem>.webp`.
pub fn target_path(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}.webp", stem))
}

/// Convert every eligible image in the source directory, streaming one
/// report row per file as it finishes. Per-file failures never abort
/// the run.
pub fn run<W: Write>(
    config: &RunConfig,
    compressor: &dyn Compressor,
    report: &mut Report<W>,
) -> Result<(), ToolError> {
    fs::create_dir_all(&config.output_dir).map_err(|e| ToolError::CreateDir {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let files = collect_images(&config.source_dir)?;
    log::debug!("Found {} eligible file(s)", files.len());

    report.header().map_err(ToolError::Report)?;

    for file in files {
        let result = convert_one(&file, config, compressor);
        report.row(&result).map_err(ToolError::Report)?;
    }

    Ok(())
}

fn convert_one(path: &Path, config: &RunConfig, compressor: &dyn Compressor) -> ConversionResult {
    let target = target_path(path, &config.output_dir);

    if target.exists() && !config.force {
        return ConversionResult::without_sizes(
            path.to_path_buf(),
            ConversionStatus::AlreadyExists,
        );
    }

    match compressor.convert(path, &target, config.quality) {
        Ok(true) => match (fs::metadata(path), fs::metadata(&target)) {
            (Ok(src), Ok(dst)) => {
                ConversionResult::success(path.to_path_buf(), src.len() / 1024, dst.len() / 1024)
            }
            _ => {
                log::error!("Converted {} but could not read file sizes", path.display());
                ConversionResult::without_sizes(path.to_path_buf(), ConversionStatus::Error)
            }
        },
        Ok(false) => {
            log::error!("cwebp failed for {}", path.display());
            ConversionResult::without_sizes(path.to_path_buf(), ConversionStatus::Error)
        }
        Err(e) => {
            log::error!("Error converting {}: {}", path.display(), e);
            ConversionResult::without_sizes(path.to_path_buf(), ConversionStatus::Error)
        }
    }
}
