use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::compressor::Compressor;
use crate::error::ToolError;

/// Upstream libwebp release the prebuilt archives are pinned to.
const WEBP_VERSION: &str = "1.3.2";
const DOWNLOAD_BASE: &str = "https://storage.googleapis.com/downloads.webmproject.org/releases/webp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
}

impl ArchiveKind {
    fn extension(self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
        }
    }
}

/// One row of the (os, arch) → prebuilt archive lookup table.
#[derive(Debug, Clone, Copy)]
pub struct DownloadTarget {
    os: &'static str,
    arch: &'static str,
    /// Archive stem, which is also the top-level directory inside it.
    stem: &'static str,
    pub kind: ArchiveKind,
}

const TARGETS: &[DownloadTarget] = &[
    DownloadTarget {
        os: "linux",
        arch: "x86_64",
        stem: "libwebp-1.3.2-linux-x86-64",
        kind: ArchiveKind::TarGz,
    },
    DownloadTarget {
        os: "linux",
        arch: "aarch64",
        stem: "libwebp-1.3.2-linux-aarch64",
        kind: ArchiveKind::TarGz,
    },
    DownloadTarget {
        os: "macos",
        arch: "x86_64",
        stem: "libwebp-1.3.2-mac-x86-64",
        kind: ArchiveKind::TarGz,
    },
    DownloadTarget {
        os: "macos",
        arch: "aarch64",
        stem: "libwebp-1.3.2-mac-arm64",
        kind: ArchiveKind::TarGz,
    },
    DownloadTarget {
        os: "windows",
        arch: "x86_64",
        stem: "libwebp-1.3.2-windows-x64",
        kind: ArchiveKind::Zip,
    },
];

impl DownloadTarget {
    pub fn for_host(os: &str, arch: &str) -> Option<&'static DownloadTarget> {
        TARGETS.iter().find(|t| t.os == os && t.arch == arch)
    }

    pub fn url(&self) -> String {
        format!("{}/{}.{}", DOWNLOAD_BASE, self.stem, self.kind.extension())
    }

    fn archive_file_name(&self) -> String {
        format!("{}.{}", self.stem, self.kind.extension())
    }

    /// Path of the cwebp binary inside the extracted archive.
    fn binary_rel_path(&self) -> PathBuf {
        Path::new(self.stem).join("bin").join(binary_name(self.os))
    }
}

fn binary_name(os: &str) -> &'static str {
    if os == "windows" {
        "cwebp.exe"
    } else {
        "cwebp"
    }
}

/// System-wide directory the binary is installed into.
fn install_dir() -> PathBuf {
    if cfg!(windows) {
        let root = env::var("SystemRoot").unwrap_or_else(|_| "C:\\Windows".to_string());
        Path::new(&root).join("System32")
    } else {
        PathBuf::from("/usr/local/bin")
    }
}

/// Make sure cwebp is callable before conversion starts. No-op when it
/// already is; repeated runs skip the install.
pub fn ensure(compressor: &dyn Compressor) -> Result<(), ToolError> {
    if compressor.is_available() {
        log::debug!("cwebp already present on the search path");
        return Ok(());
    }

    println!("cwebp is not installed. Installing cwebp...");
    install()?;
    println!("cwebp installation finished.");
    Ok(())
}

fn install() -> Result<(), ToolError> {
    if cfg!(target_os = "macos") && homebrew_available() {
        return install_with_homebrew();
    }

    let os = env::consts::OS;
    let arch = env::consts::ARCH;
    let target =
        DownloadTarget::for_host(os, arch).ok_or_else(|| ToolError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        })?;

    install_from_release(target)
}

fn homebrew_available() -> bool {
    Command::new("brew")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn install_with_homebrew() -> Result<(), ToolError> {
    log::info!("Installing webp via Homebrew");
    let status = Command::new("brew")
        .arg("install")
        .arg("webp")
        .status()
        .map_err(|e| ToolError::Spawn {
            program: "brew".to_string(),
            source: e,
        })?;

    if !status.success() {
        return Err(ToolError::PackageManager(format!(
            "brew install webp exited with {}",
            status
        )));
    }
    Ok(())
}

/// Download the prebuilt libwebp release, extract it and place cwebp
/// into the system binary directory. The temporary area is dropped on
/// every exit path, including errors.
fn install_from_release(target: &DownloadTarget) -> Result<(), ToolError> {
    log::info!(
        "Installing cwebp {} for {}/{}",
        WEBP_VERSION,
        target.os,
        target.arch
    );

    let tmp = tempfile::tempdir().map_err(|e| ToolError::Install {
        path: env::temp_dir(),
        source: e,
    })?;

    let archive_path = tmp.path().join(target.archive_file_name());
    download(&target.url(), &archive_path)?;

    let unpack_dir = tmp.path().join("unpacked");
    match target.kind {
        ArchiveKind::TarGz => extract_tar_gz(&archive_path, &unpack_dir)?,
        ArchiveKind::Zip => extract_zip(&archive_path, &unpack_dir)?,
    }

    let binary = unpack_dir.join(target.binary_rel_path());
    let dest = install_dir().join(binary_name(target.os));

    fs::copy(&binary, &dest).map_err(|e| ToolError::Install {
        path: dest.clone(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).map_err(|e| {
            ToolError::Install {
                path: dest.clone(),
                source: e,
            }
        })?;
    }

    log::info!("Installed cwebp to {}", dest.display());
    Ok(())
}

fn download(url: &str, dest: &Path) -> Result<(), ToolError> {
    log::info!("Downloading {}", url);

    let response = ureq::get(url).call().map_err(|e| ToolError::Download {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let mut reader = response.into_reader();
    let mut file = fs::File::create(dest).map_err(|e| ToolError::Install {
        path: dest.to_path_buf(),
        source: e,
    })?;

    io::copy(&mut reader, &mut file).map_err(|e| ToolError::Download {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<(), ToolError> {
    let file = fs::File::open(archive_path).map_err(|e| ToolError::Extract {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let tar = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(tar);
    archive.unpack(dest).map_err(|e| ToolError::Extract {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<(), ToolError> {
    let file = fs::File::open(archive_path).map_err(|e| ToolError::Extract {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| ToolError::Extract {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    archive.extract(dest).map_err(|e| ToolError::Extract {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_covers_supported_platforms() {
        for (os, arch) in [
            ("linux", "x86_64"),
            ("linux", "aarch64"),
            ("macos", "x86_64"),
            ("macos", "aarch64"),
            ("windows", "x86_64"),
        ] {
            assert!(
                DownloadTarget::for_host(os, arch).is_some(),
                "missing target for {}/{}",
                os,
                arch
            );
        }
    }

    #[test]
    fn test_lookup_rejects_unknown_platform() {
        assert!(DownloadTarget::for_host("plan9", "x86_64").is_none());
        assert!(DownloadTarget::for_host("linux", "riscv64").is_none());
        assert!(DownloadTarget::for_host("windows", "aarch64").is_none());
    }

    #[test]
    fn test_urls_point_at_pinned_release() {
        let linux = DownloadTarget::for_host("linux", "aarch64").unwrap();
        assert_eq!(
            linux.url(),
            "https://storage.googleapis.com/downloads.webmproject.org/releases/webp/libwebp-1.3.2-linux-aarch64.tar.gz"
        );

        let mac = DownloadTarget::for_host("macos", "aarch64").unwrap();
        assert_eq!(
            mac.url(),
            "https://storage.googleapis.com/downloads.webmproject.org/releases/webp/libwebp-1.3.2-mac-arm64.tar.gz"
        );

        let windows = DownloadTarget::for_host("windows", "x86_64").unwrap();
        assert_eq!(
            windows.url(),
            "https://storage.googleapis.com/downloads.webmproject.org/releases/webp/libwebp-1.3.2-windows-x64.zip"
        );
        assert_eq!(windows.kind, ArchiveKind::Zip);
    }

    #[test]
    fn test_binary_rel_path_follows_archive_layout() {
        let linux = DownloadTarget::for_host("linux", "x86_64").unwrap();
        assert_eq!(
            linux.binary_rel_path(),
            Path::new("libwebp-1.3.2-linux-x86-64").join("bin").join("cwebp")
        );

        let windows = DownloadTarget::for_host("windows", "x86_64").unwrap();
        assert_eq!(
            windows.binary_rel_path(),
            Path::new("libwebp-1.3.2-windows-x64").join("bin").join("cwebp.exe")
        );
    }
}
