// Unpacking of downloaded artifacts.
//
// Two archive formats are consumed: gzip-compressed tar (`.tar.gz` / `.tgz`) and zip.
// Everything else is a raw executable and passes through untouched.

use crate::libs::errors::InstallError;
use crate::log_debug;
// Which of the three unpack paths a candidate takes, decided when the candidate was built.
use crate::schemas::candidate::UnpackStrategy;
use colored::Colorize;
// Streaming gzip decoder; the tar reader sits on top of it.
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
// Tar reader. `Archive::unpack` writes every entry below a destination directory.
use tar::Archive;
// Zip reader. Needs `Read + Seek`, which a plain `File` provides.
use zip::ZipArchive;

/// What the unpacker produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Unpacked {
    /// The artifact is itself the executable.
    Binary(PathBuf),
    /// The archive was extracted into this directory; the executable still has to be located.
    Extracted(PathBuf),
}

/// Unpacks `artifact` according to `strategy`.
///
/// Archives are extracted into a fresh `extract/` directory under `work_dir`; the
/// work directory belongs to a single candidate attempt and is discarded afterwards.
///
/// # Errors
/// `ExtractionFailed` when the archive is malformed or cannot be written out.
pub fn unpack(artifact: &Path, strategy: UnpackStrategy, work_dir: &Path) -> Result<Unpacked, InstallError> {
    // Pick the extractor up front; a raw binary returns before any directory is created.
    let extract: fn(&Path, &Path) -> Result<(), String> = match strategy {
        UnpackStrategy::RawBinary => {
            log_debug!("[Unpack] {} is a raw binary, nothing to extract", artifact.display());
            return Ok(Unpacked::Binary(artifact.to_path_buf()));
        }
        UnpackStrategy::ArchiveTar => extract_tar_gz,
        UnpackStrategy::ArchiveZip => extract_zip,
    };

    // A dedicated subdirectory keeps the downloaded artifact out of the binary search.
    let extract_dir = work_dir.join("extract");
    fs::create_dir_all(&extract_dir)
        .map_err(|e| InstallError::io(format!("creating {}", extract_dir.display()), e))?;

    log_debug!(
        "[Unpack] Extracting {} ({}) into {}",
        artifact.to_string_lossy().blue(),
        strategy,
        extract_dir.to_string_lossy().cyan()
    );

    // Any reader error becomes a per-candidate failure; the installer moves on to the next one.
    extract(artifact, &extract_dir).map_err(|reason| InstallError::ExtractionFailed {
        archive: artifact.to_path_buf(),
        reason,
    })?;

    Ok(Unpacked::Extracted(extract_dir))
}

/// `.tar.gz` / `.tgz`, decompressed while it is read.
fn extract_tar_gz(src: &Path, dest: &Path) -> Result<(), String> {
    let file = File::open(src).map_err(|e| e.to_string())?;
    let mut archive = Archive::new(GzDecoder::new(file));
    // `unpack` refuses entries that would escape `dest` (absolute paths, `..`).
    archive.unpack(dest).map_err(|e| e.to_string())
}

/// `.zip`. Entry names are sanitized by `ZipArchive::extract`, as with tar.
fn extract_zip(src: &Path, dest: &Path) -> Result<(), String> {
    let file = File::open(src).map_err(|e| e.to_string())?;
    let mut archive = ZipArchive::new(file).map_err(|e| e.to_string())?;
    archive.extract(dest).map_err(|e| e.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    /// Builds a `.tar.gz` at `path` containing `(entry name, contents)` pairs.
    pub(crate) fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *contents).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    /// Builds a `.zip` in memory containing `(entry name, contents)` pairs.
    pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn raw_binary_passes_through() {
        let work = tempfile::tempdir().unwrap();
        let artifact = work.path().join("mtest-v1-linux-amd64");
        fs::write(&artifact, b"ELF").unwrap();

        let unpacked = unpack(&artifact, UnpackStrategy::RawBinary, work.path()).unwrap();
        assert_eq!(unpacked, Unpacked::Binary(artifact));
        assert!(!work.path().join("extract").exists());
    }

    #[test]
    fn extracts_tar_gz() {
        let work = tempfile::tempdir().unwrap();
        let artifact = work.path().join("mtest.tar.gz");
        write_tar_gz(
            &artifact,
            &[("mtest-v1/mtest", &b"binary"[..]), ("mtest-v1/README.md", &b"docs"[..])],
        );

        let unpacked = unpack(&artifact, UnpackStrategy::ArchiveTar, work.path()).unwrap();
        let Unpacked::Extracted(dir) = unpacked else {
            panic!("expected an extraction directory");
        };
        assert_eq!(fs::read(dir.join("mtest-v1").join("mtest")).unwrap(), b"binary");
        assert!(dir.join("mtest-v1").join("README.md").is_file());
    }

    #[test]
    fn extracts_zip() {
        let work = tempfile::tempdir().unwrap();
        let artifact = work.path().join("mtest.zip");
        fs::write(&artifact, zip_bytes(&[("bin/mtest.exe", &b"MZ"[..])])).unwrap();

        let unpacked = unpack(&artifact, UnpackStrategy::ArchiveZip, work.path()).unwrap();
        assert_eq!(unpacked, Unpacked::Extracted(work.path().join("extract")));
        assert_eq!(fs::read(work.path().join("extract/bin/mtest.exe")).unwrap(), b"MZ");
    }

    #[test]
    fn malformed_archives_fail_extraction() {
        let work = tempfile::tempdir().unwrap();
        let artifact = work.path().join("broken.zip");
        fs::write(&artifact, b"<html>404 page from a CDN</html>").unwrap();

        for strategy in [UnpackStrategy::ArchiveZip, UnpackStrategy::ArchiveTar] {
            let err = unpack(&artifact, strategy, work.path()).unwrap_err();
            assert!(
                matches!(err, InstallError::ExtractionFailed { .. }),
                "{strategy}: unexpected error {err:?}"
            );
        }
    }
}
