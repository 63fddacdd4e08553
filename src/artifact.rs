//! Reading and atomically replacing the persisted graph artifact.
//!
//! The codec works in UTF-8; this module transcodes to and from the
//! configured artifact encoding with `encoding_rs`. Writes go to a temporary
//! file in the destination directory which is then renamed over the target,
//! so an interrupted run leaves the previous artifact intact.

use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tempfile::NamedTempFile;

use crate::error::ArtifactError;

/// Result type for artifact I/O.
pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;

fn encoding_for(label: &str) -> ArtifactResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| ArtifactError::UnknownEncoding {
        label: label.to_string(),
    })
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ArtifactError + '_ {
    move |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the artifact at `path` and return its contents as UTF-8 bytes.
pub fn read(path: &Path, encoding: &str) -> ArtifactResult<Vec<u8>> {
    let encoding = encoding_for(encoding)?;
    let raw = std::fs::read(path).map_err(io_error(path))?;
    if encoding == encoding_rs::UTF_8 {
        return Ok(raw);
    }
    let (text, _, had_errors) = encoding.decode(&raw);
    if had_errors {
        return Err(ArtifactError::Decode {
            path: path.to_path_buf(),
            label: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned().into_bytes())
}

/// Atomically replace `path` with `utf8` transcoded to `encoding`.
pub fn write_atomic(path: &Path, utf8: &[u8], encoding: &str) -> ArtifactResult<()> {
    let encoding = encoding_for(encoding)?;
    let bytes = transcode(utf8, encoding)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(io_error(&dir))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(io_error(&dir))?;
    tmp.write_all(&bytes).map_err(io_error(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_error(path))?;
    tmp.persist(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), encoding = encoding.name(), "wrote artifact");
    Ok(())
}

fn transcode<'a>(utf8: &'a [u8], encoding: &'static Encoding) -> ArtifactResult<std::borrow::Cow<'a, [u8]>> {
    if encoding == encoding_rs::UTF_8 {
        return Ok(utf8.into());
    }
    let text = std::str::from_utf8(utf8).map_err(|_| ArtifactError::Unencodable {
        label: encoding.name().to_string(),
    })?;
    let (bytes, used, unmappable) = encoding.encode(text);
    // UTF-16 and replacement encodings silently encode as UTF-8 instead.
    if unmappable || used != encoding {
        return Err(ArtifactError::Unencodable {
            label: encoding.name().to_string(),
        });
    }
    Ok(bytes.into_owned().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_utf8() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/out.ttl");
        write_atomic(&path, "<a> <b> \"café\" .".as_bytes(), "utf-8").unwrap();
        assert_eq!(read(&path, "UTF8").unwrap(), "<a> <b> \"café\" .".as_bytes());
    }

    #[test]
    fn latin1_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.ttl");
        write_atomic(&path, "\"café\"".as_bytes(), "iso-8859-1").unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(raw, b"\"caf\xe9\"");
        assert_eq!(read(&path, "latin1").unwrap(), "\"café\"".as_bytes());
    }

    #[test]
    fn unencodable_text_leaves_previous_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.ttl");
        write_atomic(&path, b"previous", "utf-8").unwrap();
        let err = write_atomic(&path, "\"東京\"".as_bytes(), "windows-1252").unwrap_err();
        assert!(matches!(err, ArtifactError::Unencodable { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn unknown_encoding() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = write_atomic(&dir.path().join("x"), b"", "klingon").unwrap_err();
        assert!(matches!(err, ArtifactError::UnknownEncoding { .. }));
    }

    #[test]
    fn utf16_is_not_writable() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = write_atomic(&dir.path().join("x"), b"abc", "utf-16le").unwrap_err();
        assert!(matches!(err, ArtifactError::Unencodable { .. }));
    }
}
