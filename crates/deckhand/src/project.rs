//! Copying a profile's collection and media into a project folder.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{COLLECTION_FILE, MEDIA_DIR};
use crate::error::{Error, Result};
use crate::types::CopyReport;

#[derive(Debug, Default)]
struct MediaTotals {
    files: usize,
    bytes: u64,
}

/// Copy `<data_dir>/collection.anki2` and `<data_dir>/media` into `project`.
///
/// The collection is copied first and overwrites any existing file. Media is
/// merged into `<project>/media`: files already there and absent from the
/// source are left alone, same-named files are overwritten. Nothing is
/// rolled back when a later step fails.
///
/// A project folder that resolves to the profile itself, or whose media
/// directory nests with the profile's, is rejected before anything is written.
pub(crate) fn copy_to_project(data_dir: &Path, project: &Path) -> Result<CopyReport> {
    let collection_src = data_dir.join(COLLECTION_FILE);
    let collection_dst = project.join(COLLECTION_FILE);
    let media_src = data_dir.join(MEDIA_DIR);
    let media_dst = project.join(MEDIA_DIR);

    ensure_disjoint(data_dir, project)?;

    std::fs::create_dir_all(project).map_err(|source| Error::CollectionCopy {
        from: collection_src.clone(),
        to: project.to_path_buf(),
        source,
    })?;

    let collection_bytes =
        std::fs::copy(&collection_src, &collection_dst).map_err(|source| {
            Error::CollectionCopy {
                from: collection_src.clone(),
                to: collection_dst.clone(),
                source,
            }
        })?;

    info!(
        from = %collection_src.display(),
        to = %collection_dst.display(),
        bytes = collection_bytes,
        "Copied collection"
    );

    let mut totals = MediaTotals::default();
    copy_dir_recursive(&media_src, &media_dst, &mut totals)?;

    info!(
        from = %media_src.display(),
        to = %media_dst.display(),
        files = totals.files,
        bytes = totals.bytes,
        "Copied media"
    );

    Ok(CopyReport {
        collection: collection_dst,
        media_dir: media_dst,
        media_files: totals.files,
        bytes_copied: collection_bytes + totals.bytes,
    })
}

/// Reject a project folder that would copy the profile onto itself.
///
/// The collection destination must not be the source collection, and
/// neither media directory may contain the other.
fn ensure_disjoint(data_dir: &Path, project: &Path) -> Result<()> {
    let collection_error = |source: std::io::Error| Error::CollectionCopy {
        from: data_dir.join(COLLECTION_FILE),
        to: project.join(COLLECTION_FILE),
        source,
    };

    let profile = resolve(data_dir).map_err(collection_error)?;
    let target = resolve(project).map_err(collection_error)?;
    let media_src = resolve(&profile.join(MEDIA_DIR)).map_err(collection_error)?;
    let media_dst = resolve(&target.join(MEDIA_DIR)).map_err(collection_error)?;

    let collection_src = resolve(&profile.join(COLLECTION_FILE)).map_err(collection_error)?;
    let collection_dst = resolve(&target.join(COLLECTION_FILE)).map_err(collection_error)?;

    let nested_media = media_dst.starts_with(&media_src) || media_src.starts_with(&media_dst);
    if collection_dst == collection_src || nested_media {
        warn!(
            project = %project.display(),
            data_dir = %data_dir.display(),
            "Refusing to copy a profile into itself"
        );
        return Err(Error::ProjectOverlapsProfile {
            project: project.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
        });
    }

    Ok(())
}

/// Canonicalize `path`, allowing trailing components that do not exist yet.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    let mut existing = path;
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        let lookup = if existing.as_os_str().is_empty() {
            Path::new(".")
        } else {
            existing
        };

        match std::fs::canonicalize(lookup) {
            Ok(base) => {
                return Ok(missing.iter().rev().fold(base, |acc, part| acc.join(part)));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }
}

fn media_error(from: &Path, to: &Path, source: std::io::Error) -> Error {
    Error::MediaCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

/// Recursively copy `src` into `dst`, merging with whatever `dst` holds.
///
/// Symlinked directories are skipped; symlinked files are copied by content.
fn copy_dir_recursive(src: &Path, dst: &Path, totals: &mut MediaTotals) -> Result<()> {
    let entries = std::fs::read_dir(src).map_err(|e| media_error(src, dst, e))?;
    std::fs::create_dir_all(dst).map_err(|e| media_error(src, dst, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| media_error(src, dst, e))?;
        let file_type = entry.file_type().map_err(|e| media_error(src, dst, e))?;
        let path = entry.path();
        let target = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir_recursive(&path, &target, totals)?;
        } else if file_type.is_symlink() && path.is_dir() {
            warn!(link = %path.display(), "Skipping symlinked media directory");
        } else {
            let bytes = std::fs::copy(&path, &target).map_err(|e| media_error(&path, &target, e))?;
            debug!(file = %path.display(), bytes, "Copied media file");
            totals.files += 1;
            totals.bytes += bytes;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_media() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(COLLECTION_FILE), b"collection-bytes").unwrap();
        let media = dir.path().join(MEDIA_DIR);
        std::fs::create_dir_all(media.join("nested")).unwrap();
        std::fs::write(media.join("a.png"), b"png").unwrap();
        std::fs::write(media.join("nested").join("b.mp3"), b"mp3!").unwrap();
        dir
    }

    #[test]
    fn test_copy_creates_project_folder() {
        let profile = profile_with_media();
        let out = tempfile::tempdir().unwrap();
        let project = out.path().join("new-project");

        let report = copy_to_project(profile.path(), &project).unwrap();

        assert_eq!(report.media_files, 2);
        assert_eq!(report.bytes_copied, 16 + 3 + 4);
        assert_eq!(
            std::fs::read(project.join(COLLECTION_FILE)).unwrap(),
            b"collection-bytes"
        );
        assert!(project.join(MEDIA_DIR).join("nested").join("b.mp3").exists());
    }

    #[test]
    fn test_missing_collection_copies_nothing() {
        let profile = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        let err = copy_to_project(profile.path(), project.path()).unwrap_err();

        assert!(matches!(err, Error::CollectionCopy { .. }));
        assert!(!project.path().join(MEDIA_DIR).exists());
    }

    #[test]
    fn test_missing_media_after_collection() {
        let profile = tempfile::tempdir().unwrap();
        std::fs::write(profile.path().join(COLLECTION_FILE), b"db").unwrap();
        let project = tempfile::tempdir().unwrap();

        let err = copy_to_project(profile.path(), project.path()).unwrap_err();

        assert!(matches!(err, Error::MediaCopy { .. }));
        assert!(project.path().join(COLLECTION_FILE).exists());
        assert!(!project.path().join(MEDIA_DIR).exists());
    }

    #[test]
    fn test_resolve_keeps_missing_tail() {
        let dir = tempfile::tempdir().unwrap();
        let base = std::fs::canonicalize(dir.path()).unwrap();

        let resolved = resolve(&dir.path().join("a").join("b")).unwrap();

        assert_eq!(resolved, base.join("a").join("b"));
    }

    #[test]
    fn test_project_equal_to_profile_is_rejected() {
        let profile = profile_with_media();

        let err = copy_to_project(profile.path(), profile.path()).unwrap_err();

        assert!(matches!(err, Error::ProjectOverlapsProfile { .. }));
        assert_eq!(
            std::fs::read(profile.path().join(COLLECTION_FILE)).unwrap(),
            b"collection-bytes"
        );
    }

    #[test]
    fn test_project_inside_media_is_rejected() {
        let profile = profile_with_media();
        let project = profile.path().join(MEDIA_DIR).join("proj");

        let err = copy_to_project(profile.path(), &project).unwrap_err();

        assert!(matches!(err, Error::ProjectOverlapsProfile { .. }));
        assert!(!project.exists());
    }

    #[test]
    fn test_project_beside_media_is_allowed() {
        let profile = profile_with_media();
        let project = profile.path().join("exports");

        let report = copy_to_project(profile.path(), &project).unwrap();

        assert_eq!(report.media_files, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_media_directory_is_skipped() {
        let profile = profile_with_media();
        let media = profile.path().join(MEDIA_DIR);
        std::os::unix::fs::symlink(&media, media.join("loop")).unwrap();
        let out = tempfile::tempdir().unwrap();

        let report = copy_to_project(profile.path(), out.path()).unwrap();

        assert_eq!(report.media_files, 2);
        assert!(!out.path().join(MEDIA_DIR).join("loop").exists());
    }
}
