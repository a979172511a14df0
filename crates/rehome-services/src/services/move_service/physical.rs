//! Physical relocation of files and directories

use rehome_foundation::{RehomeError, RehomeResult};
use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::pin::Pin;
use tokio::fs;
use tracing::debug;

/// Move `from` to `to`, creating the destination's parent first.
///
/// A directory whose destination already exists with content is merged
/// into it entry by entry.
pub async fn relocate(from: &Path, to: &Path, is_directory: bool) -> RehomeResult<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RehomeError::io_at(parent, e))?;
    }

    match fs::rename(from, to).await {
        Ok(()) => {
            debug!(from = %from.display(), to = %to.display(), "Renamed");
            Ok(())
        }
        Err(e) if is_directory && is_destination_occupied(&e) => {
            debug!(
                from = %from.display(),
                to = %to.display(),
                "Destination directory exists, merging"
            );
            merge_directory(from, to).await
        }
        Err(source) => Err(physical_move_error(from, to, source)),
    }
}

/// Move every entry of `from` into `to`, recursing into directories that
/// exist on both sides, then remove `from`.
///
/// A `from` that is not empty afterwards (something was added meanwhile) is
/// left in place.
pub fn merge_directory<'a>(
    from: &'a Path,
    to: &'a Path,
) -> Pin<Box<dyn Future<Output = RehomeResult<()>> + Send + 'a>> {
    Box::pin(async move {
        fs::create_dir_all(to)
            .await
            .map_err(|e| RehomeError::io_at(to, e))?;

        let mut entries = fs::read_dir(from)
            .await
            .map_err(|e| RehomeError::io_at(from, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RehomeError::io_at(from, e))?
        {
            let entry_from = entry.path();
            let entry_to = to.join(entry.file_name());
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| RehomeError::io_at(&entry_from, e))?;

            if file_type.is_dir() && fs::metadata(&entry_to).await.is_ok_and(|m| m.is_dir()) {
                merge_directory(&entry_from, &entry_to).await?;
            } else {
                fs::rename(&entry_from, &entry_to)
                    .await
                    .map_err(|e| physical_move_error(&entry_from, &entry_to, e))?;
            }
        }

        match fs::remove_dir(from).await {
            Ok(()) => Ok(()),
            Err(e) if is_destination_occupied(&e) => {
                debug!(dir = %from.display(), "Source directory not empty after merge, leaving it");
                Ok(())
            }
            Err(e) => Err(RehomeError::io_at(from, e)),
        }
    })
}

fn is_destination_occupied(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::AlreadyExists | ErrorKind::DirectoryNotEmpty
    )
}

fn physical_move_error(from: &Path, to: &Path, source: std::io::Error) -> RehomeError {
    RehomeError::PhysicalMove {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehome_test_support::TestWorkspace;

    #[tokio::test]
    async fn test_file_rename_creates_parent() {
        let workspace = TestWorkspace::new();
        workspace.create_file("src/a.ts", "export {}\n");

        relocate(
            &workspace.absolute_path("src/a.ts"),
            &workspace.absolute_path("lib/deep/a.ts"),
            false,
        )
        .await
        .unwrap();

        assert!(!workspace.file_exists("src/a.ts"));
        assert_eq!(workspace.read_file("lib/deep/a.ts"), "export {}\n");
    }

    #[tokio::test]
    async fn test_directory_onto_existing_directory_merges() {
        let workspace = TestWorkspace::new();
        workspace.create_file("src/a/x.ts", "x");
        workspace.create_file("src/a/nested/n.ts", "n");
        workspace.create_file("src/b/y.ts", "y");
        workspace.create_file("src/b/nested/m.ts", "m");

        relocate(
            &workspace.absolute_path("src/a"),
            &workspace.absolute_path("src/b"),
            true,
        )
        .await
        .unwrap();

        assert!(!workspace.file_exists("src/a"));
        assert_eq!(workspace.read_file("src/b/x.ts"), "x");
        assert_eq!(workspace.read_file("src/b/y.ts"), "y");
        assert_eq!(workspace.read_file("src/b/nested/n.ts"), "n");
        assert_eq!(workspace.read_file("src/b/nested/m.ts"), "m");
    }

    #[test]
    fn test_occupied_destination_kinds() {
        use std::io::Error;

        assert!(is_destination_occupied(&Error::from(ErrorKind::DirectoryNotEmpty)));
        assert!(is_destination_occupied(&Error::from(ErrorKind::AlreadyExists)));
        assert!(!is_destination_occupied(&Error::from(ErrorKind::NotFound)));
        assert!(!is_destination_occupied(&Error::from(ErrorKind::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_missing_source_is_physical_move_error() {
        let workspace = TestWorkspace::new();

        let err = relocate(
            &workspace.absolute_path("src/missing.ts"),
            &workspace.absolute_path("lib/missing.ts"),
            false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RehomeError::PhysicalMove { .. }));
    }
}
