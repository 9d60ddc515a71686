//! Filepath helper
//!
//! Small synchronous filesystem utilities that applications typically wrap
//! into tasks. Nothing here depends on the thread pool.
//!
//! Every function rejects an empty path with [`FsError::EmptyPath`] instead
//! of letting the OS interpret it.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Result type for filepath operations
pub type Result<T> = std::result::Result<T, FsError>;

/// Errors returned by the filepath helper
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FsError {
    /// An empty path was passed
    #[error("Path must not be empty")]
    EmptyPath,

    /// `write_file` was asked to write nothing
    #[error("Refusing to write empty content to '{}'", .path.display())]
    EmptyContent {
        /// Target file
        path: PathBuf,
    },

    /// The path does not exist
    #[error("'{}' does not exist", .path.display())]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// A file operation was given a directory
    #[error("'{}' is a directory", .path.display())]
    IsDirectory {
        /// Offending path
        path: PathBuf,
    },

    /// A directory operation was given something else
    #[error("'{}' is not a directory", .path.display())]
    NotDirectory {
        /// Offending path
        path: PathBuf,
    },

    /// The underlying I/O call failed
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        /// Path the operation was applied to
        path: PathBuf,
        /// Source IO error
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn io(path: &Path, source: io::Error) -> Self {
        FsError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn non_empty(path: &Path) -> Result<&Path> {
    if path.as_os_str().is_empty() {
        Err(FsError::EmptyPath)
    } else {
        Ok(path)
    }
}

/// Check whether `path` exists, following symlinks
pub fn exists(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    !path.as_os_str().is_empty() && path.exists()
}

/// Check whether `path` exists and is a directory
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    !path.as_os_str().is_empty() && path.is_dir()
}

/// Create `path` and every missing parent directory
///
/// Components that already exist as directories are left alone.
pub fn mkdir_recursive(path: impl AsRef<Path>) -> Result<()> {
    let path = non_empty(path.as_ref())?;
    fs::create_dir_all(path).map_err(|e| FsError::io(path, e))
}

/// Remove a single file
///
/// A missing path counts as success. Directories are refused.
pub fn rm_file(path: impl AsRef<Path>) -> Result<()> {
    let path = non_empty(path.as_ref())?;
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        return Err(FsError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    fs::remove_file(path).map_err(|e| FsError::io(path, e))
}

/// Remove a directory and everything below it
///
/// A missing path counts as success. Anything that is not a directory is
/// refused.
pub fn rm_dir_recursive(path: impl AsRef<Path>) -> Result<()> {
    let path = non_empty(path.as_ref())?;
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(FsError::NotDirectory {
            path: path.to_path_buf(),
        });
    }
    debug!("removing directory tree {}", path.display());
    fs::remove_dir_all(path).map_err(|e| FsError::io(path, e))
}

/// Rename or move `src` to `dst`
pub fn rename(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let src = non_empty(src.as_ref())?;
    let dst = non_empty(dst.as_ref())?;
    fs::rename(src, dst).map_err(|e| FsError::io(src, e))
}

/// Size of a regular file in bytes
pub fn file_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = non_empty(path.as_ref())?;
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FsError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FsError::io(path, e),
    })?;
    if metadata.is_dir() {
        return Err(FsError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata.len())
}

/// Create or truncate `path` and write `content` to it
pub fn write_file(path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<()> {
    let path = non_empty(path.as_ref())?;
    let content = content.as_ref();
    if content.is_empty() {
        return Err(FsError::EmptyContent {
            path: path.to_path_buf(),
        });
    }
    fs::write(path, content).map_err(|e| FsError::io(path, e))
}

/// Read a whole file into memory
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = non_empty(path.as_ref())?;
    if path.is_dir() {
        return Err(FsError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FsError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FsError::io(path, e),
    })
}

/// Read a whole UTF-8 file into a string
pub fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    String::from_utf8(bytes)
        .map_err(|e| FsError::io(path, io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Join a directory and a file name with exactly one `/` between them
///
/// If either side is empty the other is returned unchanged. Only one
/// trailing slash of `path` and one leading slash of `name` are absorbed.
pub fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        return name.to_string();
    }
    if name.is_empty() {
        return path.to_string();
    }
    let head = path.strip_suffix('/').unwrap_or(path);
    let tail = name.strip_prefix('/').unwrap_or(name);
    format!("{}/{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(!exists(""));
        assert!(!is_dir(""));
        assert!(matches!(mkdir_recursive(""), Err(FsError::EmptyPath)));
        assert!(matches!(rm_file(""), Err(FsError::EmptyPath)));
        assert!(matches!(rm_dir_recursive(""), Err(FsError::EmptyPath)));
        assert!(matches!(rename("", "x"), Err(FsError::EmptyPath)));
        assert!(matches!(file_size(""), Err(FsError::EmptyPath)));
        assert!(matches!(read_file(""), Err(FsError::EmptyPath)));
    }

    #[test]
    fn test_mkdir_recursive_and_is_dir() {
        let dir = temp_dir();
        let nested = dir.path().join("a/b/c");

        mkdir_recursive(&nested).expect("mkdir");
        assert!(is_dir(&nested));
        assert!(is_dir(dir.path().join("a/b")));

        // Existing directories are fine
        mkdir_recursive(&nested).expect("mkdir again");
    }

    #[test]
    fn test_write_read_and_size() {
        let dir = temp_dir();
        let file = dir.path().join("data.bin");

        write_file(&file, b"hello pool").expect("write");
        assert!(exists(&file));
        assert!(!is_dir(&file));
        assert_eq!(file_size(&file).expect("size"), 10);
        assert_eq!(read_file(&file).expect("read"), b"hello pool");
        assert_eq!(read_to_string(&file).expect("read string"), "hello pool");

        // Truncates on rewrite
        write_file(&file, "hi").expect("rewrite");
        assert_eq!(read_to_string(&file).expect("read string"), "hi");
    }

    #[test]
    fn test_write_empty_content_rejected() {
        let dir = temp_dir();
        let file = dir.path().join("empty.txt");

        assert!(matches!(
            write_file(&file, b""),
            Err(FsError::EmptyContent { .. })
        ));
        assert!(!exists(&file));
    }

    #[test]
    fn test_size_and_read_errors() {
        let dir = temp_dir();
        let missing = dir.path().join("missing");

        assert!(matches!(file_size(&missing), Err(FsError::NotFound { .. })));
        assert!(matches!(read_file(&missing), Err(FsError::NotFound { .. })));
        assert!(matches!(
            file_size(dir.path()),
            Err(FsError::IsDirectory { .. })
        ));
        assert!(matches!(
            read_file(dir.path()),
            Err(FsError::IsDirectory { .. })
        ));
    }

    #[test]
    fn test_read_to_string_rejects_invalid_utf8() {
        let dir = temp_dir();
        let file = dir.path().join("latin1.txt");
        write_file(&file, [0xffu8, 0xfe, 0x41]).expect("write");

        assert!(matches!(read_to_string(&file), Err(FsError::Io { .. })));
    }

    #[test]
    fn test_rm_file() {
        let dir = temp_dir();
        let file = dir.path().join("gone.txt");
        write_file(&file, "x").expect("write");

        rm_file(&file).expect("remove");
        assert!(!exists(&file));

        // Missing file is not an error
        rm_file(&file).expect("remove missing");

        assert!(matches!(
            rm_file(dir.path()),
            Err(FsError::IsDirectory { .. })
        ));
    }

    #[test]
    fn test_rm_dir_recursive() {
        let dir = temp_dir();
        let root = dir.path().join("tree");
        mkdir_recursive(root.join("x/y")).expect("mkdir");
        write_file(root.join("x/y/leaf.txt"), "leaf").expect("write");
        write_file(root.join("top.txt"), "top").expect("write");

        rm_dir_recursive(&root).expect("remove tree");
        assert!(!exists(&root));

        rm_dir_recursive(&root).expect("remove missing tree");

        let file = dir.path().join("plain.txt");
        write_file(&file, "plain").expect("write");
        assert!(matches!(
            rm_dir_recursive(&file),
            Err(FsError::NotDirectory { .. })
        ));
    }

    #[test]
    fn test_rename() {
        let dir = temp_dir();
        let src = dir.path().join("old.txt");
        let dst = dir.path().join("new.txt");
        write_file(&src, "moved").expect("write");

        rename(&src, &dst).expect("rename");
        assert!(!exists(&src));
        assert_eq!(read_to_string(&dst).expect("read"), "moved");

        assert!(matches!(rename(&src, &dst), Err(FsError::Io { .. })));
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "file"), "file");
        assert_eq!(join("dir", ""), "dir");
        assert_eq!(join("dir", "file"), "dir/file");
        assert_eq!(join("dir/", "file"), "dir/file");
        assert_eq!(join("dir", "/file"), "dir/file");
        assert_eq!(join("dir/", "/file"), "dir/file");
        assert_eq!(join("/", "file"), "/file");
        assert_eq!(join("/var/log", "pool/worker.log"), "/var/log/pool/worker.log");
    }
}
