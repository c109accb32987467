//! Filesystem helpers: volume mount parsing and size accounting.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// Mount point configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    /// Host path
    pub host_path: PathBuf,

    /// Guest path
    pub guest_path: PathBuf,

    /// Read-only
    pub readonly: bool,
}

impl MountPoint {
    /// Parse a `host:guest[:ro|:rw]` volume spec.
    pub fn parse(spec: &str) -> Option<Self> {
        let mut parts = spec.splitn(3, ':');
        let host = parts.next().filter(|s| !s.is_empty())?;
        let guest = parts.next().filter(|s| !s.is_empty())?;
        let readonly = match parts.next() {
            None | Some("rw") => false,
            Some("ro") => true,
            Some(_) => return None,
        };
        Some(Self {
            host_path: PathBuf::from(host),
            guest_path: PathBuf::from(guest),
            readonly,
        })
    }

    /// Docker-style `Mounts` entry.
    pub fn to_inspect_value(&self) -> Value {
        json!({
            "Type": "bind",
            "Source": self.host_path.display().to_string(),
            "Destination": self.guest_path.display().to_string(),
            "RW": !self.readonly,
        })
    }
}

/// Calculate total size of a directory recursively. Missing paths count as 0.
/// Symlinks count as their own size and are never followed.
pub fn dir_size(path: &Path) -> u64 {
    let mut total = 0;
    if let Ok(entries) = std::fs::read_dir(path) {
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                total += dir_size(&entry.path());
            } else if let Ok(meta) = std::fs::symlink_metadata(entry.path()) {
                total += meta.len();
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_mount() {
        let m = MountPoint::parse("/data:/var/lib/data").unwrap();
        assert_eq!(m.host_path, PathBuf::from("/data"));
        assert_eq!(m.guest_path, PathBuf::from("/var/lib/data"));
        assert!(!m.readonly);
    }

    #[test]
    fn test_parse_mount_readonly() {
        assert!(MountPoint::parse("/a:/b:ro").unwrap().readonly);
        assert!(!MountPoint::parse("/a:/b:rw").unwrap().readonly);
    }

    #[test]
    fn test_parse_mount_invalid() {
        assert!(MountPoint::parse("/only-host").is_none());
        assert!(MountPoint::parse(":/guest").is_none());
        assert!(MountPoint::parse("/a:/b:weird").is_none());
    }

    #[test]
    fn test_inspect_value() {
        let v = MountPoint::parse("/a:/b:ro").unwrap().to_inspect_value();
        assert_eq!(v["Source"], "/a");
        assert_eq!(v["Destination"], "/b");
        assert_eq!(v["RW"], false);
    }

    #[test]
    fn test_dir_size() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("a"), vec![0u8; 100]).unwrap();
        std::fs::write(tmp.path().join("sub/b"), vec![0u8; 28]).unwrap();
        assert_eq!(dir_size(tmp.path()), 128);
        assert_eq!(dir_size(&tmp.path().join("missing")), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_dir_size_does_not_follow_symlinks() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("big"), vec![0u8; 5000]).unwrap();

        let rootfs = TempDir::new().unwrap();
        std::fs::write(rootfs.path().join("file"), vec![0u8; 10]).unwrap();
        let link = rootfs.path().join("hostusr");
        std::os::unix::fs::symlink(outside.path(), &link).unwrap();

        let link_len = std::fs::symlink_metadata(&link).unwrap().len();
        assert_eq!(dir_size(rootfs.path()), 10 + link_len);
    }
}
