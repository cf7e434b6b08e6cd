//! Conversion between filesystem paths and archive keys
//!
//! Archive keys are home-relative paths joined with `/` regardless of the
//! host separator, so an archive written on one machine restores on another.

use std::path::{Component, Path, PathBuf};

use crate::error::{PeridotError, PeridotResult};

/// Build the archive key for `path`, which must live under `home`
pub fn to_archive_key(home: &Path, path: &Path) -> PeridotResult<String> {
    let relative = path.strip_prefix(home).map_err(|_| {
        PeridotError::Path(format!(
            "{} is outside the home directory {}",
            path.display(),
            home.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(|| {
                    PeridotError::Path(format!("{} is not valid UTF-8", path.display()))
                })?;
                segments.push(segment);
            }
            Component::CurDir => {}
            _ => {
                return Err(PeridotError::Path(format!(
                    "{} cannot be stored relative to home",
                    path.display()
                )))
            }
        }
    }

    if segments.is_empty() {
        return Err(PeridotError::Path(format!(
            "{} is the home directory itself",
            path.display()
        )));
    }

    Ok(segments.join("/"))
}

/// Resolve an archive key back to a path under `home`
///
/// Keys that are absolute or climb out of home with `..` are rejected.
pub fn from_archive_key(home: &Path, key: &str) -> PeridotResult<PathBuf> {
    let mut path = home.to_path_buf();
    let mut depth = 0;

    for segment in key.split('/') {
        match segment {
            "" if depth == 0 => {
                return Err(PeridotError::Path(format!("{:?} is an absolute path", key)))
            }
            "" | "." => {}
            ".." => {
                return Err(PeridotError::Path(format!(
                    "{:?} escapes the home directory",
                    key
                )))
            }
            segment => {
                // Reject anything the host would not read as a single plain component
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => {}
                    _ => {
                        return Err(PeridotError::Path(format!(
                            "{:?} contains an invalid segment {:?}",
                            key, segment
                        )))
                    }
                }
                path.push(segment);
                depth += 1;
            }
        }
    }

    if depth == 0 {
        return Err(PeridotError::Path(format!("{:?} names no file", key)));
    }

    Ok(path)
}

/// First `/`-delimited segment of an archive key
pub fn top_level_segment(key: &str) -> &str {
    key.split('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_archive_key() {
        let home = Path::new("/home/me");
        assert_eq!(
            to_archive_key(home, &home.join(".ssh").join("config")).unwrap(),
            ".ssh/config"
        );
        assert_eq!(to_archive_key(home, &home.join(".bashrc")).unwrap(), ".bashrc");
    }

    #[test]
    fn test_to_archive_key_outside_home() {
        let err = to_archive_key(Path::new("/home/me"), Path::new("/etc/passwd")).unwrap_err();
        assert!(matches!(err, PeridotError::Path(_)));
        assert!(to_archive_key(Path::new("/home/me"), Path::new("/home/me")).is_err());
    }

    #[test]
    fn test_from_archive_key() {
        let home = Path::new("/home/me");
        assert_eq!(
            from_archive_key(home, ".config/nvim/init.lua").unwrap(),
            home.join(".config").join("nvim").join("init.lua")
        );
    }

    #[test]
    fn test_from_archive_key_rejects_escapes() {
        let home = Path::new("/home/me");
        assert!(from_archive_key(home, "../etc/passwd").is_err());
        assert!(from_archive_key(home, ".config/../../x").is_err());
        assert!(from_archive_key(home, "/etc/passwd").is_err());
        assert!(from_archive_key(home, "").is_err());
    }

    #[test]
    fn test_top_level_segment() {
        assert_eq!(top_level_segment(".ssh/id_rsa"), ".ssh");
        assert_eq!(top_level_segment(".bashrc"), ".bashrc");
    }
}
