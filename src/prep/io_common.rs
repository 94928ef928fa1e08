use std::path::{Path, PathBuf};

use crate::prep::*;

/// A path from a configuration file is relative to the directory of that file.
pub fn resolve_path(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(r) => {
            let p: PathBuf = r.join(path);
            p.as_path().display().to_string()
        }
        None => path.to_string(),
    }
}

/// A field delimiter must be a single byte, e.g. ";" or "\t".
pub fn parse_delimiter(s: &str) -> PrepResult<u8> {
    match s.as_bytes() {
        [b] => Ok(*b),
        _ => whatever!("The delimiter must be a single ASCII character, got {:?}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters() {
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ø").is_err());
    }

    #[test]
    fn relative_paths() {
        assert_eq!(resolve_path(None, "a.csv"), "a.csv");
        let root = Path::new("/data/fv2022");
        assert_eq!(resolve_path(Some(root), "a.csv"), "/data/fv2022/a.csv");
        assert_eq!(resolve_path(Some(root), "/tmp/a.csv"), "/tmp/a.csv");
    }
}
