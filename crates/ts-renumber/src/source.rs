use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{RenumberError, RenumberResult};

/// Where the document is read from. `-` on the command line means stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    pub fn from_arg(path: &Path) -> Self {
        if path == Path::new("-") {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Reads the whole document before anything is processed.
    pub fn read(&self) -> RenumberResult<String> {
        match self {
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(|source| RenumberError::Read {
                    path: path.clone(),
                    source,
                })
            }
            Self::Stdin => read_from_reader(io::stdin().lock()),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "<stdin>".to_string(),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

pub fn read_from_reader<R: Read>(mut reader: R) -> RenumberResult<String> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(RenumberError::Stdin)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dash_means_stdin() {
        assert_eq!(InputSource::from_arg(Path::new("-")), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Path::new("README.md")),
            InputSource::File(PathBuf::from("README.md"))
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let source = InputSource::File(dir.path().join("README.md"));
        let err = source.read().unwrap_err();
        assert!(matches!(err, RenumberError::Read { .. }));
    }

    #[test]
    fn rejects_invalid_utf8_from_reader() {
        let err = read_from_reader(&[0xff_u8, 0xfe][..]).unwrap_err();
        assert!(matches!(err, RenumberError::Stdin(_)));
    }
}
