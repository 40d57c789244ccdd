//! Bot token loading.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token file {path} is empty")]
    Empty { path: PathBuf },
}

/// Read the bot token from the first line of `path`.
pub fn load_token(path: &Path) -> Result<SecretString, TokenError> {
    let read_err = |source| TokenError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(read_err)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).map_err(read_err)?;

    let token = line.trim_end_matches(['\r', '\n']);
    if token.trim().is_empty() {
        return Err(TokenError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(SecretString::new(token.to_string()))
}
