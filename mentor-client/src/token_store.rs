//! Bearer token persisted in a local file readable only by its owner.

use crate::error::ClientError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_TOKEN_FILE: &str = ".mentor_token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    token_path: PathBuf,
}

impl TokenStore {
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: token_path.into(),
        }
    }

    /// Token file inside the given home directory.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(DEFAULT_TOKEN_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.token_path
    }

    pub fn save(&self, token: &str) -> Result<(), ClientError> {
        fs::write(&self.token_path, token)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        tracing::debug!("Token saved to {:?}", self.token_path);
        Ok(())
    }

    pub fn load(&self) -> Result<Option<String>, ClientError> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes the token file; returns whether one existed.
    pub fn clear(&self) -> Result<bool, ClientError> {
        match fs::remove_file(&self.token_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
