//! Portal credentials kept in a local JSON file.
//!
//! ```json
//! { "credentials": { "username": "", "password": "" } }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    credentials: StoredCredentials,
}

#[derive(Default, Serialize, Deserialize)]
struct StoredCredentials {
    username: String,
    password: String,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What [`bootstrap`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    /// A placeholder file was written and still has to be filled in.
    Created(PathBuf),
    Existing(PathBuf),
}

/// Creates the credentials file with empty fields unless it already exists.
pub fn bootstrap(path: &Path) -> Result<Bootstrap> {
    if path.exists() {
        return Ok(Bootstrap::Existing(path.to_path_buf()));
    }

    let io_error = |source: std::io::Error| Error::CredentialsIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let placeholder = serde_json::to_string_pretty(&CredentialsFile::default())
        .map_err(|source| Error::CredentialsMalformed {
            path: path.to_path_buf(),
            source,
        })?;

    // create_new so a file appearing in the meantime is never clobbered
    match fs::OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(placeholder.as_bytes()).map_err(io_error)?;
            file.write_all(b"\n").map_err(io_error)?;
            tracing::info!(path = %path.display(), "Created credentials file");
            Ok(Bootstrap::Created(path.to_path_buf()))
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Ok(Bootstrap::Existing(path.to_path_buf()))
        }
        Err(e) => Err(io_error(e)),
    }
}

/// Login name and password ready to be typed into the login form.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reads the credentials file. A non-empty `domain` is prefixed to the
/// username as `DOMAIN\username`.
pub fn load(path: &Path, domain: &str) -> Result<Credentials> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::CredentialsMissing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(Error::CredentialsIo {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let file: CredentialsFile =
        serde_json::from_str(&raw).map_err(|source| Error::CredentialsMalformed {
            path: path.to_path_buf(),
            source,
        })?;
    let StoredCredentials { username, password } = file.credentials;

    let username = username.trim();
    if username.is_empty() {
        return Err(Error::CredentialsIncomplete {
            path: path.to_path_buf(),
            field: "username",
        });
    }
    if password.is_empty() {
        return Err(Error::CredentialsIncomplete {
            path: path.to_path_buf(),
            field: "password",
        });
    }

    let username = if domain.is_empty() {
        username.to_string()
    } else {
        format!("{domain}\\{username}")
    };

    Ok(Credentials { username, password })
}
