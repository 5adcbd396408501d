//! API token lookup.
//!
//! Precedence:
//! 1. `TRANSIFEX_API_TOKEN` environment variable (non-empty)
//! 2. `password` under `[https://www.transifex.com]` in `<home>/.transifexrc`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::home;
use crate::error::{io_err, ConfigError};

pub const TOKEN_ENV_VAR: &str = "TRANSIFEX_API_TOKEN";

const RC_FILE: &str = ".transifexrc";
const RC_SECTION: &str = "https://www.transifex.com";
const RC_KEY: &str = "password";

/// `<home>/.transifexrc`: pure, no I/O.
pub fn rc_path_at(home: &Path) -> PathBuf {
    home.join(RC_FILE)
}

/// Resolve the API token from `env_token` or the rc file under `home`.
pub fn resolve_token_at(home: &Path, env_token: Option<String>) -> Result<String, ConfigError> {
    if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }

    let path = rc_path_at(home);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::AuthenticationMissing)
        }
        Err(err) => return Err(io_err(path, err)),
    };

    rc_password(&contents).ok_or(ConfigError::AuthenticationMissing)
}

/// `resolve_token_at` convenience wrapper reading the real environment and home.
pub fn resolve_token() -> Result<String, ConfigError> {
    let env_token = std::env::var(TOKEN_ENV_VAR).ok();
    if env_token.as_deref().is_some_and(|t| !t.trim().is_empty()) {
        return resolve_token_at(Path::new(""), env_token);
    }
    resolve_token_at(&home()?, env_token)
}

/// Extract the password from INI-style rc contents.
fn rc_password(contents: &str) -> Option<String> {
    let mut in_section = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_section = name.trim() == RC_SECTION;
            continue;
        }
        if !in_section {
            continue;
        }
        let Some((key, value)) = line.split_once(['=', ':']) else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case(RC_KEY) {
            let value = value.trim();
            return (!value.is_empty()).then(|| value.to_string());
        }
    }
    None
}
