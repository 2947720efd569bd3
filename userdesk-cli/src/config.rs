//! Environment loading
//!
//! `.env` in the working directory wins; `~/.userdesk/.env` fills in
//! whatever is still unset. Variables already in the environment are
//! never overwritten.

use std::path::PathBuf;

/// Directory for per-user settings (`~/.userdesk`)
pub fn userdesk_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".userdesk"))
}

/// Load `.env` files. Returns the files that were read.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = userdesk_home().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => loaded.push(env_file),
                Err(e) => eprintln!("warning: could not read {}: {}", env_file.display(), e),
            }
        }
    }

    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_dir_is_dot_userdesk() {
        if let Some(dir) = userdesk_home() {
            assert!(dir.ends_with(".userdesk"));
        }
    }
}
