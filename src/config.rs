//! Session profile management
//!
//! Reusable connection settings persisted as JSON under the user's
//! configuration directory. Passwords are deliberately never stored.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::telnet::DEFAULT_PORT;

/// A connection profile containing the settings needed to open a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionProfile {
    /// Display name for the profile
    pub name: String,
    /// Hostname or IP address of the remote host
    pub host: String,
    /// Port number (typically 23)
    pub port: u16,
    /// Socket timeout in seconds; `None` blocks indefinitely
    pub timeout_secs: Option<u64>,
    /// Optional username to log in with
    pub username: Option<String>,
    /// Whether to emit the debug event stream
    pub debug: bool,
}

impl SessionProfile {
    pub fn new(name: String, host: String) -> Self {
        Self {
            name,
            host,
            port: DEFAULT_PORT,
            timeout_secs: None,
            username: None,
            debug: false,
        }
    }

    /// Get a sanitized filename for this profile
    pub fn filename(&self) -> String {
        let sanitized: String = self
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        format!("{}.json", sanitized.to_lowercase())
    }

    /// Directory where profiles are stored
    pub fn profile_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rtelnet"))
    }

    /// Loads a profile by name from the profile directory
    pub fn load(name: &str) -> std::io::Result<Self> {
        let template = Self::new(name.to_string(), String::new());
        let dir = Self::profile_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        Self::load_from(&dir.join(template.filename()))
    }

    /// Loads a profile from an explicit path
    pub fn load_from(path: &std::path::Path) -> std::io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Saves the profile into the profile directory, creating it if needed
    pub fn save(&self) -> std::io::Result<PathBuf> {
        let dir = Self::profile_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
        })?;
        fs::create_dir_all(&dir)?;
        let path = dir.join(self.filename());
        self.save_to(&path)?;
        Ok(path)
    }

    /// Saves the profile to an explicit path
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, contents)
    }
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self::new("default".to_string(), "localhost".to_string())
    }
}
