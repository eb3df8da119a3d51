//! Layered configuration: built-in defaults, optional TOML file, explicit
//! builder overrides.
//!
//! The tunables here are deliberately few: the ESC-key disambiguation
//! timeout, the default alternate-screen policy, and the message channel
//! capacity. Everything else about a program's behavior lives in its
//! `Model`.

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Default time budget for distinguishing a bare ESC key from the start of
/// an escape sequence.
pub const DEFAULT_ESC_TIMEOUT: Duration = Duration::from_millis(50);

/// Default bound on the internal message channel. `KeyMsg` sends never
/// drop regardless of this bound; it only back-pressures lower-priority
/// producers (resize, command results).
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
struct FileChannel {
    /// `0` means unbounded; absent leaves the built-in default untouched.
    #[serde(default)]
    capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    esc_timeout_ms: Option<u64>,
    alt_screen: Option<bool>,
    channel: FileChannel,
}

/// Runtime tunables for a `Program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub esc_timeout: Duration,
    pub alt_screen: bool,
    pub channel_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            esc_timeout: DEFAULT_ESC_TIMEOUT,
            alt_screen: false,
            channel_capacity: Some(DEFAULT_CHANNEL_CAPACITY),
        }
    }
}

impl Config {
    pub fn esc_timeout(mut self, timeout: Duration) -> Self {
        self.esc_timeout = timeout;
        self
    }

    pub fn alt_screen(mut self, enabled: bool) -> Self {
        self.alt_screen = enabled;
        self
    }

    pub fn channel_capacity(mut self, capacity: Option<usize>) -> Self {
        self.channel_capacity = capacity;
        self
    }

    fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(ms) = file.esc_timeout_ms {
            self.esc_timeout = Duration::from_millis(ms);
        }
        if let Some(alt) = file.alt_screen {
            self.alt_screen = alt;
        }
        if let Some(cap) = file.channel.capacity {
            self.channel_capacity = if cap == 0 { None } else { Some(cap) };
        }
        self
    }
}

/// Best-effort config path following platform conventions: a local
/// `tea.toml` takes precedence over the platform config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("tea.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("tea").join("tea.toml");
    }
    PathBuf::from("tea.toml")
}

/// Loads `Config::default()` layered with an optional TOML file. A missing
/// file or a parse error falls back to defaults rather than failing the
/// program.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = std::fs::read_to_string(&path) else {
        debug!(target: "tea::config", path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config::default().merge_file(file)),
        Err(err) => {
            debug!(target: "tea::config", path = %path.display(), %err, "failed to parse config, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_esc_timeout_and_alt_screen() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "esc_timeout_ms = 80\nalt_screen = false\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.esc_timeout, Duration::from_millis(80));
        assert!(!cfg.alt_screen);
        assert_eq!(cfg.channel_capacity, Some(DEFAULT_CHANNEL_CAPACITY));
    }

    #[test]
    fn zero_channel_capacity_means_unbounded() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[channel]\ncapacity = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.channel_capacity, None);
    }

    #[test]
    fn missing_channel_section_keeps_default_capacity() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "esc_timeout_ms = 10\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.channel_capacity, Some(DEFAULT_CHANNEL_CAPACITY));
    }

    #[test]
    fn builder_overrides_apply_after_file_load() {
        let cfg = Config::default()
            .esc_timeout(Duration::from_millis(10))
            .alt_screen(false)
            .channel_capacity(None);
        assert_eq!(cfg.esc_timeout, Duration::from_millis(10));
        assert!(!cfg.alt_screen);
        assert_eq!(cfg.channel_capacity, None);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "not valid toml {{{").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
