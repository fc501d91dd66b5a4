//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$ATTACHGUARD_CONFIG` (environment variable)
//! 2. `~/.config/attachguard/config.toml` (Linux/macOS)
//!    `%APPDATA%\attachguard\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Attachment view/save policy.
    pub policy: PolicyConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Static policy lists and limits consulted by [`crate::policy::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// MIME patterns that may be viewed (`*` wildcards allowed).
    pub acceptable_view_types: Vec<String>,
    /// MIME patterns that may never be viewed, checked after the allow-list.
    pub unacceptable_view_types: Vec<String>,
    /// Lowercase extensions that may be neither viewed nor saved.
    pub unacceptable_extensions: Vec<String>,
    /// Lowercase extensions of installable packages. Never viewable; saving
    /// requires the device to allow sideloading.
    pub installable_extensions: Vec<String>,
    /// Attachments larger than this (bytes) need an unmetered network.
    pub max_download_size: u64,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

/// Extensions of executables and scripts that are blocked outright.
const UNACCEPTABLE_EXTENSIONS: &[&str] = &[
    "ade", "adp", "bat", "chm", "cmd", "com", "cpl", "dll", "exe", "hta", "ins", "isp", "jse",
    "lib", "mde", "msc", "msp", "mst", "pif", "scr", "sct", "shb", "sys", "vb", "vbe", "vbs",
    "vxd", "wsc", "wsf", "wsh",
];

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            acceptable_view_types: vec!["*/*".to_string()],
            unacceptable_view_types: Vec::new(),
            unacceptable_extensions: UNACCEPTABLE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            installable_extensions: vec!["apk".to_string()],
            max_download_size: 5 * 1024 * 1024, // 5 MB
        }
    }
}

impl PolicyConfig {
    /// Lowercase and trim every extension entry, dropping a leading `.`.
    ///
    /// Extension lookups compare against lowercase, dot-less strings.
    pub fn normalize(&mut self) {
        for list in [
            &mut self.unacceptable_extensions,
            &mut self.installable_extensions,
        ] {
            for ext in list.iter_mut() {
                *ext = ext.trim().trim_start_matches('.').to_lowercase();
            }
            list.retain(|ext| !ext.is_empty());
        }
    }

    /// `true` if `extension` (already lowercase) is blocked for view and save.
    pub fn is_unacceptable_extension(&self, extension: &str) -> bool {
        self.unacceptable_extensions.iter().any(|e| e == extension)
    }

    /// `true` if `extension` (already lowercase) is an installable package.
    pub fn is_installable_extension(&self, extension: &str) -> bool {
        self.installable_extensions.iter().any(|e| e == extension)
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// A missing file yields the defaults. An unreadable or invalid file is
/// returned as an error so the caller can report it once logging is up.
pub fn load_config() -> Result<Config> {
    load_config_at(config_file_path().as_deref())
}

/// Load configuration from `path`, or the defaults when there is no file there.
pub fn load_config_at(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if path.exists() => load_config_from(path),
        _ => Ok(Config::default()),
    }
}

/// Load and normalize configuration from an explicit file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path).map_err(|e| PolicyError::io(path, e))?;
    let mut cfg: Config =
        toml::from_str(&contents).map_err(|e| PolicyError::invalid_config(path, e))?;
    cfg.policy.normalize();
    Ok(cfg)
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    save_config_to(config, &path)?;
    Ok(path)
}

/// Save configuration to an explicit file, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("ATTACHGUARD_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("attachguard").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("attachguard")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("attachguard.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert_eq!(cfg.policy.acceptable_view_types, vec!["*/*"]);
        assert!(cfg.policy.unacceptable_view_types.is_empty());
        assert!(cfg.policy.is_unacceptable_extension("exe"));
        assert!(cfg.policy.is_installable_extension("apk"));
        assert_eq!(cfg.policy.max_download_size, 5 * 1024 * 1024);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.general.log_level, cfg.general.log_level);
        assert_eq!(parsed.policy, cfg.policy);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[policy]
max_download_size = 1024
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.policy.max_download_size, 1024);
        // Other fields use defaults
        assert_eq!(cfg.policy.installable_extensions, vec!["apk"]);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_normalize_extensions() {
        let mut policy = PolicyConfig {
            unacceptable_extensions: vec!["EXE".into(), " .Bat ".into(), "".into()],
            installable_extensions: vec![".APK".into()],
            ..PolicyConfig::default()
        };
        policy.normalize();
        assert_eq!(policy.unacceptable_extensions, vec!["exe", "bat"]);
        assert_eq!(policy.installable_extensions, vec!["apk"]);
    }

    #[test]
    fn test_load_config_from_file_normalizes() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let file = tmp.child("config.toml");
        file.write_str(
            r#"
[general]
log_level = "debug"

[policy]
unacceptable_extensions = ["JAR"]
"#,
        )
        .unwrap();

        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.general.log_level, "debug");
        assert!(cfg.policy.is_unacceptable_extension("jar"));
        assert!(!cfg.policy.is_unacceptable_extension("exe"));
    }

    #[test]
    fn test_load_config_from_invalid_file() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let file = tmp.child("config.toml");
        file.write_str("[policy]\nmax_download_size = \"big\"\n").unwrap();

        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_config_at_without_file_uses_defaults() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let cfg = load_config_at(Some(&tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.policy, PolicyConfig::default());
        let cfg = load_config_at(None).unwrap();
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_load_config_at_reports_invalid_file() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let file = tmp.child("config.toml");
        file.write_str("[general\n").unwrap();

        let err = load_config_at(Some(file.path())).unwrap_err();
        assert!(matches!(err, PolicyError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PolicyError::FileNotFound(_)));
    }

    #[test]
    fn test_save_config_to_creates_parents() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let file = tmp.child("nested").child("config.toml");

        save_config_to(&Config::default(), file.path()).unwrap();

        file.assert(predicate::path::exists());
        file.assert(predicate::str::contains("max_download_size = 5242880"));
        file.assert(predicate::str::contains("[policy]"));

        let reloaded = load_config_from(file.path()).unwrap();
        assert_eq!(reloaded.policy, PolicyConfig::default());
    }

    #[test]
    fn test_log_file_path_uses_cache_override() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/ag-cache"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/ag-cache/attachguard.log")
        );
    }
}
