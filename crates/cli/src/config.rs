//! `protospec.toml` configuration for the `protospec` binary.
//!
//! # Example
//!
//! ```toml
//! [compiler]
//! review_threshold = 0.8
//!
//! [replay]
//! step_delay_ms = 0
//!
//! [server]
//! port = 8080
//! ```
//!
//! Every key is optional. `PROTOSPEC_PORT` and `PROTOSPEC_REVIEW_THRESHOLD`
//! override the file.

use std::path::Path;
use std::time::Duration;

use protospec_core::CompilerOptions;
use serde::Deserialize;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "protospec.toml";

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub compiler: CompilerSection,
    pub replay: ReplaySection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CompilerSection {
    pub review_threshold: f64,
}

impl Default for CompilerSection {
    fn default() -> Self {
        CompilerSection {
            review_threshold: CompilerOptions::default().review_threshold,
        }
    }
}

/// Replay timing used by `gate`. Zero replays as fast as possible.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ReplaySection {
    pub step_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServerSection {
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection { port: 8080 }
    }
}

impl Config {
    pub(crate) fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            review_threshold: self.compiler.review_threshold,
            ..CompilerOptions::default()
        }
    }

    pub(crate) fn step_delay(&self) -> Duration {
        Duration::from_millis(self.replay.step_delay_ms)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, `protospec.toml` in the
/// working directory is used when present.
pub(crate) fn load(path: Option<&Path>) -> Result<Config, String> {
    let mut config = match path {
        Some(path) => read(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => read(Path::new(DEFAULT_CONFIG_FILE))?,
        None => Config::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn read(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let config =
        parse(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))?;
    check_threshold(config.compiler.review_threshold)
        .map_err(|e| format!("invalid '{}': compiler.review_threshold {}", path.display(), e))?;
    Ok(config)
}

fn check_threshold(value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("must be between 0 and 1, got {}", value))
    }
}

fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

fn apply_env(config: &mut Config, var: impl Fn(&str) -> Option<String>) -> Result<(), String> {
    if let Some(port) = var("PROTOSPEC_PORT") {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| format!("PROTOSPEC_PORT is not a valid port: '{}'", port))?;
    }
    if let Some(threshold) = var("PROTOSPEC_REVIEW_THRESHOLD") {
        let value: f64 = threshold.trim().parse().map_err(|_| {
            format!("PROTOSPEC_REVIEW_THRESHOLD is not a number: '{}'", threshold)
        })?;
        check_threshold(value).map_err(|e| format!("PROTOSPEC_REVIEW_THRESHOLD {}", e))?;
        config.compiler.review_threshold = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.compiler.review_threshold, 0.7);
    }

    #[test]
    fn sections_are_read() {
        let config = parse(
            "[compiler]\nreview_threshold = 0.9\n[replay]\nstep_delay_ms = 20\n[server]\nport = 9000\n",
        )
        .unwrap();
        assert_eq!(config.compiler_options().review_threshold, 0.9);
        assert_eq!(config.step_delay(), Duration::from_millis(20));
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[server]\nhost = \"x\"\n").is_err());
    }

    #[test]
    fn out_of_range_threshold_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("protospec.toml");
        std::fs::write(&path, "[compiler]\nreview_threshold = 1.5\n").unwrap();
        let err = read(&path).unwrap_err();
        assert!(err.contains("review_threshold"), "{}", err);
        assert!(err.contains("1.5"), "{}", err);

        std::fs::write(&path, "[compiler]\nreview_threshold = 1.0\n").unwrap();
        assert_eq!(read(&path).unwrap().compiler.review_threshold, 1.0);
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = parse("[server]\nport = 9000\n").unwrap();
        apply_env(&mut config, |key| match key {
            "PROTOSPEC_PORT" => Some("7000".into()),
            "PROTOSPEC_REVIEW_THRESHOLD" => Some("0.5".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.compiler.review_threshold, 0.5);
    }

    #[test]
    fn bad_environment_values_are_errors() {
        let mut config = Config::default();
        let err = apply_env(&mut config, |key| {
            (key == "PROTOSPEC_REVIEW_THRESHOLD").then(|| "high".to_string())
        })
        .unwrap_err();
        assert!(err.contains("PROTOSPEC_REVIEW_THRESHOLD"));
        assert!(apply_env(&mut config, |key| (key == "PROTOSPEC_PORT").then(|| "99999".into())).is_err());
    }
}
