//! Latency-emulation configuration.

use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display};
use std::fs;
use std::io;
use std::path::Path;

use log;

/// Per-operation tape latencies in nanoseconds.
///
/// Zero (the default) disables the emulated delay for that operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DelayConfig {
    /// Charged by every `get`.
    pub read_delay: u64,
    /// Charged by every `set`.
    pub write_delay: u64,
    /// Charged per cell travelled by a `seek`.
    pub rewind_step_delay: u64,
    /// Charged once per `seek`.
    pub rewind_delay: u64,
    /// Charged by every `next` and `prev`.
    pub next_delay: u64,
}

/// Delay-configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io(io::Error),
    /// The configuration path names a directory.
    NotAFile,
    /// A directive line is not `key value` with a non-negative integer value.
    Malformed(String),
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self {
            ConfigError::Io(err) => Some(err),
            ConfigError::NotAFile | ConfigError::Malformed(_) => None,
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            ConfigError::Io(err) => write!(f, "error reading config file: {}", err),
            ConfigError::NotAFile => write!(f, "config file cannot be a directory"),
            ConfigError::Malformed(line) => write!(f, "incorrect config line: {}", line),
        }
    }
}

impl DelayConfig {
    /// Loads delays from a `key value` directive file.
    ///
    /// A missing file yields all-zero delays. Unknown keys are warned about
    /// and skipped; a directive whose value is not a non-negative integer is
    /// fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DelayConfig, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(DelayConfig::default());
        }
        if path.is_dir() {
            return Err(ConfigError::NotAFile);
        }

        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let mut config = DelayConfig::default();

        for line in text.lines() {
            let mut parts = line.split_whitespace();
            let (key, value) = match (parts.next(), parts.next()) {
                (None, _) => continue,
                (Some(key), Some(value)) => (key, value),
                (Some(_), None) => return Err(ConfigError::Malformed(line.to_string())),
            };
            let value: u64 = value
                .parse()
                .map_err(|_| ConfigError::Malformed(line.to_string()))?;

            match key {
                "read-delay" => config.read_delay = value,
                "write-delay" => config.write_delay = value,
                "rewind-step-delay" => config.rewind_step_delay = value,
                "rewind-delay" => config.rewind_delay = value,
                "next-delay" => config.next_delay = value,
                _ => log::warn!("unknown config key {}", key),
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use rstest::*;

    use super::{ConfigError, DelayConfig};

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_file_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let config = DelayConfig::load(dir.path().join("config.txt")).unwrap();
        assert_eq!(config, DelayConfig::default());
    }

    #[test]
    fn test_all_directives() {
        let (_dir, path) = write_config(
            "read-delay 1\nwrite-delay 2\nrewind-step-delay 3\nrewind-delay 4\nnext-delay 5\n",
        );
        let config = DelayConfig::load(&path).unwrap();
        assert_eq!(
            config,
            DelayConfig {
                read_delay: 1,
                write_delay: 2,
                rewind_step_delay: 3,
                rewind_delay: 4,
                next_delay: 5,
            }
        );
    }

    #[test]
    fn test_blank_lines_and_unknown_keys_are_skipped() {
        let (_dir, path) = write_config("\nread-delay 7\n\nspin-up-delay 100\n\n");
        let config = DelayConfig::load(&path).unwrap();
        assert_eq!(config.read_delay, 7);
        assert_eq!(config.rewind_delay, 0);
    }

    #[rstest]
    #[case("read-delay")]
    #[case("read-delay fast")]
    #[case("write-delay -5")]
    #[case("next-delay 1.5")]
    fn test_malformed_directive_is_fatal(#[case] line: &str) {
        let (_dir, path) = write_config(line);
        match DelayConfig::load(&path) {
            Err(ConfigError::Malformed(bad)) => assert_eq!(bad, line),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DelayConfig::load(dir.path()),
            Err(ConfigError::NotAFile)
        ));
    }
}
