use std::{
    fs, io,
    path::{Path, PathBuf},
};

use hopscroll_core::{Tuning, TuningError};
use thiserror::Error;

/// Errors raised while loading a tuning file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read tuning file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or names unknown keys.
    #[error("failed to parse tuning file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// The file parsed but holds values the engine cannot run with.
    #[error("invalid tuning in {}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: TuningError,
    },
}

/// Loads tuning from the provided TOML file, or the defaults when no file is
/// given. Keys missing from the file keep their default values.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<Tuning, ConfigError> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tuning(&text, path)
}

fn parse_tuning(text: &str, path: &Path) -> Result<Tuning, ConfigError> {
    let tuning: Tuning = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tuning.validate().map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let tuning = load_tuning(None).expect("defaults load");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn partial_file_overrides_selected_knobs() {
        let tuning = parse_tuning(
            "[generation]\npresence_threshold = 200\n\n[scroll]\ntrigger_y = 96\n",
            Path::new("tuning.toml"),
        )
        .expect("valid tuning");
        assert_eq!(tuning.generation.presence_threshold, 200);
        assert_eq!(tuning.scroll.trigger_y, 96);
        assert_eq!(tuning.physics, Tuning::default().physics);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let error = parse_tuning("[physics\n", Path::new("broken.toml"))
            .expect_err("malformed file must be rejected");
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert_eq!(error.to_string(), "failed to parse tuning file broken.toml");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let error = parse_tuning("[generation]\nitem_odds = 0\n", Path::new("odds.toml"))
            .expect_err("zero odds must be rejected");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                source: TuningError::ZeroItemOdds,
                ..
            }
        ));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let path = std::env::temp_dir().join("hopscroll-missing-tuning-file.toml");
        let error = load_tuning(Some(&path)).expect_err("missing file must be rejected");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn file_on_disk_is_loaded() {
        let path = std::env::temp_dir().join(format!(
            "hopscroll-tuning-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[physics]\njump_velocity = 11\n").expect("write tuning file");
        let tuning = load_tuning(Some(&path));
        let _ = fs::remove_file(&path);
        assert_eq!(tuning.expect("valid file").physics.jump_velocity, 11);
    }
}
