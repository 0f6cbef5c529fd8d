use crate::pipeline::Pipeline;
use crate::step::Step;
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read step file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid step file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no steps to run")]
    NoSteps,
    #[error("invalid ignore pattern in step '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

pub fn read_steps(path: &Path) -> Result<Vec<Step>, ConfigError> {
    let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_pipeline(path: &Path) -> Result<Pipeline, ConfigError> {
    Pipeline::from_steps(read_steps(path)?)
}

/// Steps come from a file only when one is named explicitly. Otherwise the
/// built-in Go sequence runs.
pub fn resolve(explicit: Option<&Path>) -> Result<Pipeline, ConfigError> {
    match explicit {
        Some(path) => {
            let pipeline = load_pipeline(path)?;
            info!(
                "Loaded {} steps from {}",
                pipeline.steps().len(),
                path.display()
            );
            Ok(pipeline)
        }
        None => {
            info!("Using built-in Go toolchain steps");
            Ok(Pipeline::go_toolchain())
        }
    }
}

pub fn export_default(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = std::fs::File::create(path).map_err(io_err)?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, Pipeline::go_toolchain().steps()).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_steps_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "{}", content).expect("Failed to write to temp file");
        file
    }

    #[test]
    fn test_read_steps_with_data() {
        let content = r#"[
            { "label": "Vet", "command": "go vet ./..." },
            { "label": "RunTests", "command": "go test ./... 2>&1", "ignore": ["^ok", "^\\?"] }
        ]"#;
        let file = create_temp_steps_file(content);
        let steps = read_steps(file.path()).expect("Failed to read steps");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], Step::new("Vet", "go vet ./..."));
        assert_eq!(steps[1].label, "RunTests");
        assert_eq!(steps[1].ignore, vec!["^ok".to_string(), r"^\?".to_string()]);
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let file = create_temp_steps_file("[]");
        assert!(matches!(load_pipeline(file.path()), Err(ConfigError::NoSteps)));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let file = create_temp_steps_file(r#"[{ "label": "Vet" }]"#);
        let err = load_pipeline(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_bad_pattern_is_rejected_at_load() {
        let file = create_temp_steps_file(
            r#"[{ "label": "RunTests", "command": "go test", "ignore": ["(oops"] }]"#,
        );
        assert!(matches!(
            load_pipeline(file.path()),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("nope.json");
        let err = resolve(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_file_replaces_built_in() {
        let file = create_temp_steps_file(r#"[{ "label": "Only", "command": "true" }]"#);
        let pipeline = resolve(Some(file.path())).unwrap();
        assert_eq!(pipeline.steps(), &[Step::new("Only", "true")]);
    }

    #[test]
    fn test_no_explicit_file_uses_built_in() {
        assert_eq!(resolve(None).unwrap(), Pipeline::go_toolchain());
    }

    #[test]
    fn test_export_default_reads_back_as_built_in() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("steps.json");
        export_default(&path).expect("Failed to export steps");

        let pipeline = load_pipeline(&path).expect("Failed to read back steps");
        assert_eq!(pipeline, Pipeline::go_toolchain());
    }
}
