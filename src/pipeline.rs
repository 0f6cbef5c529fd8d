use crate::config::ConfigError;
use crate::report::Reporter;
use crate::shell::CommandRunner;
use crate::step::{Step, StepError, StepOutcome};
use log::info;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("step '{label}' produced output")]
    StepProducedOutput { label: String, output: String },
    #[error("step '{label}' could not be run: {source}")]
    Spawn {
        label: String,
        #[source]
        source: StepError,
    },
    #[error("failed to write status: {0}")]
    Report(#[from] io::Error),
}

/// Labels of the steps that passed, in the order they ran.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub passed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// Format, lint, test, build and install a Go module.
    pub fn go_toolchain() -> Self {
        Pipeline {
            steps: vec![
                Step::new("GoFormat", "gofmt -w ."),
                Step::new("GoLinter", "golint ./... 2>&1"),
                Step::new("RunTests", "go test ./... 2>&1 | grep -v ^ok | grep -v '^?'"),
                Step::new("RunBuild", "go build ./..."),
                Step::new("Installs", "go install ./..."),
            ],
        }
    }

    pub fn from_steps(steps: Vec<Step>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }
        for step in &steps {
            step.ignore_set()
                .map_err(|source| ConfigError::InvalidPattern {
                    label: step.label.clone(),
                    source,
                })?;
        }
        Ok(Pipeline { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Runs every step in order and stops at the first one that prints anything.
    pub fn run<W: Write>(
        &self,
        runner: &dyn CommandRunner,
        reporter: &mut Reporter<W>,
    ) -> Result<PipelineReport, PipelineError> {
        info!("Running {} steps", self.steps.len());
        let mut report = PipelineReport::default();

        for step in &self.steps {
            match step.run(runner) {
                Ok(StepOutcome::Passed) => {
                    reporter.passed(&step.label)?;
                    report.passed.push(step.label.clone());
                }
                Ok(StepOutcome::Failed { output }) => {
                    reporter.failed(&step.label, &output)?;
                    return Err(PipelineError::StepProducedOutput {
                        label: step.label.clone(),
                        output,
                    });
                }
                Err(source) => {
                    reporter.failed(&step.label, &source.to_string())?;
                    return Err(PipelineError::Spawn {
                        label: step.label.clone(),
                        source,
                    });
                }
            }
        }

        info!("All {} steps passed", report.passed.len());
        Ok(report)
    }
}
