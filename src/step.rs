use crate::shell::CommandRunner;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// A labelled shell command. It fails when it prints anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub label: String,
    pub command: String,
    /// Regexes for output lines that should not count against the step.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed { output: String },
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid ignore pattern in step '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

impl Step {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Step {
            label: label.into(),
            command: command.into(),
            ignore: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn ignoring(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    pub fn ignore_set(&self) -> Result<Option<RegexSet>, regex::Error> {
        if self.ignore.is_empty() {
            return Ok(None);
        }
        RegexSet::new(&self.ignore).map(Some)
    }

    pub fn run(&self, runner: &dyn CommandRunner) -> Result<StepOutcome, StepError> {
        let filters = self
            .ignore_set()
            .map_err(|source| StepError::InvalidPattern {
                label: self.label.clone(),
                source,
            })?;
        let captured = runner
            .run(&self.command)
            .map_err(|source| StepError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let output = match filters {
            Some(set) => drop_matching_lines(&captured, &set),
            None => captured,
        };

        if output.is_empty() {
            Ok(StepOutcome::Passed)
        } else {
            Ok(StepOutcome::Failed { output })
        }
    }
}

fn drop_matching_lines(text: &str, set: &RegexSet) -> String {
    text.split_inclusive('\n')
        .filter(|line| !set.is_match(line.trim_end_matches(['\r', '\n'])))
        .collect()
}
