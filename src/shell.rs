use log::{debug, warn};
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Runs a shell command string and hands back everything it printed.
pub trait CommandRunner {
    fn run(&self, command: &str) -> io::Result<String>;
}

/// Runs commands through `sh -c`, with stderr folded into stdout.
#[derive(Debug, Default)]
pub struct ShellRunner {
    dir: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        ShellRunner {
            dir: Some(dir.into()),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> io::Result<String> {
        debug!("Running command: {}", command);

        // `exec 2>&1` points the script's stderr at the stdout pipe so both
        // streams arrive interleaved in one buffer.
        let script = format!("exec 2>&1\n{}", command);
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        // Anything written before the redirect took effect (shell startup noise).
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        debug!("Command '{}' exited with {}", command, output.status);
        if !output.status.success() && text.is_empty() {
            warn!(
                "Command '{}' exited with {} but printed nothing; treating it as passed",
                command, output.status
            );
        }
        Ok(text)
    }
}
