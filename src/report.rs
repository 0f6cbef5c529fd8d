use crate::step::Step;
use colored::Colorize;
use std::io::{self, Write};

/// Writes the per-step status lines.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Reporter { out, color }
    }

    pub fn passed(&mut self, label: &str) -> io::Result<()> {
        self.status(label, "Passed")
    }

    pub fn failed(&mut self, label: &str, output: &str) -> io::Result<()> {
        self.status(label, "Failed")?;
        self.out.write_all(output.as_bytes())?;
        if !output.is_empty() && !output.ends_with('\n') {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn plan(&mut self, step: &Step) -> io::Result<()> {
        writeln!(self.out, "{}{}", self.label(&step.label), step.command)
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn status(&mut self, label: &str, word: &str) -> io::Result<()> {
        let word = match (self.color, word) {
            (false, _) => word.to_string(),
            (true, "Passed") => word.green().to_string(),
            (true, _) => word.red().to_string(),
        };
        writeln!(self.out, "{}{}", self.label(label), word)?;
        self.out.flush()
    }

    fn label(&self, label: &str) -> String {
        let text = format!("{}: ", label);
        if self.color {
            text.cyan().to_string()
        } else {
            text
        }
    }
}
