//! Debug bundle writer for inspecting one fit or spline run.
//!
//! A bundle is a timestamped markdown file under `debug/` holding the run
//! settings, the input points and whatever sections the caller adds
//! (parameters, coefficients, solver statistics).

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::Point;
use crate::error::AppError;

/// Markdown sections collected during a run.
#[derive(Debug, Clone, Default)]
pub struct DebugBundle {
    command: String,
    settings: Vec<(String, String)>,
    points: Vec<Point>,
    sections: Vec<(String, String)>,
}

impl DebugBundle {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.settings.push((key.into(), value.to_string()));
        self
    }

    pub fn points(mut self, points: &[Point]) -> Self {
        self.points = points.to_vec();
        self
    }

    /// Add a `##` section; `body` is written verbatim inside a code fence.
    pub fn section(mut self, heading: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push((heading.into(), body.into()));
        self
    }

    /// Write to `debug/pcurve_debug_<timestamp>.md`.
    pub fn write(&self) -> Result<PathBuf, AppError> {
        self.write_in(Path::new("debug"))
    }

    pub fn write_in(&self, dir: &Path) -> Result<PathBuf, AppError> {
        create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;
        let ts = Local::now().format("%Y%m%d_%H%M%S%3f");
        let path = dir.join(format!("pcurve_debug_{ts}.md"));

        let file = File::create(&path)
            .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
        let mut out = BufWriter::new(file);
        self.render(&mut out)
            .and_then(|()| out.flush())
            .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;
        log::info!("debug bundle written to {}", path.display());
        Ok(path)
    }

    fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "# pcurve debug bundle")?;
        writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
        writeln!(out, "- command: {}", self.command)?;
        for (key, value) in &self.settings {
            writeln!(out, "- {key}: {value}")?;
        }

        writeln!(out, "\n## Input points ({})", self.points.len())?;
        writeln!(out, "| i | x | y |")?;
        writeln!(out, "| - | - | - |")?;
        for (i, p) in self.points.iter().enumerate() {
            writeln!(out, "| {i} | {} | {} |", p.x, p.y)?;
        }

        for (heading, body) in &self.sections {
            writeln!(out, "\n## {heading}")?;
            writeln!(out, "```text")?;
            writeln!(out, "{}", body.trim_end())?;
            writeln!(out, "```")?;
        }
        Ok(())
    }
}
