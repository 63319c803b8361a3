//! Colored terminal output for release runs.

use crate::pipeline::{TargetOutcome, TargetReport};
use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Writes human-facing messages to the terminal.
///
/// Diagnostics go through `log`; this is only for what the user asked to see.
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    verbose: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose)
    }
}

impl OutputManager {
    pub fn new(verbose: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
        }
    }

    fn tagged(&self, tag: &str, color: Color, message: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(&mut buffer, "{tag}")?;
        buffer.reset()?;
        writeln!(&mut buffer, " {message}")?;
        self.stdout.print(&buffer)
    }

    pub fn info(&self, message: &str) -> std::io::Result<()> {
        self.tagged("ℹ", Color::Cyan, message)
    }

    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.tagged("✓", Color::Green, message)
    }

    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.tagged("⚠", Color::Yellow, message)
    }

    /// Print an error to stderr, falling back to plain stdout.
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();
        if buffer
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))
            .is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || writeln!(&mut buffer, " {message}").is_err()
            || stderr.print(&buffer).is_err()
        {
            println!("✗ {message}");
        }
    }

    /// Only printed with `--verbose`.
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.tagged("→", Color::Blue, message)
    }

    pub fn section(&self, title: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        writeln!(&mut buffer)?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(&mut buffer, "═══ {title} ═══")?;
        buffer.reset()?;
        self.stdout.print(&buffer)
    }

    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        writeln!(&mut buffer, "    {message}")?;
        self.stdout.print(&buffer)
    }

    pub fn println(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.stdout.buffer();
        writeln!(&mut buffer, "{message}")?;
        self.stdout.print(&buffer)
    }

    /// One summary line per target, colored by its terminal state.
    pub fn target(&self, report: &TargetReport) -> std::io::Result<()> {
        let color = match &report.outcome {
            TargetOutcome::Uploaded(_) | TargetOutcome::Packaged(_) => Color::Green,
            TargetOutcome::Skipped(_) => Color::Yellow,
            TargetOutcome::Failed(_) => Color::Red,
        };
        let mut buffer = self.stdout.buffer();
        write!(&mut buffer, "  {:<28} ", report.target.to_string())?;
        buffer.set_color(ColorSpec::new().set_fg(Some(color)))?;
        writeln!(&mut buffer, "{}", report.outcome)?;
        buffer.reset()?;
        if let Some(artifact) = report.outcome.artifact() {
            writeln!(
                &mut buffer,
                "      {} ({} bytes, sha256 {})",
                artifact.path.display(),
                artifact.size,
                artifact.checksum
            )?;
        }
        self.stdout.print(&buffer)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
