//! Console output
//!
//! Everything the user sees goes through [`Console`], which writes to any
//! `io::Write` so the rendering can be checked in tests.

use std::io::{self, Write};

use colored::*;

use crate::domain::{Analysis, Source};
use crate::master;
use crate::runner::RunnerError;

/// Writes status lines and per-cycle reports
pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    /// Console writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the console, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// The expected layout when a watch directory is missing
    pub fn missing_sources(&mut self, sources: &[Source]) -> io::Result<()> {
        let dirs: Vec<String> = sources.iter().map(|s| s.watch_dir.display().to_string()).collect();
        writeln!(self.out, "The Koans are not where we expected them to be.")?;
        writeln!(self.out, "They are in '{}' instead.", dirs.join("' and '"))?;
        self.out.flush()
    }

    /// Printed before every build
    pub fn pondering(&mut self, scope: Option<&Source>) -> io::Result<()> {
        let subject = scope.map_or("path to enlightenment", |source| source.name.as_str());
        writeln!(self.out, "The Master is pondering your {}...", subject)?;
        self.out.flush()
    }

    pub fn build_error(&mut self, exit_code: i32) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            format!(
                "There was a build error ({}).  Please check your code and try again.",
                exit_code
            )
            .yellow()
        )
    }

    pub fn checking(&mut self) -> io::Result<()> {
        writeln!(self.out, "Checking Koans...")?;
        self.out.flush()
    }

    pub fn no_artifact(&mut self, source: &Source) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            format!("No fresh build of {} was found. The Master waits.", source.name).dimmed()
        )
    }

    /// A build or harness process that could not be run
    pub fn runner_error(&mut self, err: &RunnerError) -> io::Result<()> {
        writeln!(self.out, "{} {}", "The Master could not reach the koans:".red(), err)?;
        if err.is_not_found() {
            writeln!(self.out, "\tIs '{}' installed and on your PATH?", err.program())?;
        }
        Ok(())
    }

    /// Shown once the startup sweep is done and watching begins
    pub fn watching(&mut self, sources: &[Source]) -> io::Result<()> {
        let patterns: Vec<String> = sources.iter().map(Source::pattern).collect();
        writeln!(self.out, "When you save a Koan ({}), the Master will again ponder your work.", patterns.join(", "))?;
        writeln!(self.out, "Press Enter to exit...")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Full per-cycle report
    pub fn report<S: AsRef<str>>(&mut self, analysis: &Analysis, lines: &[S]) -> io::Result<()> {
        self.last_actions(analysis)?;
        self.masters_comments(analysis)?;
        self.answers_you_seek(analysis, lines)?;
        self.final_words(analysis)?;
        self.out.flush()
    }

    fn last_actions(&mut self, analysis: &Analysis) -> io::Result<()> {
        if let Some(koan) = &analysis.last_passed_koan {
            writeln!(self.out, "{} {}", koan.green(), master::EXPANDED)?;
        }
        if let Some(koan) = &analysis.failed_koan {
            writeln!(self.out, "{} {}", koan.red(), master::DAMAGED)?;
        }
        Ok(())
    }

    fn masters_comments(&mut self, analysis: &Analysis) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "The Master says:")?;
        writeln!(self.out, "\t{}", master::state_of_enlightenment(analysis).cyan())?;
        if let Some(encouragement) = master::encouragement(analysis) {
            writeln!(self.out, "\t{}", encouragement.cyan())?;
        }
        Ok(())
    }

    fn answers_you_seek<S: AsRef<str>>(&mut self, analysis: &Analysis, lines: &[S]) -> io::Result<()> {
        if analysis.failed_koan.is_none() {
            return Ok(());
        }

        writeln!(self.out)?;
        writeln!(self.out, "The answers you seek...")?;
        for line in master::where_to_seek(lines) {
            writeln!(self.out, "\t{}", line.red())?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "Please meditate on the following code:")?;
        writeln!(self.out, "\t{}", master::what_to_meditate_on(lines).red())
    }

    fn final_words(&mut self, analysis: &Analysis) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "sleep is the best meditation")?;
        writeln!(
            self.out,
            "your path thus far [{}] {}/{}",
            analysis.progress_bar, analysis.completed_koans, analysis.total_koans
        )
    }
}
