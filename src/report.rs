//! Reporting of the final outcome to the hosting CI runner.
//!
//! Failures are written as GitHub Actions `::error::` workflow commands so
//! they surface as annotations on the run; a pass is silent.

use std::io::{self, Write};
use std::process::ExitCode;

use crate::error::GateError;
use crate::gate::Verdict;

/// Exit code for a reported fault (no verdict was produced).
pub const FAULT_EXIT_CODE: u8 = 2;

pub struct ActionsReporter<W: Write> {
    out: W,
}

impl ActionsReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ActionsReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes the failure line for `verdict`, if any, and returns the exit code.
    pub fn report(&mut self, verdict: &Verdict) -> io::Result<ExitCode> {
        match verdict.failure_message() {
            None => Ok(ExitCode::SUCCESS),
            Some(message) => {
                self.error_line(&message)?;
                Ok(ExitCode::FAILURE)
            }
        }
    }

    /// Reports an error that aborted the invocation before a verdict.
    pub fn report_fault(&mut self, err: &GateError) -> io::Result<ExitCode> {
        self.error_line(&err.to_string())?;
        Ok(ExitCode::from(FAULT_EXIT_CODE))
    }

    fn error_line(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::error::{}", escape_data(message))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Escapes a workflow command payload so it stays on one line.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
