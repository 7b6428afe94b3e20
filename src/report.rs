use std::fmt::Display;
use std::io::IsTerminal;
use std::process::ExitCode;
use colored::Colorize;
use crate::error::Error;
use crate::options::Termination;

/// Terminal state of a run. Success and failure are exclusive by construction.
#[derive(Debug)]
pub enum Outcome {
    Success,
    Terminated(Termination),
    Failed {
        error: Error,
        /// Help text printed to stderr ahead of the error line.
        usage: Option<String>,
    },
}

/// What the dispatcher hands back to `main`.
#[derive(Debug)]
pub struct Report {
    /// Program name, qualified with the command once one was resolved.
    pub prgname: String,
    pub outcome: Outcome,
}

impl Report {
    pub fn exit_code(&self) -> i32 {
        match &self.outcome {
            Outcome::Success => 0,
            Outcome::Terminated(termination) => termination.code,
            Outcome::Failed { .. } => 1,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.outcome {
            Outcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Prints the outcome and returns the status to exit with.
    pub fn emit(self) -> ExitCode {
        let code = self.exit_code();
        match self.outcome {
            Outcome::Success => {}
            Outcome::Terminated(termination) => print!("{}", termination.message),
            Outcome::Failed { error, usage } => {
                if let Some(usage) = usage {
                    eprint!("{usage}");
                    if !usage.ends_with('\n') {
                        eprintln!();
                    }
                }
                print_error(&self.prgname, &error);
            }
        }
        ExitCode::from(u8::try_from(code).unwrap_or(1))
    }
}

/// Builds the final error line. `color` alone decides highlighting; `colored`'s
/// own terminal detection is overridden.
pub fn format_error(prgname: &str, message: &dyn Display, color: bool) -> String {
    let line = format!("{prgname}: error: {message}");
    colored::control::set_override(color);
    if color {
        line.red().bold().to_string()
    } else {
        line
    }
}

/// Prints the final error line, highlighted when stderr is a terminal.
pub fn print_error(prgname: &str, message: &dyn Display) {
    let color = std::io::stderr().is_terminal();
    eprintln!("{}", format_error(prgname, message, color));
}
