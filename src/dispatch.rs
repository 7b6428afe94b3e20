use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use crate::args::{partition, ParsedInvocation};
use crate::config::Config;
use crate::error::Error;
use crate::options::{BuiltinFlags, OptionContext, ParseOutcome, Termination};
use crate::registry::Registry;
use crate::report::{Outcome, Report};

/// Signature every command implementation has.
pub type Handler = fn(&Invocation<'_>) -> anyhow::Result<Completion>;

/// How a handler that did not fail finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Done,
    /// Option parsing asked to end the run early (`--help`, `--version`, ...).
    Terminated(Termination),
}

/// Token handed through to handlers so long-running work can stop early.
/// The dispatcher itself never sets or reads it.
#[derive(Debug, Clone, Default)]
pub struct Cancellable(Arc<AtomicBool>);

impl Cancellable {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a handler gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Display name, `"<program> <command>"`.
    pub prgname: &'a str,
    pub command: &'a str,
    /// Arguments left after the command name was taken out, program name excluded.
    pub args: &'a [String],
    pub config: &'a Config,
    pub cancellable: &'a Cancellable,
}

impl Invocation<'_> {
    /// Starts an option context for this command with the standard layers.
    pub fn context(&self, parameter: &str, flags: BuiltinFlags) -> OptionContext {
        OptionContext::new(self.prgname, parameter, flags)
    }
}

/// Resolves the command named on the command line and runs it.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a Registry,
    config: &'a Config,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a Registry, config: &'a Config) -> Self {
        Dispatcher { registry, config }
    }

    /// Top-level context: the command listing plus the global layer only.
    pub fn main_context(&self, program: &str) -> OptionContext {
        OptionContext::new(program, "COMMAND", BuiltinFlags::NO_DIR).summary(self.registry.summary())
    }

    /// Runs one invocation. `argv[0]` is the program name.
    pub fn dispatch(&self, argv: &[String], cancellable: &Cancellable) -> Report {
        let program = program_name(argv);
        let ParsedInvocation { command_name, remaining } = partition(argv.iter().cloned());

        let Some(command) = command_name.as_deref().and_then(|name| self.registry.find(name)) else {
            return self.unresolved(program, command_name, &remaining);
        };

        let prgname = format!("{program} {}", command.name);
        debug!(command = command.name, args = ?remaining, "running command");
        let invocation = Invocation {
            prgname: &prgname,
            command: command.name,
            args: &remaining,
            config: self.config,
            cancellable,
        };

        let outcome = match (command.handler)(&invocation) {
            Ok(Completion::Done) => Outcome::Success,
            Ok(Completion::Terminated(termination)) => Outcome::Terminated(termination),
            Err(err) => {
                let error = Error::from_handler(err);
                let usage = match &error {
                    Error::Usage { help, .. } => Some(help.clone()),
                    Error::NotSupported(_) => Some(self.main_context(&program).help()),
                    _ => None,
                };
                Outcome::Failed { error, usage }
            }
        };
        Report { prgname, outcome }
    }

    /// No runnable command matched. Without any command name, the remaining
    /// flags still get a parse so `--help` and `--version` work on their own.
    fn unresolved(&self, program: String, command_name: Option<String>, remaining: &[String]) -> Report {
        let context = self.main_context(&program);
        let error = match command_name {
            Some(name) => Error::UnknownCommand(name),
            None => match context.parse(remaining, self.config) {
                Ok(ParseOutcome::Terminate(termination)) => {
                    return Report {
                        prgname: program,
                        outcome: Outcome::Terminated(termination),
                    };
                }
                Ok(ParseOutcome::Parsed(_)) => Error::NoCommandSpecified,
                Err(err) => err,
            },
        };
        Report {
            prgname: program,
            outcome: Outcome::Failed {
                error,
                usage: Some(context.help()),
            },
        }
    }
}

fn program_name(argv: &[String]) -> String {
    argv.first()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_strips_directories() {
        let argv = vec!["/usr/bin/fpak".to_string()];
        assert_eq!(program_name(&argv), "fpak");
    }

    #[test]
    fn test_program_name_defaults_to_crate() {
        assert_eq!(program_name(&[]), "fpak");
    }

    #[test]
    fn test_cancellable_is_shared() {
        let token = Cancellable::default();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
