//! Layered option parsing.
//!
//! Every invocation is parsed in a single pass over a [`clap::Command`] built
//! from several [`OptionGroup`]s: the scope layer (`--user`/`--system`),
//! whatever groups the command adds, and the global layer (`--verbose`,
//! `--version`, `--default-arch`). Group order only decides the order of the
//! help headings; a flag name claimed by two groups is a bug and panics when
//! the context is built.

use std::collections::BTreeSet;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Args, FromArgMatches};
use tracing::debug;
use crate::config::Config;
use crate::dir::{InstallDir, Scope};
use crate::error::Error;
use crate::logging;

const OPERANDS: &str = "operands";

/// Process-wide flags, present for every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Print debug information during command processing
    #[arg(short, long)]
    pub verbose: bool,
    /// Print version information and exit
    #[arg(long = "version")]
    pub show_version: bool,
    /// Print default arch and exit
    #[arg(long = "default-arch")]
    pub show_default_arch: bool,
    /// Show help options
    #[arg(short, long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Selects the installation a command works on.
#[derive(Debug, Clone, Default, Args)]
pub struct ScopeArgs {
    /// Work on user installations
    #[arg(long, conflicts_with = "system")]
    pub user: bool,
    /// Work on system-wide installations (default)
    #[arg(long)]
    pub system: bool,
}

impl ScopeArgs {
    pub fn scope(&self) -> Scope {
        if self.user { Scope::User } else { Scope::System }
    }
}

/// The global flags as seen after a successful parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub verbose: bool,
    pub show_version: bool,
    pub show_default_arch: bool,
    pub user_scope: bool,
}

/// How much of the installation directory a command needs before it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinFlags {
    /// Skip the scope layer and never touch an installation directory.
    pub no_dir: bool,
    /// Create the directory but not its repository.
    pub no_repo: bool,
}

impl BuiltinFlags {
    pub const NONE: BuiltinFlags = BuiltinFlags { no_dir: false, no_repo: false };
    pub const NO_DIR: BuiltinFlags = BuiltinFlags { no_dir: true, no_repo: false };
    pub const NO_REPO: BuiltinFlags = BuiltinFlags { no_dir: false, no_repo: true };
}

/// A named set of flags contributed by one `#[derive(Args)]` struct.
#[derive(Debug, Clone, Copy)]
pub struct OptionGroup {
    heading: &'static str,
    augment: fn(clap::Command) -> clap::Command,
}

impl OptionGroup {
    pub fn of<A: Args>(heading: &'static str) -> Self {
        OptionGroup { heading, augment: A::augment_args }
    }

    pub fn scope() -> Self {
        Self::of::<ScopeArgs>("Scope Options")
    }

    pub fn global() -> Self {
        Self::of::<GlobalArgs>("Application Options")
    }

    fn apply(&self, cmd: clap::Command) -> clap::Command {
        (self.augment)(cmd.next_help_heading(self.heading))
    }

    /// Every id, long and short name the group registers.
    fn names(&self) -> Vec<String> {
        let scratch = (self.augment)(clap::Command::new("scratch"));
        let mut names = Vec::new();
        for arg in scratch.get_arguments() {
            names.push(format!("id:{}", arg.get_id()));
            if let Some(long) = arg.get_long() {
                names.push(format!("--{long}"));
            }
            if let Some(short) = arg.get_short() {
                names.push(format!("-{short}"));
            }
        }
        names
    }
}

/// Text to print on stdout and the status to exit with, for invocations that
/// end during option parsing (`--help`, `--version`, `--default-arch`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    pub message: String,
    pub code: i32,
}

impl Termination {
    pub fn success(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        Termination { message, code: 0 }
    }
}

#[derive(Debug)]
pub enum ParseOutcome {
    Parsed(ParsedOptions),
    Terminate(Termination),
}

/// Result of a successful parse, handed to the command body.
#[derive(Debug)]
pub struct ParsedOptions {
    pub globals: GlobalOptions,
    pub operands: Vec<String>,
    pub dir: Option<InstallDir>,
    matches: ArgMatches,
}

impl ParsedOptions {
    /// Reads back the values of one of the groups the context was built with.
    pub fn get<A: FromArgMatches>(&self) -> Result<A, Error> {
        A::from_arg_matches(&self.matches).map_err(|e| Error::OptionParse(describe(&e)))
    }

    pub fn dir(&self) -> anyhow::Result<&InstallDir> {
        self.dir
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No installation directory was set up for this command"))
    }
}

/// Builder for one parse pass.
#[derive(Debug, Clone)]
pub struct OptionContext {
    prgname: String,
    parameter: String,
    summary: Option<String>,
    flags: BuiltinFlags,
    groups: Vec<OptionGroup>,
    registered: BTreeSet<String>,
}

impl OptionContext {
    /// `parameter` describes the operands in the usage line, e.g. `"NAME LOCATION"`.
    pub fn new(prgname: impl Into<String>, parameter: impl Into<String>, flags: BuiltinFlags) -> Self {
        let mut context = OptionContext {
            prgname: prgname.into(),
            parameter: parameter.into(),
            summary: None,
            flags,
            groups: Vec::new(),
            registered: BTreeSet::new(),
        };
        context.register(&OptionGroup::global());
        if !flags.no_dir {
            context.register(&OptionGroup::scope());
        }
        context
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn group<A: Args>(self, heading: &'static str) -> Self {
        self.add(OptionGroup::of::<A>(heading))
    }

    /// # Panics
    /// If the group reuses a flag name already claimed by another layer.
    pub fn add(mut self, group: OptionGroup) -> Self {
        self.register(&group);
        self.groups.push(group);
        self
    }

    fn register(&mut self, group: &OptionGroup) {
        for name in group.names() {
            assert!(
                self.registered.insert(name.clone()),
                "option '{name}' registered twice ({} group)",
                group.heading
            );
        }
    }

    fn layers(&self) -> Vec<OptionGroup> {
        let mut layers = Vec::with_capacity(self.groups.len() + 2);
        if !self.flags.no_dir {
            layers.push(OptionGroup::scope());
        }
        layers.extend(self.groups.iter().copied());
        layers.push(OptionGroup::global());
        layers
    }

    fn command(&self) -> clap::Command {
        let template = match self.summary {
            Some(_) => "{usage-heading} {usage}\n\n{before-help}{all-args}",
            None => "{usage-heading} {usage}\n\n{all-args}",
        };
        let mut cmd = clap::Command::new(env!("CARGO_PKG_NAME"))
            .no_binary_name(true)
            .disable_version_flag(true)
            .disable_help_flag(true)
            .args_override_self(true)
            .override_usage(format!("{} [OPTION...] {}", self.prgname, self.parameter).trim_end().to_string())
            .help_template(template);
        if let Some(summary) = &self.summary {
            cmd = cmd.before_help(summary.clone());
        }
        for layer in self.layers() {
            cmd = layer.apply(cmd);
        }
        cmd.arg(
            Arg::new(OPERANDS)
                .num_args(1..)
                .action(ArgAction::Append)
                .hide(true),
        )
    }

    /// Full help text for this context.
    pub fn help(&self) -> String {
        let mut cmd = self.command();
        cmd.render_help().to_string()
    }

    /// An error that prints this context's help before the message.
    pub fn usage_error(&self, message: impl Into<String>) -> Error {
        Error::Usage {
            message: message.into(),
            help: self.help(),
        }
    }

    /// Parses `args` (program name excluded) against all layers.
    ///
    /// `--version` and `--default-arch` end the run with [`ParseOutcome::Terminate`]
    /// before any directory is touched. With the scope layer active, the chosen
    /// installation directory (and its repository, unless `no_repo`) exists on
    /// disk once this returns [`ParseOutcome::Parsed`].
    pub fn parse(&self, args: &[String], config: &Config) -> Result<ParseOutcome, Error> {
        let matches = match self.command().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        Ok(ParseOutcome::Terminate(Termination::success(err.to_string())))
                    }
                    _ => Err(Error::OptionParse(describe(&err))),
                };
            }
        };

        let global = GlobalArgs::from_arg_matches(&matches).map_err(|e| Error::OptionParse(describe(&e)))?;
        if global.show_version {
            return Ok(ParseOutcome::Terminate(Termination::success(version_string())));
        }
        if global.show_default_arch {
            return Ok(ParseOutcome::Terminate(Termination::success(default_arch())));
        }
        if global.verbose {
            logging::enable_verbose();
        }

        let mut user_scope = false;
        let mut dir = None;
        if !self.flags.no_dir {
            let scope = ScopeArgs::from_arg_matches(&matches)
                .map_err(|e| Error::OptionParse(describe(&e)))?
                .scope();
            user_scope = scope == Scope::User;
            let install_dir = InstallDir::get(scope, config);
            debug!(path = %install_dir.path().display(), ?scope, "using installation");
            install_dir.ensure_path()?;
            if !self.flags.no_repo {
                install_dir.ensure_repo()?;
            }
            dir = Some(install_dir);
        }

        let operands = matches
            .get_many::<String>(OPERANDS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        Ok(ParseOutcome::Parsed(ParsedOptions {
            globals: GlobalOptions {
                verbose: global.verbose,
                show_version: global.show_version,
                show_default_arch: global.show_default_arch,
                user_scope,
            },
            operands,
            dir,
            matches,
        }))
    }
}

/// First line of a clap error, without clap's own `error: ` prefix.
fn describe(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim().to_string()
}

pub fn version_string() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Architecture name used for refs on this machine.
pub fn default_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86" => "i386",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        arch => arch,
    }
}
