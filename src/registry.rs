use std::collections::HashSet;
use std::fmt::Write;
use crate::dispatch::Handler;

/// Column at which command descriptions start in the help listing.
pub const DESCRIPTION_COLUMN: usize = 20;

/// One line of the command table.
///
/// Headers only group the help listing; they can never be looked up or run.
#[derive(Debug, Clone)]
pub enum CommandEntry {
    Header(&'static str),
    Runnable(Runnable),
}

/// A command bound to the handler implementing it.
#[derive(Debug, Clone)]
pub struct Runnable {
    pub name: &'static str,
    pub handler: Handler,
    pub description: &'static str,
    /// Deprecated commands still run but are left out of the help listing.
    pub deprecated: bool,
}

impl CommandEntry {
    pub fn header(text: &'static str) -> Self {
        CommandEntry::Header(text)
    }

    pub fn command(name: &'static str, handler: Handler, description: &'static str) -> Self {
        CommandEntry::Runnable(Runnable {
            name,
            handler,
            description,
            deprecated: false,
        })
    }

    pub fn deprecated(name: &'static str, handler: Handler, description: &'static str) -> Self {
        CommandEntry::Runnable(Runnable {
            name,
            handler,
            description,
            deprecated: true,
        })
    }

    fn is_deprecated(&self) -> bool {
        matches!(self, CommandEntry::Runnable(command) if command.deprecated)
    }
}

/// Ordered, immutable table of everything `fpak` can run.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<CommandEntry>,
}

impl Registry {
    /// Builds the table.
    ///
    /// # Panics
    /// If a command name is empty or appears twice. Both are bugs in the
    /// table itself, not something a user can trigger.
    pub fn new(entries: Vec<CommandEntry>) -> Self {
        let mut seen = HashSet::new();
        for entry in &entries {
            if let CommandEntry::Runnable(command) = entry {
                assert!(!command.name.is_empty(), "command registered without a name");
                assert!(seen.insert(command.name), "command '{}' registered twice", command.name);
            }
        }
        Registry { entries }
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Exact, case-sensitive lookup over runnable entries, deprecated ones included.
    pub fn find(&self, name: &str) -> Option<&Runnable> {
        self.entries.iter().find_map(|entry| match entry {
            CommandEntry::Runnable(command) if command.name == name => Some(command),
            _ => None,
        })
    }

    pub fn lookup(&self, name: &str) -> Option<Handler> {
        self.find(name).map(|command| command.handler)
    }

    /// Renders the "Builtin Commands:" listing shown in the top-level help.
    pub fn summary(&self) -> String {
        let mut summary = String::from("Builtin Commands:");
        let mut first = true;
        for entry in self.entries.iter().filter(|entry| !entry.is_deprecated()) {
            match entry {
                CommandEntry::Header(text) => {
                    if !first {
                        summary.push('\n');
                    }
                    let _ = write!(summary, "\n {text}");
                }
                CommandEntry::Runnable(command) => {
                    let pad = DESCRIPTION_COLUMN.saturating_sub(command.name.len());
                    let _ = write!(summary, "\n  {}{:pad$}{}", command.name, "", command.description);
                }
            }
            first = false;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Completion, Invocation};

    fn noop(_: &Invocation<'_>) -> anyhow::Result<Completion> {
        Ok(Completion::Done)
    }

    fn table() -> Registry {
        Registry::new(vec![
            CommandEntry::header("Manage installed apps and runtimes"),
            CommandEntry::command("install", noop, "Install an application or runtime"),
            CommandEntry::command("list", noop, "List installed apps and/or runtimes"),
            CommandEntry::header("Build applications"),
            CommandEntry::command("build-import-bundle", noop, "Import a bundle file"),
            CommandEntry::command("build-update-repository", noop, "Update the summary file"),
            CommandEntry::deprecated("ls-remote", noop, "List contents of a configured remote"),
        ])
    }

    #[test]
    fn test_lookup_runnable() {
        let registry = table();
        assert!(registry.lookup("install").is_some());
        assert_eq!(registry.find("list").map(|c| c.name), Some("list"));
    }

    #[test]
    fn test_lookup_misses() {
        let registry = table();
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("bogus").is_none());
        assert!(registry.lookup("Install").is_none());
        assert!(registry.lookup("Build applications").is_none());
    }

    #[test]
    fn test_deprecated_still_resolves() {
        let registry = table();
        let command = registry.find("ls-remote").unwrap();
        assert!(command.deprecated);
    }

    #[test]
    fn test_summary_layout() {
        let summary = table().summary();
        let expected = "Builtin Commands:\n \
            Manage installed apps and runtimes\n  \
            install             Install an application or runtime\n  \
            list                List installed apps and/or runtimes\n\n \
            Build applications\n  \
            build-import-bundle Import a bundle file\n  \
            build-update-repositoryUpdate the summary file";
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_summary_hides_deprecated() {
        assert!(!table().summary().contains("ls-remote"));
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_names_rejected() {
        Registry::new(vec![
            CommandEntry::command("list", noop, "one"),
            CommandEntry::deprecated("list", noop, "two"),
        ]);
    }
}
