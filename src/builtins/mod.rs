//! Built-in commands and the table that binds them to names.

/// Parses the invocation's arguments, returning early from the handler when
/// parsing ends the run (`--help`, `--version`, `--default-arch`).
macro_rules! parse_or_exit {
    ($context:expr, $invocation:expr) => {
        match $context.parse($invocation.args, $invocation.config)? {
            $crate::options::ParseOutcome::Parsed(parsed) => parsed,
            $crate::options::ParseOutcome::Terminate(termination) => {
                return Ok($crate::dispatch::Completion::Terminated(termination));
            }
        }
    };
}

mod installed;
mod remote;

use anyhow::Result;
use crate::dispatch::{Completion, Invocation};
use crate::error::Error;
use crate::options::BuiltinFlags;
use crate::registry::{CommandEntry, Registry};

pub use installed::{info, list};
pub use remote::{remote_add, remote_delete, remote_list, remote_modify};

/// The full command table, in help order.
pub fn registry() -> Registry {
    Registry::new(vec![
        CommandEntry::header("Manage installed apps and runtimes"),
        CommandEntry::command("install", unsupported, "Install an application or runtime from a remote"),
        CommandEntry::command("update", unsupported, "Update an installed application or runtime"),
        CommandEntry::command("uninstall", unsupported, "Uninstall an installed application or runtime"),
        CommandEntry::command("list", list, "List installed apps and/or runtimes"),
        CommandEntry::command("info", info, "Show info for installed app or runtime"),

        CommandEntry::header("Running applications"),
        CommandEntry::command("run", unsupported, "Run an application"),
        CommandEntry::command("override", unsupported, "Override permissions for an application"),
        CommandEntry::command("export-file", unsupported_no_dir, "Grant an application access to a specific file"),
        CommandEntry::command("make-current", unsupported, "Specify default version to run"),
        CommandEntry::command("enter", unsupported_no_dir, "Enter the namespace of a running application"),

        CommandEntry::header("Manage remote repositories"),
        CommandEntry::command("remote-add", remote_add, "Add a new remote repository (by URL)"),
        CommandEntry::command("remote-modify", remote_modify, "Modify properties of a configured remote"),
        CommandEntry::command("remote-delete", remote_delete, "Delete a configured remote"),
        CommandEntry::command("remote-list", remote_list, "List all configured remotes"),
        CommandEntry::command("remote-ls", unsupported, "List contents of a configured remote"),

        CommandEntry::header("Build applications"),
        CommandEntry::command("build-init", unsupported_no_dir, "Initialize a directory for building"),
        CommandEntry::command("build", unsupported_no_dir, "Run a build command inside the build dir"),
        CommandEntry::command("build-finish", unsupported_no_dir, "Finish a build dir for export"),
        CommandEntry::command("build-export", unsupported_no_dir, "Export a build dir to a repository"),
        CommandEntry::command("build-bundle", unsupported_no_dir, "Create a bundle file from a build directory"),
        CommandEntry::command("build-import-bundle", unsupported_no_dir, "Import a bundle file"),
        CommandEntry::command("build-sign", unsupported_no_dir, "Sign an application or runtime"),
        CommandEntry::command("build-update-repo", unsupported_no_dir, "Update the summary file in a repository"),

        // Old spellings, kept working but not advertised.
        CommandEntry::deprecated("add-remote", remote_add, "Add a new remote repository (by URL)"),
        CommandEntry::deprecated("modify-remote", remote_modify, "Modify properties of a configured remote"),
        CommandEntry::deprecated("delete-remote", remote_delete, "Delete a configured remote"),
        CommandEntry::deprecated("list-remotes", remote_list, "List all configured remotes"),
        CommandEntry::deprecated("ls-remote", unsupported, "List contents of a configured remote"),
    ])
}

/// Commands whose work (pulling, deploying, sandboxing) this build does not carry.
/// Options are still parsed so `--help` and scope selection behave as usual.
fn unsupported(invocation: &Invocation<'_>) -> Result<Completion> {
    not_supported(invocation, BuiltinFlags::NONE)
}

fn unsupported_no_dir(invocation: &Invocation<'_>) -> Result<Completion> {
    not_supported(invocation, BuiltinFlags::NO_DIR)
}

fn not_supported(invocation: &Invocation<'_>, flags: BuiltinFlags) -> Result<Completion> {
    let context = invocation.context("[ARGUMENT...]", flags);
    let _parsed = parse_or_exit!(context, invocation);
    Err(Error::NotSupported(invocation.command.to_string()).into())
}
