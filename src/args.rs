use std::ffi::OsString;
use crate::error::Error;

/// Character that marks a token as an option rather than an operand.
pub const FLAG_PREFIX: char = '-';

/// The raw argument vector split into the command name and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// First token that does not start with [`FLAG_PREFIX`], if any.
    pub command_name: Option<String>,
    /// All other arguments (program name excluded), in their original order.
    pub remaining: Vec<String>,
}

/// Pulls the command name out of a full argument vector.
///
/// `argv[0]` is the program name and is dropped. The first token that is not
/// flag-prefixed becomes the command name; every other token is kept in its
/// original relative order. At most one token is extracted, so global flags
/// given before the command and operands given after it both survive.
///
/// ```
/// use fpak::partition;
///
/// let argv = ["fpak", "--verbose", "install", "--user", "org.example.App"];
/// let parsed = partition(argv.iter().map(|s| s.to_string()));
/// assert_eq!(parsed.command_name.as_deref(), Some("install"));
/// assert_eq!(parsed.remaining, ["--verbose", "--user", "org.example.App"]);
/// ```
pub fn partition<I>(argv: I) -> ParsedInvocation
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut parsed = ParsedInvocation::default();
    for arg in argv.into_iter().skip(1).map(Into::into) {
        if parsed.command_name.is_none() && !arg.starts_with(FLAG_PREFIX) {
            parsed.command_name = Some(arg);
            continue;
        }
        parsed.remaining.push(arg);
    }
    parsed
}

/// Converts the raw process arguments to strings, rejecting any that are not
/// valid Unicode.
pub fn collect_args<I>(args: I) -> Result<Vec<String>, Error>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|arg| {
                Error::OptionParse(format!("Invalid argument encoding: '{}'", arg.to_string_lossy()))
            })
        })
        .collect()
}
