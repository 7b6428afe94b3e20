use thiserror::Error;

/// Every way a run of `fpak` can end in failure.
///
/// All kinds are terminal for the current run. Handlers return
/// `anyhow::Result`, so the dispatcher recovers these kinds by downcasting;
/// anything a handler reports that is not one of them becomes [`Error::Handler`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("No command specified")]
    NoCommandSpecified,

    #[error("{0}")]
    OptionParse(String),

    #[error("{0}")]
    DirectorySetup(String),

    /// A handler rejected its operands. `help` is the handler's own usage text.
    #[error("{message}")]
    Usage { message: String, help: String },

    #[error("Command '{0}' is not supported by this build")]
    NotSupported(String),

    #[error("{0:#}")]
    Handler(anyhow::Error),
}

impl Error {
    /// Turns whatever a handler returned into a core error kind.
    pub fn from_handler(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(err) => Error::Handler(err),
        }
    }
}
