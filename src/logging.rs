use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "debug";

static FILTER: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Installs the stderr subscriber. Honors `RUST_LOG`, defaults to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (filter, handle) = reload::Layer::new(filter);
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();
    if tracing_subscriber::registry().with(filter).with(fmt).try_init().is_ok() {
        let _ = FILTER.set(handle);
    }
}

/// Raises the filter to `debug` for the rest of the run.
///
/// Does nothing if [`init`] was never called.
pub fn enable_verbose() {
    if let Some(handle) = FILTER.get() {
        if let Err(err) = handle.modify(|filter| *filter = EnvFilter::new(VERBOSE_FILTER)) {
            eprintln!("Could not raise log level: {err}");
        }
    }
}
