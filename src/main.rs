use std::process::ExitCode;
use fpak::*;

fn main() -> ExitCode {
    logging::init();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            print_error(env!("CARGO_PKG_NAME"), &format!("{err:#}"));
            return ExitCode::FAILURE;
        }
    };
    let registry = builtins::registry();
    let argv = match collect_args(std::env::args_os()) {
        Ok(argv) => argv,
        Err(err) => {
            print_error(env!("CARGO_PKG_NAME"), &err);
            return ExitCode::FAILURE;
        }
    };
    Dispatcher::new(&registry, &config)
        .dispatch(&argv, &Cancellable::default())
        .emit()
}
