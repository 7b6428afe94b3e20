use std::cell::RefCell;
use tempfile::TempDir;
use fpak::*;

thread_local! {
    static CALLS: RefCell<Vec<(String, Vec<String>, bool)>> = const { RefCell::new(Vec::new()) };
}

fn record(invocation: &Invocation<'_>) -> anyhow::Result<Completion> {
    let context = invocation.context("REF", BuiltinFlags::NONE);
    let parsed = match context.parse(invocation.args, invocation.config)? {
        ParseOutcome::Parsed(parsed) => parsed,
        ParseOutcome::Terminate(termination) => return Ok(Completion::Terminated(termination)),
    };
    CALLS.with(|calls| {
        calls.borrow_mut().push((
            invocation.prgname.to_string(),
            invocation.args.to_vec(),
            parsed.globals.user_scope,
        ))
    });
    Ok(Completion::Done)
}

fn failing(_: &Invocation<'_>) -> anyhow::Result<Completion> {
    anyhow::bail!("something went wrong")
}

fn setup_tests() -> (TempDir, Config, Registry) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::new(temp_dir.path().join("user"), temp_dir.path().join("system"));
    let registry = Registry::new(vec![
        CommandEntry::header("Manage installed apps and runtimes"),
        CommandEntry::command("install", record, "Install an application or runtime from a remote"),
        CommandEntry::command("fail", failing, "Always fails"),
        CommandEntry::deprecated("old-install", record, "Install, the old way"),
    ]);
    (temp_dir, config, registry)
}

fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn calls() -> Vec<(String, Vec<String>, bool)> {
    CALLS.with(|calls| calls.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_user_runs_handler() {
        let (dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "install", "--user", "foo"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.prgname, "prog install");
        assert_eq!(calls(), vec![("prog install".to_string(), argv(&["--user", "foo"]), true)]);
        assert!(dir.path().join("user").join("repo").exists());
        assert!(!dir.path().join("system").exists());
    }

    #[test]
    fn test_global_flags_before_command_reach_handler() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "-v", "install", "foo"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 0);
        assert_eq!(calls(), vec![("prog install".to_string(), argv(&["-v", "foo"]), false)]);
    }

    #[test]
    fn test_deprecated_command_still_runs() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "old-install"]), &Cancellable::default());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(calls().len(), 1);
    }

    #[test]
    fn test_version_without_command() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "--version"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 0);
        match &report.outcome {
            Outcome::Terminated(termination) => assert_eq!(termination.message, format!("{}\n", version_string())),
            other => panic!("expected termination, got {other:?}"),
        }
        assert!(calls().is_empty());
    }

    #[test]
    fn test_version_inside_command() {
        let (dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "install", "--version"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 0);
        assert!(matches!(report.outcome, Outcome::Terminated(_)));
        assert!(calls().is_empty());
        assert!(!dir.path().join("system").exists());
    }

    #[test]
    fn test_unknown_command() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "frobnicate"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.prgname, "prog");
        match &report.outcome {
            Outcome::Failed { error, usage } => {
                assert_eq!(error.to_string(), "Unknown command 'frobnicate'");
                let usage = usage.as_deref().unwrap();
                assert!(usage.contains("Builtin Commands:"));
                assert!(usage.contains("install"));
                assert!(!usage.contains("old-install"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(calls().is_empty());
    }

    #[test]
    fn test_no_command() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config).dispatch(&argv(&["prog"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 1);
        assert!(matches!(report.error(), Some(Error::NoCommandSpecified)));
    }

    #[test]
    fn test_no_command_keeps_parse_error() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "--bogus"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 1);
        assert!(matches!(report.error(), Some(Error::OptionParse(detail)) if detail.contains("--bogus")));
    }

    #[test]
    fn test_help_without_command_lists_commands() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "--help"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 0);
        match &report.outcome {
            Outcome::Terminated(termination) => {
                assert!(termination.message.contains("prog [OPTION...] COMMAND"));
                assert!(termination.message.contains("Builtin Commands:"));
                assert!(termination.message.contains("--default-arch"));
            }
            other => panic!("expected help, got {other:?}"),
        }
    }

    #[test]
    fn test_handler_failure() {
        let (_dir, config, registry) = setup_tests();
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "fail"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.prgname, "prog fail");
        match &report.outcome {
            Outcome::Failed { error, usage } => {
                assert!(matches!(error, Error::Handler(_)));
                assert_eq!(error.to_string(), "something went wrong");
                assert!(usage.is_none());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_failure_stops_handler() {
        let (dir, _config, registry) = setup_tests();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let config = Config::new(blocker.join("user"), blocker.join("system"));
        let report = Dispatcher::new(&registry, &config)
            .dispatch(&argv(&["prog", "install", "foo"]), &Cancellable::default());

        assert_eq!(report.exit_code(), 1);
        assert!(matches!(report.error(), Some(Error::DirectorySetup(_))));
        assert!(calls().is_empty());
    }
}
