use anyhow::{bail, Result};
use clap::Args;
use crate::dir::RefKind;
use crate::dispatch::{Completion, Invocation};
use crate::options::BuiltinFlags;

#[derive(Debug, Args)]
struct ListArgs {
    /// List installed applications
    #[arg(long)]
    app: bool,
    /// List installed runtimes
    #[arg(long)]
    runtime: bool,
    /// Show extra information
    #[arg(short = 'd', long)]
    show_details: bool,
}

pub fn list(invocation: &Invocation<'_>) -> Result<Completion> {
    let context = invocation
        .context("", BuiltinFlags::NO_REPO)
        .group::<ListArgs>("List Options");
    let parsed = parse_or_exit!(context, invocation);
    if !parsed.operands.is_empty() {
        return Err(context.usage_error("Too many arguments").into());
    }
    let args: ListArgs = parsed.get()?;
    let dir = parsed.dir()?;

    let both = !args.app && !args.runtime;
    let mut kinds = Vec::new();
    if args.app || both {
        kinds.push(RefKind::App);
    }
    if args.runtime || both {
        kinds.push(RefKind::Runtime);
    }

    for kind in kinds {
        for deployment in dir.deployed(kind)? {
            if invocation.cancellable.is_cancelled() {
                bail!("Operation was cancelled");
            }
            let short = format!("{}/{}/{}", deployment.id, deployment.arch, deployment.branch);
            match args.show_details {
                true => println!("{}\t{}\t{}", short, kind.as_str(), deployment.path.display()),
                false => println!("{}", short),
            }
        }
    }
    Ok(Completion::Done)
}

pub fn info(invocation: &Invocation<'_>) -> Result<Completion> {
    let context = invocation.context("NAME", BuiltinFlags::NO_REPO);
    let parsed = parse_or_exit!(context, invocation);
    let name = match parsed.operands.as_slice() {
        [name] => name,
        [] => return Err(context.usage_error("NAME must be specified").into()),
        _ => return Err(context.usage_error("Too many arguments").into()),
    };
    let dir = parsed.dir()?;

    let mut found = false;
    for kind in [RefKind::App, RefKind::Runtime] {
        for deployment in dir.deployed(kind)?.into_iter().filter(|d| &d.id == name) {
            println!("Ref: {}", deployment.full_ref());
            println!("Location: {}", deployment.path.display());
            found = true;
        }
    }
    if !found {
        bail!("{} is not installed", name);
    }
    Ok(Completion::Done)
}
