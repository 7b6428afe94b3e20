use anyhow::Result;
use clap::Args;
use tracing::info;
use crate::dispatch::{Completion, Invocation};
use crate::options::BuiltinFlags;
use crate::repo::Remote;

#[derive(Debug, Args)]
struct RemoteAddArgs {
    /// Do nothing if the provided remote exists
    #[arg(long)]
    if_not_exists: bool,
    /// Disable GPG verification
    #[arg(long)]
    no_gpg_verify: bool,
    /// Mark the remote as don't enumerate
    #[arg(long)]
    no_enumerate: bool,
    /// A nice name to use for this remote
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,
}

#[derive(Debug, Args)]
struct RemoteModifyArgs {
    /// Set a new url
    #[arg(long, value_name = "URL")]
    url: Option<String>,
    /// A nice name to use for this remote
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,
    /// Enable GPG verification
    #[arg(long, conflicts_with = "no_gpg_verify")]
    gpg_verify: bool,
    /// Disable GPG verification
    #[arg(long)]
    no_gpg_verify: bool,
    /// Mark the remote as enumerate
    #[arg(long, conflicts_with = "no_enumerate")]
    enumerate: bool,
    /// Mark the remote as don't enumerate
    #[arg(long)]
    no_enumerate: bool,
}

#[derive(Debug, Args)]
struct RemoteListArgs {
    /// Show remote details
    #[arg(short = 'd', long)]
    show_details: bool,
}

pub fn remote_add(invocation: &Invocation<'_>) -> Result<Completion> {
    let context = invocation
        .context("NAME LOCATION", BuiltinFlags::NONE)
        .group::<RemoteAddArgs>("Remote Options");
    let parsed = parse_or_exit!(context, invocation);
    let (name, url) = match parsed.operands.as_slice() {
        [name, url] => (name, url),
        [_, _, ..] => return Err(context.usage_error("Too many arguments").into()),
        _ => return Err(context.usage_error("NAME and LOCATION must be specified").into()),
    };
    let args: RemoteAddArgs = parsed.get()?;
    let dir = parsed.dir()?;

    let mut config = dir.load_repo_config()?;
    if args.if_not_exists && config.remotes.contains_key(name.as_str()) {
        return Ok(Completion::Done);
    }
    config.add_remote(name, Remote {
        url: url.clone(),
        title: args.title,
        gpg_verify: !args.no_gpg_verify,
        no_enumerate: args.no_enumerate,
    })?;
    dir.save_repo_config(&config)?;
    info!("Added remote {} ({} installation)", name, dir.scope());
    Ok(Completion::Done)
}

pub fn remote_modify(invocation: &Invocation<'_>) -> Result<Completion> {
    let context = invocation
        .context("NAME", BuiltinFlags::NONE)
        .group::<RemoteModifyArgs>("Remote Options");
    let parsed = parse_or_exit!(context, invocation);
    let name = match parsed.operands.as_slice() {
        [name] => name,
        [] => return Err(context.usage_error("Remote NAME must be specified").into()),
        _ => return Err(context.usage_error("Too many arguments").into()),
    };
    let args: RemoteModifyArgs = parsed.get()?;
    let dir = parsed.dir()?;

    let mut config = dir.load_repo_config()?;
    let remote = config.remote_mut(name)?;
    if let Some(url) = args.url {
        remote.url = url;
    }
    if let Some(title) = args.title {
        remote.title = Some(title);
    }
    if args.gpg_verify {
        remote.gpg_verify = true;
    }
    if args.no_gpg_verify {
        remote.gpg_verify = false;
    }
    if args.enumerate {
        remote.no_enumerate = false;
    }
    if args.no_enumerate {
        remote.no_enumerate = true;
    }
    dir.save_repo_config(&config)?;
    Ok(Completion::Done)
}

pub fn remote_delete(invocation: &Invocation<'_>) -> Result<Completion> {
    let context = invocation.context("NAME", BuiltinFlags::NONE);
    let parsed = parse_or_exit!(context, invocation);
    let name = match parsed.operands.as_slice() {
        [name] => name,
        [] => return Err(context.usage_error("NAME must be specified").into()),
        _ => return Err(context.usage_error("Too many arguments").into()),
    };
    let dir = parsed.dir()?;

    let mut config = dir.load_repo_config()?;
    config.remove_remote(name)?;
    dir.save_repo_config(&config)?;
    info!("Deleted remote {}", name);
    Ok(Completion::Done)
}

pub fn remote_list(invocation: &Invocation<'_>) -> Result<Completion> {
    let context = invocation
        .context("", BuiltinFlags::NONE)
        .group::<RemoteListArgs>("List Options");
    let parsed = parse_or_exit!(context, invocation);
    if !parsed.operands.is_empty() {
        return Err(context.usage_error("Too many arguments").into());
    }
    let args: RemoteListArgs = parsed.get()?;
    let dir = parsed.dir()?;

    let config = dir.load_repo_config()?;
    for (name, remote) in &config.remotes {
        match args.show_details {
            true => {
                let title = remote.title.as_deref().unwrap_or("-");
                let mut flags = Vec::new();
                if !remote.gpg_verify {
                    flags.push("no-gpg-verify");
                }
                if remote.no_enumerate {
                    flags.push("no-enumerate");
                }
                println!("{}\t{}\t{}\t{}", name, title, remote.url, flags.join(","));
            }
            false => println!("{}", name),
        }
    }
    Ok(Completion::Done)
}
