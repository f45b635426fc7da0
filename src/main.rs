use anyhow::{Context, Result};
use clap::Parser;
use coverpush::cli::{Cli, Commands};
use coverpush::commands::{self, PushConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        command @ Commands::Push { .. } => commands::handle_push(build_push_config(command)?),
        Commands::Merge { profiles, output } => commands::handle_merge(&profiles, output.as_deref()),
        Commands::Init { force } => {
            let dir = std::env::current_dir().context("Failed to get current directory")?;
            commands::init_config(&dir, force)
        }
    }
}

/// `-v` raises the default level; `RUST_LOG` still wins.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn build_push_config(command: Commands) -> Result<PushConfig> {
    if let Commands::Push {
        coverprofile,
        package,
        covermode,
        race,
        test_verbose,
        test_args,
        repo_token,
        service,
        endpoint,
        job_id,
        parallel,
        flag_name,
        ignore,
        strict,
        dry_run,
        config,
    } = command
    {
        Ok(PushConfig {
            work_dir: std::env::current_dir().context("Failed to get current directory")?,
            coverprofiles: coverprofile,
            package,
            covermode: covermode.into(),
            race,
            test_verbose,
            test_args,
            repo_token,
            service,
            endpoint,
            job_id,
            parallel,
            flag_name,
            ignore,
            strict,
            dry_run,
            config,
        })
    } else {
        Err(anyhow::anyhow!("Invalid command"))
    }
}
