use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "evc")]
#[command(about = "Event verification: reconcile observed event streams against a master log", long_about = None)]
struct Cli {
    /// Also write logs to this file (no ANSI colors)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile candidate captures against a master file
    Check {
        /// Master event file (one event per line)
        #[arg(long)]
        master: PathBuf,

        /// Plain capture file; repeat once per target
        #[arg(long = "candidate")]
        candidates: Vec<PathBuf>,

        /// Tar archive holding a capture; repeat once per target
        #[arg(long = "archive")]
        archives: Vec<PathBuf>,

        /// Member to read from every --archive
        #[arg(long, default_value = "events.log")]
        member: String,

        /// Print the report as JSON instead of the summary table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Config-driven run: reconcile, write the run record, bundle artifacts
    Run {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Directory relative config paths resolve against (default: first config's dir)
        #[arg(long)]
        base: Option<PathBuf>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Pack an artifacts directory into <reports>/<name>.tar.gz
    Bundle {
        #[arg(long)]
        artifacts: PathBuf,

        #[arg(long)]
        reports: PathBuf,
    },
}

fn main() -> Result<()> {
    // Dev convenience: load .env.local if present. Missing file is fine.
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();
    commands::init_tracing(cli.log_file.as_deref())?;

    match cli.cmd {
        Commands::Check {
            master,
            candidates,
            archives,
            member,
            json,
        } => commands::check::check(&master, &candidates, &archives, &member, json),

        Commands::Run { config_paths, base } => commands::run::run(&config_paths, base),

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = evc_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
            Ok(())
        }

        Commands::Bundle { artifacts, reports } => {
            let out = evc_artifacts::bundle_tar_gz(&artifacts, &reports)?;
            println!("bundle={}", out.display());
            Ok(())
        }
    }
}
