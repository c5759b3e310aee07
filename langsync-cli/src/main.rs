use clap::{Parser, Subcommand};
use langsync_cli::{SyncOptions, run_check_command, run_sync_command, run_targets_command};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a source strings file can be synchronized.
    Check {
        /// The source file, e.g. res/values/strings.xml
        source: String,
    },

    /// List the locale files next to a source file.
    Targets {
        /// The source file, e.g. res/values/strings.xml
        source: String,

        /// Optional TOML configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Propagate the layout of a source file to its locale files.
    Sync {
        /// The source file, e.g. res/values/strings.xml
        source: String,

        /// Target files to update (default: every values-xx sibling)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Optional TOML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// List the targets without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("langsync=debug,langsync_cli=debug")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Check { source } => run_check_command(&source),
        Commands::Targets { source, config } => run_targets_command(&source, config.as_deref()),
        Commands::Sync {
            source,
            targets,
            config,
            dry_run,
        } => run_sync_command(SyncOptions {
            source,
            targets,
            config,
            dry_run,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
