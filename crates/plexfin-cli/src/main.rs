use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{clear, config, migrate};
use plexfin_config::MatchMode;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "plexfin")]
#[command(about = "Migrate watched state from a Plex server to a Jellyfin server")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatchModeArg {
    /// Match on external provider ids extracted from agent GUIDs
    Provider,
    /// Match on media file paths, after --path-map translation
    Path,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Provider => MatchMode::Provider,
            MatchModeArg::Path => MatchMode::Path,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate watched state from Plex to Jellyfin
    #[command(long_about = "Enumerate watched movies and episodes in the configured Plex libraries, match them against the Jellyfin library, and mark the unwatched matches as played. Safe to re-run: items already watched on Jellyfin are skipped.")]
    Migrate {
        /// Report what would be marked without issuing any changes
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,

        /// Reconcile against the last cached server snapshots instead of fetching
        #[arg(long, action = ArgAction::SetTrue)]
        use_cache: bool,

        /// Abort when a watched Plex item yields no usable identity
        #[arg(long, action = ArgAction::SetTrue)]
        strict: bool,

        /// Skip TLS certificate verification for both servers
        #[arg(long, action = ArgAction::SetTrue)]
        insecure: bool,

        /// How Plex items are correlated with Jellyfin entries
        #[arg(long, value_enum)]
        match_mode: Option<MatchModeArg>,

        /// Plex library to migrate, repeatable; overrides the configured
        /// movie/show library lists (the section kind is discovered)
        #[arg(long, value_name = "NAME", action = ArgAction::Append)]
        library: Vec<String>,

        /// Path translation rule SOURCE:DEST, repeatable; rules apply in the
        /// order given, after any rules from the config file
        #[arg(long, value_name = "SOURCE:DEST", action = ArgAction::Append)]
        path_map: Vec<String>,
    },
    /// Show the active configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear cached data
    Clear {
        /// Clear cached Plex/Jellyfin snapshots
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Migrate {
            dry_run,
            use_cache,
            strict,
            insecure,
            match_mode,
            library,
            path_map,
        } => {
            migrate::run_migrate(
                dry_run,
                use_cache,
                strict,
                insecure,
                match_mode.map(MatchMode::from),
                library,
                path_map,
                &output,
            )
            .await
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config::run_show(&output).await,
        },
        Commands::Clear { cache } => clear::run_clear(cache, &output).await,
    }
}
