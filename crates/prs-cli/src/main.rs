use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "prs")]
#[command(about = "Portfolio risk & signal dashboard CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> local)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Classify positions against the configured limits
    Evaluate {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// JSON array of positions ({ticker, assetType, allocation, score?, signal?})
        #[arg(long)]
        positions: String,

        /// Override the configured regime (RISK_ON | RISK_OFF)
        #[arg(long)]
        regime: Option<String>,

        /// Print the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Fail on config keys nothing reads (default: warn)
        #[arg(long = "strict-keys", default_value_t = false)]
        strict_keys: bool,
    },

    /// Map a model score in [0, 100] to a signal label
    Signal {
        #[arg(long, allow_negative_numbers = true)]
        score: f64,
    },

    /// One-time onboarding flag
    Onboarding {
        #[command(subcommand)]
        cmd: OnboardingCmd,
    },
}

#[derive(Subcommand)]
enum OnboardingCmd {
    /// Print whether onboarding has been completed
    Status {
        #[command(flatten)]
        store: commands::onboarding::StoreArgs,
    },

    /// Record onboarding as completed (idempotent)
    Complete {
        #[command(flatten)]
        store: commands::onboarding::StoreArgs,
    },
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent if missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = prs_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Evaluate {
            config_paths,
            positions,
            regime,
            json,
            strict_keys,
        } => {
            commands::evaluate::run(commands::evaluate::EvaluateArgs {
                config_paths: &config_paths,
                positions_path: &positions,
                regime: regime.as_deref(),
                json,
                strict_keys,
            })?;
        }

        Commands::Signal { score } => {
            let label = prs_engine::classify_signal(score)?;
            println!("signal={}", label);
        }

        Commands::Onboarding { cmd } => match cmd {
            OnboardingCmd::Status { store } => {
                let store = store.open()?;
                println!("onboarded={}", store.has_completed_onboarding()?);
            }
            OnboardingCmd::Complete { store } => {
                let store = store.open()?;
                store.mark_completed()?;
                println!("onboarded=true");
            }
        },
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
