use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use secretdrop::cli::{handle_consume, handle_create, handle_sweep, ConsumeArgs, CreateArgs};
use secretdrop::config::{paths::SecretDropPaths, settings::Settings};
use secretdrop::services::SecretService;
use secretdrop::storage::FileSecretStore;

#[derive(Parser)]
#[command(
    name = "secretdrop",
    author = "Kaylee Beyene",
    version,
    about = "One-time, passphrase-protected secrets",
    long_about = "secretdrop stores a short message encrypted under a passphrase \
                  it never keeps. The recipient can read it exactly once, within \
                  ten minutes, using the token and the passphrase."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a new secret
    #[command(alias = "new")]
    Create(CreateArgs),

    /// Read a secret once; it is deleted even if the passphrase is wrong
    #[command(alias = "read")]
    Consume(ConsumeArgs),

    /// Remove expired secrets from storage
    Sweep,

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = SecretDropPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Create(args)) => {
            let service = SecretService::new(FileSecretStore::open(&paths)?, settings)?;
            handle_create(&service, args)?;
        }
        Some(Commands::Consume(args)) => {
            let service = SecretService::new(FileSecretStore::open(&paths)?, settings)?;
            if !handle_consume(&service, args)? {
                std::process::exit(1);
            }
        }
        Some(Commands::Sweep) => {
            let service = SecretService::new(FileSecretStore::open(&paths)?, settings)?;
            handle_sweep(&service)?;
        }
        Some(Commands::Init) => {
            println!("Initializing secretdrop at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
        }
        Some(Commands::Config) => {
            println!("secretdrop Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Secrets file:   {}", paths.secrets_file().display());
            println!(
                "Initialized:    {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
            println!();
            println!("Settings:");
            println!("  KDF iterations:   {}", settings.kdf_iterations);
            println!("  Secret lifetime:  {} seconds", settings.ttl_seconds);
            println!("  Max secret size:  {} bytes", settings.max_secret_bytes);
        }
        None => {
            println!("secretdrop - one-time, passphrase-protected secrets");
            println!();
            println!("Run 'secretdrop --help' for usage information.");
        }
    }

    Ok(())
}
