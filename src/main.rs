use clap::Parser;
use kol_agent::cli::{print_config, Cli, Commands};
use kol_agent::config::{Config, Credentials};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already carry everything
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let mut config = if std::path::Path::new(&cli.config).exists() {
        Config::load(&cli.config)?
    } else {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
        Config::default()
    };
    config.apply_env()?;

    let credentials = Credentials::from_env();

    if let Commands::Config = cli.command {
        print_config(&config, &credentials);
        return Ok(());
    }

    // Initialize telemetry
    kol_agent::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting webhook server mode");
            args.execute(config, &credentials).await?;
        }
        Commands::Trigger(args) => {
            tracing::info!(mint = %args.mint, "Triggering single pipeline run");
            args.execute(config, &credentials).await?;
        }
        Commands::Config => {}
    }

    Ok(())
}
