use clap::Parser;

use monitor::MonitorConfig;

#[derive(Parser)]
#[command(name = "brrmon")]
#[command(version = env!("APP_VERSION"))]
#[command(
    about = "Monitors a torrent-acquisition pipeline against throughput and storage budgets",
    long_about = None
)]
struct Cli {
    /// Run a single evaluation cycle and exit
    #[arg(long)]
    once: bool,

    /// Force simulation mode, regardless of SIMULATION_MODE
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = MonitorConfig::from_env()?;
    if cli.simulate {
        config.policy.simulate = true;
    }

    if config.policy.simulate {
        tracing::info!("Simulation mode active: actions will be logged, not applied");
    }

    monitor::run(config, cli.once).await
}
