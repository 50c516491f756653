use std::path::PathBuf;

use clap::Parser;
use patient_extractor::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "patient-extractor",
    version,
    about = "Turn doctor-patient conversation transcripts into structured patient records"
)]
struct Cli {
    /// TOML config file. Defaults to ./extractor.toml when present.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    patient_extractor::init_tracing();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    patient_extractor::run(config)
}
