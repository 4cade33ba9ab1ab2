use anyhow::Context;
use clap::{Parser, Subcommand};

use folio_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "folio", about = "Book catalog service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Print the effective configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => folio_app::run(settings).await,
        Command::Config => {
            tracing::info!(
                env = ?settings.environment,
                store = %settings.store.endpoint,
                base_url = %settings.catalog.public_base_url,
                "effective configuration"
            );
            println!("{settings:#?}");
            Ok(())
        }
    }
}
