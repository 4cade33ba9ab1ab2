use anyhow::Context;
use folio_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        store = %settings.store.endpoint,
        base_url = %settings.catalog.public_base_url,
        "folio-app bootstrap starting"
    );

    folio_app::run(settings).await
}
