//! folio Application Library
//!
//! This library provides the catalog modules, utilities, and the service
//! bootstrap shared by the `folio-app` and `folio-cli` binaries.

use std::sync::Arc;

use folio_kernel::settings::Settings;
use folio_kernel::{InitCtx, ModuleRegistry};
use folio_store::{BookStore, MemoryStore};

pub mod modules;
pub mod utils;

use modules::books::state::CatalogState;

/// Construct the catalog state, register all modules, and serve until the
/// HTTP listener stops.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store: Arc<dyn BookStore> = Arc::new(MemoryStore::new());
    let state = CatalogState::new(store, &settings.catalog.public_base_url);

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, state);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    folio_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
