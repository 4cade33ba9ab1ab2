pub mod books;

use folio_kernel::ModuleRegistry;

use books::state::CatalogState;

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: CatalogState) {
    registry.register(books::create_module(state));
}
