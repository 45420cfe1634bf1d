//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::extract::{build_level3_data, build_nav_tree};
use crate::core::state::App;
use crate::core::store::NavStore;

/// A small but representative authored nav document.
pub const SAMPLE_NAV: &str = "\
# Maison Demo

- [Sale](/sale)
- Women
  - [Dresses](/women/dresses \"All Dresses\")
    - summer-dresses
  - [Shoes](/women/shoes)
- Men
  - [Shirts](/men/shirts)
- [Stores](/stores)
";

/// A fragment matching the `summer-dresses` reference above.
pub const SAMPLE_FRAGMENT: &str = "\
summer-dresses

- **New in: the summer edit**
- Wrap dresses
  [Shop](/women/dresses/wrap)
  Breezy prints for warm evenings
- Linen midi
  [Shop](/women/dresses/linen)
  Garment-dyed European linen
  From $120
";

/// A store populated with the sample tree and fragment, fully linked.
pub fn linked_store() -> NavStore {
    let mut store = NavStore::new();
    store.set_tree(build_nav_tree(SAMPLE_NAV));
    if let Some(data) = build_level3_data(SAMPLE_FRAGMENT) {
        store.add_level3(data);
    }
    store.link();
    store
}

/// Creates a test App over the linked sample store.
pub fn test_app() -> App {
    let mut app = App::new("Maison Demo".to_string());
    app.store = linked_store();
    app
}
