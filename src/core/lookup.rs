//! Read projections over the store's current tree.
//!
//! These are the lookups the surfaces (and external collaborators) consume.
//! All are recomputed per call — the store itself is the only cache — so a
//! caller always sees the latest linked tree.
//!
//! Lookups key on slugs. Two labels that slugify identically are the same
//! id here; the first match wins. Authored content is assumed unique per
//! level, so the collision is accepted rather than disambiguated.

use std::sync::Arc;

use crate::core::nav::{Level3Data, NavChild, NavEntry, NavTree, slugify};
use crate::core::store::NavStore;

/// The wide surface's view: the whole tree, logo included.
pub fn desktop_nav_data(store: &NavStore) -> Option<Arc<NavTree>> {
    store.tree()
}

/// The narrow surface's root list. The drill-down re-fetches this on every
/// return to the top so it always reflects the latest linked tree.
pub fn mobile_nav_data(store: &NavStore) -> Vec<NavEntry> {
    store
        .tree()
        .map(|tree| tree.entries.clone())
        .unwrap_or_default()
}

/// Categories (children) of the first group whose slug matches `group_id`.
pub fn categories_from_nav_data(store: &NavStore, group_id: &str) -> Vec<NavChild> {
    let Some(tree) = store.tree() else {
        return Vec::new();
    };
    tree.entries
        .iter()
        .find_map(|entry| match entry {
            NavEntry::Group { children, .. } if entry.slug() == group_id => {
                Some(children.clone())
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// Resolved third-level content for a category inside a group, if the
/// linking pass has populated it.
pub fn third_level_content_data(
    store: &NavStore,
    group_id: &str,
    category_id: &str,
) -> Option<Level3Data> {
    categories_from_nav_data(store, group_id)
        .into_iter()
        .find(|child| slugify(&child.title) == category_id)
        .and_then(|child| child.third_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::Level3Item;

    fn store_with_tree() -> NavStore {
        let mut store = NavStore::new();
        store.set_tree(NavTree {
            logo: None,
            entries: vec![
                NavEntry::Leaf {
                    label: "Sale".to_string(),
                    href: "/sale".to_string(),
                    source: String::new(),
                },
                NavEntry::Group {
                    label: "Women".to_string(),
                    source: String::new(),
                    children: vec![
                        NavChild {
                            title: "Dresses".to_string(),
                            href: "/women/dresses".to_string(),
                            source: String::new(),
                            third_level_ids: vec![],
                            third_level: Some(Level3Data {
                                id: "summer-dresses".to_string(),
                                items: vec![Level3Item::Header {
                                    source: "banner".to_string(),
                                }],
                            }),
                        },
                        NavChild {
                            title: "Shoes".to_string(),
                            href: "/women/shoes".to_string(),
                            source: String::new(),
                            third_level_ids: vec![],
                            third_level: None,
                        },
                    ],
                },
            ],
        });
        store
    }

    #[test]
    fn mobile_root_list_tracks_store() {
        let mut store = store_with_tree();
        assert_eq!(mobile_nav_data(&store).len(), 2);
        store.reset();
        assert!(mobile_nav_data(&store).is_empty());
    }

    #[test]
    fn categories_found_by_group_slug() {
        let store = store_with_tree();
        let cats = categories_from_nav_data(&store, "women");
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].title, "Dresses");
        assert!(categories_from_nav_data(&store, "sale").is_empty());
        assert!(categories_from_nav_data(&store, "unknown").is_empty());
    }

    #[test]
    fn third_level_content_requires_linked_data() {
        let store = store_with_tree();
        assert!(third_level_content_data(&store, "women", "dresses").is_some());
        assert!(third_level_content_data(&store, "women", "shoes").is_none());
        assert!(third_level_content_data(&store, "men", "dresses").is_none());
    }
}
