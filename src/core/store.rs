//! # Navigation Store
//!
//! Single shared holder of the navigation tree and the flat third-level
//! list. Constructed once per session and passed by reference to every
//! consumer — both surfaces read from it and never talk to each other.
//!
//! Lifecycle: the tree is replace-only, the third-level list is
//! append-only, and `reset()` clears everything (test-only). The linking
//! pass runs after every append and is idempotent.

use std::sync::Arc;

use log::{debug, warn};

use crate::core::nav::{Level3Data, NavEntry, NavTree, slugify};

/// Notification sent to subscribers on every mutating call.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    TreeReplaced,
    /// Carries the appended fragment's id.
    Level3Added(String),
    /// A linking pass ran; `resolved` counts newly matched categories.
    Linked { resolved: usize },
    Reset,
}

/// A subscriber returning `Err` is logged and skipped; the remaining
/// subscribers are still notified.
pub type Subscriber = Box<dyn FnMut(&StoreEvent) -> Result<(), String>>;

#[derive(Default)]
pub struct NavStore {
    tree: Option<Arc<NavTree>>,
    level3: Vec<Level3Data>,
    subscribers: Vec<(String, Subscriber)>,
}

impl NavStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tree snapshot. Holders of a previous `Arc` keep a consistent
    /// (if stale) structure across linking passes.
    pub fn tree(&self) -> Option<Arc<NavTree>> {
        self.tree.clone()
    }

    pub fn set_tree(&mut self, tree: NavTree) {
        self.tree = Some(Arc::new(tree));
        self.notify(&StoreEvent::TreeReplaced);
    }

    /// Append-only; fragments are never removed or deduplicated.
    pub fn add_level3(&mut self, data: Level3Data) {
        let id = data.id.clone();
        self.level3.push(data);
        self.notify(&StoreEvent::Level3Added(id));
    }

    /// First fragment matching `id`, or none.
    pub fn find_level3_by_id(&self, id: &str) -> Option<&Level3Data> {
        self.level3.iter().find(|d| d.id == id)
    }

    /// The linking pass: for every category with pending third-level ids,
    /// resolve the **first** id that currently matches a known fragment,
    /// populate the category's content, and remove only that id — sibling
    /// ids stay reserved for future passes.
    ///
    /// Builds a new tree object graph so consumers holding a previous
    /// snapshot never observe a half-updated structure. Re-running with no
    /// new matches is a no-op.
    pub fn link(&mut self) {
        let Some(current) = self.tree.clone() else {
            self.notify(&StoreEvent::Linked { resolved: 0 });
            return;
        };

        let mut next: NavTree = (*current).clone();
        let mut resolved = 0usize;

        for entry in &mut next.entries {
            let NavEntry::Group { children, .. } = entry else {
                continue;
            };
            for child in children {
                if child.third_level_ids.is_empty() {
                    continue;
                }
                let hit = child
                    .third_level_ids
                    .iter()
                    .position(|raw| self.find_level3_by_id(&slugify(raw)).is_some());
                if let Some(idx) = hit {
                    let raw = child.third_level_ids.remove(idx);
                    child.third_level = self.find_level3_by_id(&slugify(&raw)).cloned();
                    resolved += 1;
                    debug!("linked third-level '{}' into '{}'", raw, child.title);
                }
            }
        }

        if resolved > 0 {
            self.tree = Some(Arc::new(next));
        }
        self.notify(&StoreEvent::Linked { resolved });
    }

    /// Clears the whole store. Test-only by contract: production code never
    /// deletes entries or mutates sub-parts.
    pub fn reset(&mut self) {
        self.tree = None;
        self.level3.clear();
        self.notify(&StoreEvent::Reset);
    }

    pub fn subscribe(&mut self, name: impl Into<String>, subscriber: Subscriber) {
        self.subscribers.push((name.into(), subscriber));
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (name, subscriber) in &mut self.subscribers {
            if let Err(e) = subscriber(event) {
                warn!("store subscriber '{}' failed on {:?}: {}", name, event, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::{Level3Item, NavChild};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn child(title: &str, ids: &[&str]) -> NavChild {
        NavChild {
            title: title.to_string(),
            href: format!("/{}", slugify(title)),
            source: String::new(),
            third_level_ids: ids.iter().map(|s| s.to_string()).collect(),
            third_level: None,
        }
    }

    fn tree_with(children: Vec<NavChild>) -> NavTree {
        NavTree {
            logo: None,
            entries: vec![NavEntry::Group {
                label: "Women".to_string(),
                source: String::new(),
                children,
            }],
        }
    }

    fn fragment(id: &str) -> Level3Data {
        Level3Data {
            id: id.to_string(),
            items: vec![Level3Item::Header {
                source: format!("banner for {id}"),
            }],
        }
    }

    fn first_child(tree: &NavTree) -> &NavChild {
        let NavEntry::Group { children, .. } = &tree.entries[0] else {
            panic!("expected group");
        };
        &children[0]
    }

    #[test]
    fn link_resolves_first_matching_id_and_consumes_it() {
        let mut store = NavStore::new();
        store.set_tree(tree_with(vec![child("Dresses", &["missing", "summer-dresses", "also-there"])]));
        store.add_level3(fragment("summer-dresses"));
        store.add_level3(fragment("also-there"));
        store.link();

        let tree = store.tree().unwrap();
        let c = first_child(&tree);
        assert_eq!(c.third_level.as_ref().unwrap().id, "summer-dresses");
        // The matched id is consumed; the unmatched and the unused stay.
        assert_eq!(c.third_level_ids, vec!["missing", "also-there"]);
    }

    #[test]
    fn link_is_idempotent() {
        let mut store = NavStore::new();
        store.set_tree(tree_with(vec![child("Dresses", &["summer-dresses"])]));
        store.add_level3(fragment("summer-dresses"));
        store.link();
        let after_first = store.tree().unwrap();
        store.link();
        let after_second = store.tree().unwrap();
        assert_eq!(*after_first, *after_second);
    }

    #[test]
    fn link_before_fragments_leaves_ids_pending() {
        let mut store = NavStore::new();
        store.set_tree(tree_with(vec![child("Dresses", &["summer-dresses"])]));
        store.link();
        let tree = store.tree().unwrap();
        assert!(first_child(&tree).third_level.is_none());
        assert_eq!(first_child(&tree).third_level_ids, vec!["summer-dresses"]);

        // A later pass picks the fragment up.
        store.add_level3(fragment("summer-dresses"));
        store.link();
        let tree = store.tree().unwrap();
        assert!(first_child(&tree).third_level.is_some());
        assert!(first_child(&tree).third_level_ids.is_empty());
    }

    #[test]
    fn link_produces_new_tree_object_graph() {
        let mut store = NavStore::new();
        store.set_tree(tree_with(vec![child("Dresses", &["summer-dresses"])]));
        let before = store.tree().unwrap();
        store.add_level3(fragment("summer-dresses"));
        store.link();
        // The old snapshot is untouched.
        assert!(first_child(&before).third_level.is_none());
        assert!(first_child(&store.tree().unwrap()).third_level.is_some());
    }

    #[test]
    fn link_matches_raw_ids_by_slug() {
        let mut store = NavStore::new();
        store.set_tree(tree_with(vec![child("Dresses", &["Summer Dresses"])]));
        store.add_level3(fragment("summer-dresses"));
        store.link();
        let tree = store.tree().unwrap();
        assert!(first_child(&tree).third_level.is_some());
    }

    #[test]
    fn subscribers_notified_with_event_types() {
        let seen: Rc<RefCell<Vec<StoreEvent>>> = Rc::default();
        let sink = seen.clone();
        let mut store = NavStore::new();
        store.subscribe("recorder", Box::new(move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        }));

        store.set_tree(NavTree::default());
        store.add_level3(fragment("a"));
        store.link();
        store.reset();

        let events = seen.borrow();
        assert_eq!(events[0], StoreEvent::TreeReplaced);
        assert_eq!(events[1], StoreEvent::Level3Added("a".to_string()));
        assert_eq!(events[2], StoreEvent::Linked { resolved: 0 });
        assert_eq!(events[3], StoreEvent::Reset);
    }

    #[test]
    fn failing_subscriber_does_not_starve_others() {
        let seen: Rc<RefCell<usize>> = Rc::default();
        let sink = seen.clone();
        let mut store = NavStore::new();
        store.subscribe("broken", Box::new(|_| Err("boom".to_string())));
        store.subscribe("counter", Box::new(move |_| {
            *sink.borrow_mut() += 1;
            Ok(())
        }));

        store.set_tree(NavTree::default());
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = NavStore::new();
        store.set_tree(NavTree::default());
        store.add_level3(fragment("a"));
        store.reset();
        assert!(store.tree().is_none());
        assert!(store.find_level3_by_id("a").is_none());
    }
}
