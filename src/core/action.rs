//! # Actions
//!
//! Everything that happens to the core session becomes an `Action`.
//! The content loader parses the nav document? That's `Action::TreeReady`.
//! A fragment file arrives? That's `Action::FragmentParsed`.
//!
//! The `update()` function takes the current state and an action and
//! mutates the state. No I/O here — loading, timers, and rendering live in
//! the TUI adapter, which acts on the returned `Effect`.
//!
//! ```text
//! State + Action  →  update()  →  New State (+ Effect)
//! ```
//!
//! This keeps the data pipeline testable without a terminal: feed actions,
//! assert on the store.

use log::{info, warn};

use crate::core::nav::{Level3Data, NavTree};
use crate::core::state::{App, PanelKind, SurfaceMode};

#[derive(Debug)]
pub enum Action {
    /// The nav document was parsed. Replaces the tree and runs a linking
    /// pass in case fragments arrived first.
    TreeReady(NavTree),
    /// One third-level fragment was parsed. Appended to the store; the
    /// linking pass re-runs after every append.
    FragmentParsed(Level3Data),
    /// The loader finished scanning; `count` fragments were found.
    ContentDone { count: usize },
    /// A content file could not be read or parsed.
    ContentError(String),
    /// Debounced viewport change settled on a surface.
    SurfaceChanged(SurfaceMode),
    /// Cart / account / search toggle.
    TogglePanel(PanelKind),
    CloseAllPanels,
    Quit,
}

/// What the TUI adapter must do after an update.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The tree just arrived; the adapter may pin the debug dropdown.
    TreeLoaded,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::TreeReady(tree) => {
            let entries = tree.entries.len();
            app.store.set_tree(tree);
            app.store.link();
            app.status_message = format!("{entries} top-level entries");
            info!("navigation tree ready ({entries} entries)");
            Effect::TreeLoaded
        }
        Action::FragmentParsed(data) => {
            app.store.add_level3(data);
            app.store.link();
            Effect::None
        }
        Action::ContentDone { count } => {
            app.content_done = true;
            app.status_message = format!("{count} fragments loaded");
            Effect::None
        }
        Action::ContentError(message) => {
            warn!("content error: {message}");
            app.status_message = message;
            Effect::None
        }
        Action::SurfaceChanged(surface) => {
            app.surface = surface;
            // The shared cart panel follows the surface; everything else
            // closes rather than relocating mid-interaction.
            if app.active_panel() != Some(PanelKind::Cart) {
                app.set_active_panel(None);
            }
            Effect::None
        }
        Action::TogglePanel(panel) => {
            app.toggle_panel(panel);
            Effect::None
        }
        Action::CloseAllPanels => {
            app.set_active_panel(None);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::{Level3Item, NavChild, NavEntry};

    fn tree_with_pending_child() -> NavTree {
        NavTree {
            logo: None,
            entries: vec![NavEntry::Group {
                label: "Women".to_string(),
                source: String::new(),
                children: vec![NavChild {
                    title: "Dresses".to_string(),
                    href: "/women/dresses".to_string(),
                    source: String::new(),
                    third_level_ids: vec!["summer-dresses".to_string()],
                    third_level: None,
                }],
            }],
        }
    }

    fn fragment() -> Level3Data {
        Level3Data {
            id: "summer-dresses".to_string(),
            items: vec![Level3Item::Header {
                source: "banner".to_string(),
            }],
        }
    }

    #[test]
    fn fragment_arriving_after_tree_gets_linked() {
        let mut app = App::new("x".to_string());
        update(&mut app, Action::TreeReady(tree_with_pending_child()));
        update(&mut app, Action::FragmentParsed(fragment()));

        let tree = app.store.tree().unwrap();
        let NavEntry::Group { children, .. } = &tree.entries[0] else {
            panic!("expected group");
        };
        assert!(children[0].third_level.is_some());
    }

    #[test]
    fn fragment_arriving_before_tree_gets_linked() {
        let mut app = App::new("x".to_string());
        update(&mut app, Action::FragmentParsed(fragment()));
        update(&mut app, Action::TreeReady(tree_with_pending_child()));

        let tree = app.store.tree().unwrap();
        let NavEntry::Group { children, .. } = &tree.entries[0] else {
            panic!("expected group");
        };
        assert!(children[0].third_level.is_some());
    }

    #[test]
    fn content_done_flips_flag_and_status() {
        let mut app = App::new("x".to_string());
        update(&mut app, Action::ContentDone { count: 3 });
        assert!(app.content_done);
        assert_eq!(app.status_message, "3 fragments loaded");
    }

    #[test]
    fn surface_change_keeps_cart_open_but_closes_other_panels() {
        let mut app = App::new("x".to_string());
        update(&mut app, Action::TogglePanel(PanelKind::Cart));
        update(&mut app, Action::SurfaceChanged(SurfaceMode::Narrow));
        assert_eq!(app.active_panel(), Some(PanelKind::Cart));

        update(&mut app, Action::TogglePanel(PanelKind::Search));
        update(&mut app, Action::SurfaceChanged(SurfaceMode::Wide));
        assert_eq!(app.active_panel(), None);
    }

    #[test]
    fn tree_ready_returns_tree_loaded_effect() {
        let mut app = App::new("x".to_string());
        assert_eq!(
            update(&mut app, Action::TreeReady(tree_with_pending_child())),
            Effect::TreeLoaded
        );
    }

    #[test]
    fn quit_returns_quit_effect() {
        let mut app = App::new("x".to_string());
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
