//! # Application State
//!
//! Core session state for vitrine. Domain data only — presentation state
//! (scroll offsets, hover zones, breadcrumb stacks) lives in the `tui`
//! module.
//!
//! ```text
//! App
//! ├── store: NavStore            // shared navigation holder
//! ├── site_name: String          // brand shown in the chrome
//! ├── status_message: String     // status bar text
//! ├── surface: SurfaceMode       // wide or narrow container
//! ├── active_panel: Option<_>    // cart / account / search exclusivity
//! ├── content_done: bool         // loader finished scanning fragments
//! ├── debug_pin_dropdown: bool   // QA mode: first group pinned open
//! └── error: Option<String>      // fatal content error
//! ```
//!
//! State changes only happen through `update(app, action)` in action.rs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::store::NavStore;

/// Which container currently hosts the navigation (and the cart panel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMode {
    Wide,
    Narrow,
}

/// Requested surface: pin one, or pick by viewport width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfacePreference {
    #[default]
    Auto,
    Wide,
    Narrow,
}

/// The three mutually exclusive auxiliary panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Cart,
    Account,
    Search,
}

impl PanelKind {
    pub fn title(self) -> &'static str {
        match self {
            PanelKind::Cart => "Cart",
            PanelKind::Account => "Account",
            PanelKind::Search => "Search",
        }
    }
}

pub struct App {
    pub store: NavStore,
    pub site_name: String,
    pub status_message: String,
    pub surface: SurfaceMode,
    pub surface_preference: SurfacePreference,
    active_panel: Option<PanelKind>,
    /// True once the content loader has sent every fragment it found.
    pub content_done: bool,
    pub debug_pin_dropdown: bool,
    pub error: Option<String>,
}

impl App {
    pub fn new(site_name: String) -> Self {
        Self {
            store: NavStore::new(),
            site_name,
            status_message: String::from("Loading navigation..."),
            surface: SurfaceMode::Wide,
            surface_preference: SurfacePreference::Auto,
            active_panel: None,
            content_done: false,
            debug_pin_dropdown: false,
            error: None,
        }
    }

    pub fn active_panel(&self) -> Option<PanelKind> {
        self.active_panel
    }

    /// The single mutation point for panel state. Opening one panel closes
    /// the others in the same call (close-then-open on one thread), so
    /// exclusivity never depends on three independently toggled flags.
    pub fn set_active_panel(&mut self, panel: Option<PanelKind>) {
        self.active_panel = panel;
    }

    /// Toggle semantics: re-requesting the open panel closes it.
    pub fn toggle_panel(&mut self, panel: PanelKind) {
        if self.active_panel == Some(panel) {
            self.set_active_panel(None);
        } else {
            self.set_active_panel(Some(panel));
        }
    }

    /// Effective surface for a viewport width, honoring a pinned preference.
    pub fn surface_for_width(&self, width: u16, breakpoint: u16) -> SurfaceMode {
        match self.surface_preference {
            SurfacePreference::Wide => SurfaceMode::Wide,
            SurfacePreference::Narrow => SurfaceMode::Narrow,
            SurfacePreference::Auto => {
                if width >= breakpoint {
                    SurfaceMode::Wide
                } else {
                    SurfaceMode::Narrow
                }
            }
        }
    }
}
