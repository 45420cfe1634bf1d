//! # TUI Components
//!
//! All UI components for the two navigation surfaces.
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `MobileHeader`: narrow-surface bar mirroring the drill-down level
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit typed events:
//! - `TopBarState`/`TopBar`: wide root with the dropdown state machine
//! - `DropdownState`/`Dropdown`: mega-menu body (category sidebar)
//! - `DrillDownState`/`DrillDown`: narrow breadcrumb stack
//! - `LeafContentState`/`LeafContent`: shared grouped-run renderer
//! - `SearchBox`: lazily mounted search slot
//! - `PanelView`: cart / account / search overlays
//!
//! Stateful components use the persistent state + transient wrapper
//! pattern: the `*State` struct lives in `TuiState` for as long as the
//! surface needs it, and the wrapper is created each frame with borrowed
//! state. The two surfaces never reference each other — they communicate
//! only through the store and the typed events the run loop routes.

pub mod drill_down;
pub mod dropdown;
pub mod leaf_content;
pub mod mobile_header;
pub mod panels;
pub mod search_box;
pub mod top_bar;

pub use drill_down::{DrillDown, DrillDownState, DrillEvent};
pub use dropdown::{Dropdown, DropdownEvent, DropdownState};
pub use leaf_content::{LeafContent, LeafContentState};
pub use mobile_header::MobileHeader;
pub use panels::PanelView;
pub use search_box::{SearchBox, SearchEvent};
pub use top_bar::{TopBar, TopBarEvent, TopBarState};
