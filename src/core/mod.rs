//! # Core Navigation Logic
//!
//! This module contains vitrine's domain logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • extract (markup→tree)│
//!                    │  • store (holder+link)  │
//!                    │  • lookup (projections) │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │ Wide (TUI) │      │Narrow (TUI)│      │ JSON dump  │
//!     │ mega-menu  │      │ drill-down │      │ (--dump)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`nav`]: the data model — tree, entries, third-level content, slugs
//! - [`extract`]: authored markup → navigation data
//! - [`store`]: the single shared holder with linking pass and pub/sub
//! - [`grouping`]: run-grouping of third-level content
//! - [`lookup`]: read projections consumed by the surfaces
//! - [`action`]: the `Action` enum + `update()` reducer
//! - [`state`]: the `App` struct — session state in one place
//! - [`config`]: `~/.vitrine/config.toml` resolution

pub mod action;
pub mod config;
pub mod extract;
pub mod grouping;
pub mod lookup;
pub mod nav;
pub mod state;
pub mod store;
