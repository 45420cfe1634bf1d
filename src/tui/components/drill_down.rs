//! # Drill-Down Menu (narrow surface stack)
//!
//! Breadcrumb-based navigation: each descent replaces the visible list
//! with the selected entry's children and pushes the entry onto the
//! breadcrumb stack; `back()` pops it. Returning to an emptied stack
//! re-fetches the root list from the store — never a cached copy — so the
//! list always reflects the latest linked tree.
//!
//! The owning surface constructs this state fresh on every menu open and
//! drops it on close, so no stale breadcrumb state survives a
//! close/reopen cycle.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};

use crate::core::lookup::{categories_from_nav_data, mobile_nav_data};
use crate::core::nav::{Level3Data, NavChild, NavEntry};
use crate::core::store::NavStore;
use crate::tui::component::EventHandler;
use crate::tui::components::leaf_content::{LeafContent, LeafContentState};
use crate::tui::event::TuiEvent;

/// Typed events the stack emits toward the header and the run loop.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillEvent {
    /// Descended one level (`nav-forward`).
    Forward { level: u8 },
    /// Popped one level (`nav-back`).
    Back { level: u8 },
    /// Left a third-level content view (`nav-third-level-back`).
    ThirdLevelBack { level: u8 },
    /// Navigate the whole "page" to a plain link.
    OpenHref(String),
    /// Close the menu (`toggle-nav` from inside).
    Close,
}

/// One breadcrumb: a first-level entry or a category child.
#[derive(Debug, Clone)]
enum Crumb {
    Entry(NavEntry),
    Child(NavChild),
}

impl Crumb {
    fn label(&self) -> &str {
        match self {
            Crumb::Entry(entry) => entry.label(),
            Crumb::Child(child) => &child.title,
        }
    }
}

/// One visible list row.
#[derive(Debug, Clone)]
enum Row {
    Entry(NavEntry),
    Child(NavChild),
}

impl Row {
    fn label(&self) -> &str {
        match self {
            Row::Entry(entry) => entry.label(),
            Row::Child(child) => &child.title,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Row::Entry(entry) if entry.has_children() => "▸",
            Row::Child(child) if child.third_level.is_some() => "▹",
            _ => " ",
        }
    }
}

/// Persistent state for one open menu.
pub struct DrillDownState {
    crumbs: Vec<Crumb>,
    level: u8,
    rows: Vec<Row>,
    selected: usize,
    list_state: ListState,
    leaf: Option<Level3Data>,
    pub leaf_state: LeafContentState,
    /// List origin row recorded at render time, for click hit tests.
    list_top: u16,
}

impl DrillDownState {
    /// A fresh stack over the store's current root list, at level 1.
    pub fn new(store: &NavStore) -> Self {
        let rows: Vec<Row> = mobile_nav_data(store).into_iter().map(Row::Entry).collect();
        let mut list_state = ListState::default();
        if !rows.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            crumbs: Vec::new(),
            level: 1,
            rows,
            selected: 0,
            list_state,
            leaf: None,
            leaf_state: LeafContentState::default(),
            list_top: 0,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn current_label(&self) -> Option<&str> {
        self.crumbs.last().map(|c| c.label())
    }

    pub fn showing_third_level(&self) -> bool {
        self.leaf.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.crumbs.is_empty()
    }

    /// Click hit test: list row index under a screen row, if any.
    pub fn row_at(&self, screen_row: u16) -> Option<usize> {
        if self.leaf.is_some() || screen_row < self.list_top {
            return None;
        }
        let index = (screen_row - self.list_top) as usize + self.list_state.offset();
        (index < self.rows.len()).then_some(index)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.rows.len() {
            self.selected = index;
            self.list_state.select(Some(index));
        }
    }

    /// Descend into the selected item, show its third-level content, or
    /// hand the href to the page.
    pub fn navigate(&mut self, store: &NavStore) -> Option<DrillEvent> {
        let row = self.rows.get(self.selected)?.clone();
        match row {
            Row::Entry(entry @ NavEntry::Group { .. }) if entry.has_children() => {
                self.crumbs.push(Crumb::Entry(entry));
                self.level += 1;
                self.rebuild_rows(store);
                Some(DrillEvent::Forward { level: self.level })
            }
            Row::Entry(NavEntry::Group { .. }) => None, // empty group: nowhere to go
            Row::Entry(NavEntry::Leaf { href, .. }) => {
                (!href.is_empty()).then_some(DrillEvent::OpenHref(href))
            }
            Row::Child(child) => {
                if child.third_level.is_some() {
                    self.leaf = child.third_level.clone();
                    self.leaf_state = LeafContentState::default();
                    self.crumbs.push(Crumb::Child(child));
                    self.level += 1;
                    Some(DrillEvent::Forward { level: self.level })
                } else if !child.href.is_empty() {
                    Some(DrillEvent::OpenHref(child.href))
                } else {
                    None
                }
            }
        }
    }

    /// Pop one level. At the root this closes the menu instead.
    pub fn back(&mut self, store: &NavStore) -> Option<DrillEvent> {
        if self.leaf.is_some() {
            self.leaf = None;
            self.crumbs.pop();
            self.level = self.level.saturating_sub(1).max(1);
            return Some(DrillEvent::ThirdLevelBack { level: self.level });
        }
        if self.crumbs.pop().is_some() {
            self.level = self.level.saturating_sub(1).max(1);
            self.rebuild_rows(store);
            return Some(DrillEvent::Back { level: self.level });
        }
        Some(DrillEvent::Close)
    }

    /// Rebuild the visible list from the store for the current stack top.
    /// Always a fresh read, so a linking pass that ran since the last
    /// descent is reflected.
    fn rebuild_rows(&mut self, store: &NavStore) {
        self.rows = match self.crumbs.last() {
            Some(Crumb::Entry(entry)) => categories_from_nav_data(store, &entry.slug())
                .into_iter()
                .map(Row::Child)
                .collect(),
            Some(Crumb::Child(_)) => Vec::new(),
            None => mobile_nav_data(store).into_iter().map(Row::Entry).collect(),
        };
        self.selected = 0;
        self.list_state = ListState::default();
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }
}

impl EventHandler for DrillDownState {
    type Event = DrillEvent;

    /// Keyboard protocol; `navigate`/`back` need the store, so Submit and
    /// Back are routed by the run loop instead of here.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<DrillEvent> {
        match event {
            TuiEvent::Escape => Some(DrillEvent::Close),
            TuiEvent::CursorUp if self.leaf.is_none() => {
                if !self.rows.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown if self.leaf.is_none() => {
                if !self.rows.is_empty() {
                    self.selected = (self.selected + 1).min(self.rows.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the drill-down body.
pub struct DrillDown<'a> {
    state: &'a mut DrillDownState,
}

impl<'a> DrillDown<'a> {
    pub fn new(state: &'a mut DrillDownState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [trail_area, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

        // Breadcrumb trail.
        let mut trail = vec![Span::styled("Menu", Style::default().fg(Color::DarkGray))];
        for crumb in &self.state.crumbs {
            trail.push(Span::styled(" ▸ ", Style::default().fg(Color::DarkGray)));
            trail.push(Span::styled(
                crumb.label().to_string(),
                Style::default().fg(Color::Gray),
            ));
        }
        frame.render_widget(Line::from(trail), trail_area);

        if self.state.leaf.is_some() {
            let leaf = self.state.leaf.clone();
            LeafContent::new(leaf.as_ref(), &mut self.state.leaf_state).render(frame, body_area);
            return;
        }

        self.state.list_top = body_area.y;
        let items: Vec<ListItem> = self
            .state
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(
                    format!(" {} {}", row.marker(), row.label()),
                    style,
                )))
            })
            .collect();
        frame.render_stateful_widget(
            List::new(items),
            body_area,
            &mut self.state.list_state,
        );
    }
}
