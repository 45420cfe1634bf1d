//! # Mega-Menu Dropdown (wide surface body)
//!
//! Receives the active group id from the top bar's `DropdownStateChange`
//! event and renders a category sidebar plus the shared leaf-content
//! renderer. Categories come through the lookup projections, not a raw
//! store read.
//!
//! Hovering a category only updates the active-category input of the leaf
//! renderer and the sidebar's selection styling — the category list itself
//! is not rebuilt.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::lookup::{categories_from_nav_data, third_level_content_data};
use crate::core::store::NavStore;
use crate::tui::components::leaf_content::{LeafContent, LeafContentState};

const SIDEBAR_WIDTH: u16 = 26;

/// Events emitted by the dropdown.
#[derive(Debug, Clone, PartialEq)]
pub enum DropdownEvent {
    CategoryChange(String),
}

/// Persistent state for the open dropdown. Created fresh whenever the top
/// bar activates a group, dropped when the dropdown closes.
pub struct DropdownState {
    pub group_id: String,
    pub active_category: Option<String>,
    pub leaf_state: LeafContentState,
    /// Sidebar hit zones `(screen_row, category_slug)`, rebuilt per render.
    pub category_rows: Vec<(u16, String)>,
    /// Last rendered area, for pointer containment tests.
    pub area: Option<Rect>,
}

impl DropdownState {
    pub fn new(group_id: String, store: &NavStore) -> Self {
        let active_category = categories_from_nav_data(store, &group_id)
            .first()
            .map(|c| c.slug());
        Self {
            group_id,
            active_category,
            leaf_state: LeafContentState::default(),
            category_rows: Vec::new(),
            area: None,
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.area
            .is_some_and(|a| col >= a.x && col < a.x + a.width && row >= a.y && row < a.y + a.height)
    }

    pub fn category_at(&self, row: u16) -> Option<&str> {
        self.category_rows
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, slug)| slug.as_str())
    }

    /// Category hover: update the leaf renderer's input, nothing else.
    pub fn set_active_category(&mut self, slug: &str) -> Option<DropdownEvent> {
        if self.active_category.as_deref() == Some(slug) {
            return None;
        }
        self.active_category = Some(slug.to_string());
        self.leaf_state = LeafContentState::default();
        Some(DropdownEvent::CategoryChange(slug.to_string()))
    }
}

/// Transient render wrapper.
pub struct Dropdown<'a> {
    state: &'a mut DropdownState,
    store: &'a NavStore,
}

impl<'a> Dropdown<'a> {
    pub fn new(state: &'a mut DropdownState, store: &'a NavStore) -> Self {
        Self { state, store }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.area = Some(area);
        self.state.category_rows.clear();

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [sidebar_area, content_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .areas(inner);

        let categories = categories_from_nav_data(self.store, &self.state.group_id);
        if categories.is_empty() {
            log::error!("dropdown target '{}' has no categories", self.state.group_id);
            let empty = Paragraph::new("Nothing to show here.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, inner);
            return;
        }

        // Sidebar: one row per category. Selection state is styling only.
        let mut lines = Vec::new();
        for (i, category) in categories.iter().enumerate() {
            let slug = category.slug();
            let row = sidebar_area.y + i as u16;
            if row < sidebar_area.y + sidebar_area.height {
                self.state.category_rows.push((row, slug.clone()));
            }
            let is_active = self.state.active_category.as_deref() == Some(slug.as_str());
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if category.third_level.is_some() { "▸" } else { " " };
            lines.push(Line::from(Span::styled(
                format!(" {marker} {:<width$}", category.title, width = SIDEBAR_WIDTH as usize - 4),
                style,
            )));
        }
        let sidebar = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(sidebar, sidebar_area);

        // Leaf content for the active category, via the lookup projection.
        let content = self.state.active_category.as_deref().and_then(|category| {
            third_level_content_data(self.store, &self.state.group_id, category)
        });
        LeafContent::new(content.as_ref(), &mut self.state.leaf_state)
            .render(frame, content_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::{Level3Data, Level3Item, NavChild, NavEntry, NavTree};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn store() -> NavStore {
        let mut store = NavStore::new();
        store.set_tree(NavTree {
            logo: None,
            entries: vec![NavEntry::Group {
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
                                source: "Summer banner".to_string(),
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
            }],
        });
        store
    }

    #[test]
    fn new_state_preselects_first_category() {
        let store = store();
        let state = DropdownState::new("women".to_string(), &store);
        assert_eq!(state.active_category.as_deref(), Some("dresses"));
    }

    #[test]
    fn category_change_emits_once_per_target() {
        let store = store();
        let mut state = DropdownState::new("women".to_string(), &store);
        assert_eq!(
            state.set_active_category("shoes"),
            Some(DropdownEvent::CategoryChange("shoes".to_string()))
        );
        // Re-hovering the already active category is a no-op.
        assert_eq!(state.set_active_category("shoes"), None);
    }

    #[test]
    fn render_records_category_hit_rows() {
        let store = store();
        let mut state = DropdownState::new("women".to_string(), &store);
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                Dropdown::new(&mut state, &store).render(f, f.area());
            })
            .unwrap();

        assert_eq!(state.category_rows.len(), 2);
        let row = state.category_rows[1].0;
        assert_eq!(state.category_at(row), Some("shoes"));
        assert!(state.contains(1, row));
        assert!(!state.contains(1, 40));

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Dresses"));
        assert!(text.contains("Summer banner"));
    }

    #[test]
    fn unknown_group_renders_empty_state() {
        let store = store();
        let mut state = DropdownState::new("men".to_string(), &store);
        let backend = TestBackend::new(80, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                Dropdown::new(&mut state, &store).render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Nothing to show here."));
    }
}
