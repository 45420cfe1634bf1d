//! # Mobile Header Component (narrow surface)
//!
//! Stateless bar above the drill-down menu. Mirrors the stack's `level`
//! through a prop and adjusts its own chrome from it — the back affordance
//! appears past level 1 and the search slot is suppressed from level 2
//! upward — without knowing anything about the stack's internals.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct MobileHeader {
    pub site_name: String,
    /// Mirrored from the drill-down stack on every render.
    pub level: u8,
    /// Label of the current breadcrumb (None at the root).
    pub crumb_label: Option<String>,
    pub menu_open: bool,
}

impl MobileHeader {
    pub fn new(
        site_name: String,
        level: u8,
        crumb_label: Option<String>,
        menu_open: bool,
    ) -> Self {
        Self {
            site_name,
            level,
            crumb_label,
            menu_open,
        }
    }

    /// The search slot only exists at the top level of an open menu.
    pub fn search_visible(&self) -> bool {
        self.menu_open && self.level < 2
    }
}

impl Component for MobileHeader {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();

        if self.menu_open {
            let affordance = if self.level > 1 { " ‹ back " } else { " ✕ close " };
            spans.push(Span::styled(
                affordance,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                " ☰ menu ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }

        let title = self
            .crumb_label
            .clone()
            .unwrap_or_else(|| self.site_name.clone());
        spans.push(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

        if self.menu_open && self.level > 1 {
            spans.push(Span::styled(
                format!(" L{}", self.level),
                Style::default().fg(Color::DarkGray),
            ));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(header: &mut MobileHeader) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| header.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn search_slot_suppressed_below_level_two() {
        let at_root = MobileHeader::new("Maison".to_string(), 1, None, true);
        assert!(at_root.search_visible());
        let deeper = MobileHeader::new("Maison".to_string(), 2, Some("Women".to_string()), true);
        assert!(!deeper.search_visible());
        let closed = MobileHeader::new("Maison".to_string(), 1, None, false);
        assert!(!closed.search_visible());
    }

    #[test]
    fn back_affordance_appears_past_level_one() {
        let mut deeper =
            MobileHeader::new("Maison".to_string(), 2, Some("Women".to_string()), true);
        let text = rendered(&mut deeper);
        assert!(text.contains("back"));
        assert!(text.contains("Women"));
        assert!(text.contains("L2"));
    }

    #[test]
    fn closed_menu_shows_hamburger_and_site_name() {
        let mut closed = MobileHeader::new("Maison".to_string(), 1, None, false);
        let text = rendered(&mut closed);
        assert!(text.contains("menu"));
        assert!(text.contains("Maison"));
    }
}
