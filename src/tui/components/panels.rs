//! # Auxiliary Panels (cart / account / search)
//!
//! Placeholder surfaces for the external collaborators — the real cart,
//! login, and search widgets live outside this subsystem. What is in
//! scope is their behavior: mutual exclusivity (enforced upstream by
//! `App::set_active_panel`) and relocation between the wide and narrow
//! containers on viewport change.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::core::state::{PanelKind, SurfaceMode};
use crate::tui::components::search_box::SearchBox;

/// Transient render wrapper for whichever panel is active.
pub struct PanelView<'a> {
    kind: PanelKind,
    surface: SurfaceMode,
    search_box: Option<&'a mut SearchBox>,
}

impl<'a> PanelView<'a> {
    pub fn new(
        kind: PanelKind,
        surface: SurfaceMode,
        search_box: Option<&'a mut SearchBox>,
    ) -> Self {
        Self {
            kind,
            surface,
            search_box,
        }
    }

    /// Panel placement depends on the hosting container: a sidebar on the
    /// wide surface, a full-width sheet on the narrow one. The resize
    /// debounce upstream decides when the container actually switches.
    pub fn panel_area(&self, viewport: Rect) -> Rect {
        match self.surface {
            SurfaceMode::Wide => {
                let width = 36.min(viewport.width);
                Rect::new(
                    viewport.x + viewport.width - width,
                    viewport.y + 2,
                    width,
                    viewport.height.saturating_sub(3),
                )
            }
            SurfaceMode::Narrow => {
                let [_, sheet] =
                    Layout::vertical([Constraint::Min(0), Constraint::Percentage(60)])
                        .areas(viewport);
                sheet
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, viewport: Rect) {
        let area = self.panel_area(viewport);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.kind.title()))
            .title_bottom(Line::from(" Esc Close ").centered())
            .padding(Padding::horizontal(1));

        match self.kind {
            PanelKind::Search => {
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let [input_area, hint_area] =
                    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);
                if let Some(search_box) = self.search_box.as_deref_mut() {
                    search_box.render(frame, input_area);
                }
                frame.render_widget(
                    Paragraph::new("Suggestions appear as you type.")
                        .style(Style::default().fg(Color::DarkGray)),
                    hint_area,
                );
            }
            PanelKind::Cart => {
                let body = Paragraph::new(
                    "Your cart is served by the storefront backend.\n\n\
                     This preview only exercises open/close and\n\
                     wide/narrow relocation behavior.",
                )
                .style(Style::default().fg(Color::Gray))
                .block(block);
                frame.render_widget(body, area);
            }
            PanelKind::Account => {
                let body = Paragraph::new(
                    "Sign-in is handled by the account provider.\n\n\
                     Placeholder panel.",
                )
                .style(Style::default().fg(Color::Gray))
                .block(block);
                frame.render_widget(body, area);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn wide_surface_hosts_panel_as_sidebar() {
        let view = PanelView::new(PanelKind::Cart, SurfaceMode::Wide, None);
        let area = view.panel_area(Rect::new(0, 0, 120, 40));
        assert_eq!(area.width, 36);
        assert_eq!(area.x, 120 - 36);
    }

    #[test]
    fn narrow_surface_hosts_panel_as_sheet() {
        let view = PanelView::new(PanelKind::Cart, SurfaceMode::Narrow, None);
        let area = view.panel_area(Rect::new(0, 0, 60, 40));
        assert_eq!(area.width, 60);
        assert!(area.y > 0);
    }

    #[test]
    fn search_panel_renders_mounted_search_box() {
        let mut sb = SearchBox::new();
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                PanelView::new(PanelKind::Search, SurfaceMode::Wide, Some(&mut sb))
                    .render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Search"));
        assert!(text.contains("Search products..."));
    }
}
