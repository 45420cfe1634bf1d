//! # Search Box Component
//!
//! The search slot mounted lazily into the narrow header (level 1 only)
//! and into the wide surface's search panel. The owner drops it on
//! teardown; nothing here outlives the slot it was mounted into.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Events emitted by the search box.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Submitted(String),
    Dismissed,
}

#[derive(Default)]
pub struct SearchBox {
    buffer: String,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.buffer
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content = if self.buffer.is_empty() {
            Line::from(Span::styled(
                "Search products...",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::styled(self.buffer.clone(), Style::default().fg(Color::White)),
                Span::styled("▏", Style::default().fg(Color::Cyan)),
            ])
        };
        let input = Paragraph::new(content).block(
            Block::bordered()
                .title(" ⌕ ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(input, area);
    }
}

impl EventHandler for SearchBox {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => {
                let query = self.buffer.trim().to_string();
                (!query.is_empty()).then(|| SearchEvent::Submitted(query))
            }
            TuiEvent::Escape => Some(SearchEvent::Dismissed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_typed_characters() {
        let mut sb = SearchBox::new();
        for c in "linen".chars() {
            sb.handle_event(&TuiEvent::InputChar(c));
        }
        sb.handle_event(&TuiEvent::Backspace);
        assert_eq!(sb.query(), "line");
    }

    #[test]
    fn submit_emits_trimmed_query() {
        let mut sb = SearchBox::new();
        for c in " dress ".chars() {
            sb.handle_event(&TuiEvent::InputChar(c));
        }
        assert_eq!(
            sb.handle_event(&TuiEvent::Submit),
            Some(SearchEvent::Submitted("dress".to_string()))
        );
    }

    #[test]
    fn empty_submit_is_ignored() {
        let mut sb = SearchBox::new();
        assert_eq!(sb.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn escape_dismisses() {
        let mut sb = SearchBox::new();
        assert_eq!(sb.handle_event(&TuiEvent::Escape), Some(SearchEvent::Dismissed));
    }
}
