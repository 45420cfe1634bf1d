//! # Leaf Content Renderer
//!
//! Shared by both surfaces: renders one category's third-level items as
//! grouped blocks. The grouping itself is `core::grouping::group_runs`;
//! this component only lays the resulting blocks out vertically inside a
//! scroll view — headers as standalone lines, square runs as one card
//! grid, title/description runs as one row grid.
//!
//! Rendering is fallible per item: a malformed entry is skipped with a
//! warning and the scan continues, so one bad block never blanks the
//! whole panel.

use log::warn;
use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::extract::plain_text;
use crate::core::grouping::{ContentGroup, group_runs};
use crate::core::nav::{Level3Data, Level3Item};

const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 6;

/// Scroll state, persisted by the owning surface.
#[derive(Default)]
pub struct LeafContentState {
    pub scroll: ScrollViewState,
}

impl LeafContentState {
    pub fn scroll_by(&mut self, delta: i32) {
        let offset = self.scroll.offset();
        let y = if delta < 0 {
            offset.y.saturating_sub(delta.unsigned_abs() as u16)
        } else {
            offset.y.saturating_add(delta as u16)
        };
        self.scroll
            .set_offset(ratatui::layout::Position { x: offset.x, y });
    }
}

/// Transient render wrapper over one category's content.
pub struct LeafContent<'a> {
    data: Option<&'a Level3Data>,
    state: &'a mut LeafContentState,
}

/// One laid-out widget inside the scroll view.
struct Placed {
    rect: Rect,
    paragraph: Paragraph<'static>,
    bordered: bool,
}

impl<'a> LeafContent<'a> {
    pub fn new(data: Option<&'a Level3Data>, state: &'a mut LeafContentState) -> Self {
        Self { data, state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(data) = self.data else {
            let empty = Paragraph::new("No content for this category yet.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        };

        let width = area.width.saturating_sub(1); // scrollbar gutter
        let (placed, total_height) = layout_groups(&group_runs(&data.items), width);

        let mut scroll_view = ScrollView::new(Size::new(width, total_height.max(1)))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for item in placed {
            if item.bordered {
                scroll_view.render_widget(
                    item.paragraph.block(
                        Block::bordered().border_style(Style::default().fg(Color::DarkGray)),
                    ),
                    item.rect,
                );
            } else {
                scroll_view.render_widget(item.paragraph, item.rect);
            }
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll);
    }
}

/// Lay grouped blocks out top to bottom, returning the widgets and the
/// total content height.
fn layout_groups(groups: &[ContentGroup], width: u16) -> (Vec<Placed>, u16) {
    let mut placed = Vec::new();
    let mut y: u16 = 0;

    for group in groups {
        match group {
            ContentGroup::Header(item) => match header_lines(item) {
                Ok(lines) => {
                    let height = lines.len() as u16 + 1;
                    placed.push(Placed {
                        rect: Rect::new(0, y, width, height),
                        paragraph: Paragraph::new(lines),
                        bordered: false,
                    });
                    y += height;
                }
                Err(e) => warn!("skipping header block: {e}"),
            },
            ContentGroup::Squares(run) => {
                let per_row = (width / CARD_WIDTH).max(1) as usize;
                let mut col = 0usize;
                let mut row_y = y;
                let mut rendered_any = false;
                for item in run {
                    match card_lines(item, CARD_WIDTH.saturating_sub(2)) {
                        Ok(lines) => {
                            let x = (col as u16) * CARD_WIDTH;
                            placed.push(Placed {
                                rect: Rect::new(x, row_y, CARD_WIDTH.min(width), CARD_HEIGHT),
                                paragraph: Paragraph::new(lines),
                                bordered: true,
                            });
                            rendered_any = true;
                            col += 1;
                            if col == per_row {
                                col = 0;
                                row_y += CARD_HEIGHT;
                            }
                        }
                        // One bad card: skip it, the scan advances by one.
                        Err(e) => warn!("skipping card: {e}"),
                    }
                }
                if rendered_any {
                    y = if col == 0 { row_y } else { row_y + CARD_HEIGHT };
                    y += 1;
                }
            }
            ContentGroup::Rows(run) => {
                let mut rendered_any = false;
                for item in run {
                    match row_lines(item, width) {
                        Ok(lines) => {
                            let height = lines.len() as u16;
                            placed.push(Placed {
                                rect: Rect::new(0, y, width, height),
                                paragraph: Paragraph::new(lines),
                                bordered: false,
                            });
                            y += height;
                            rendered_any = true;
                        }
                        Err(e) => warn!("skipping row: {e}"),
                    }
                }
                if rendered_any {
                    y += 1;
                }
            }
        }
    }

    (placed, y)
}

fn header_lines(item: &Level3Item) -> Result<Vec<Line<'static>>, String> {
    let Level3Item::Header { source } = item else {
        return Err("not a header block".to_string());
    };
    let text = plain_text(source);
    if text.is_empty() {
        return Err("empty header block".to_string());
    }
    Ok(vec![Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))])
}

fn row_lines(item: &Level3Item, width: u16) -> Result<Vec<Line<'static>>, String> {
    let Level3Item::TitleDescription {
        title,
        description,
        url,
    } = item
    else {
        return Err("not a title/description row".to_string());
    };
    if title.is_empty() {
        return Err("row with empty title".to_string());
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(
            title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {url}"), Style::default().fg(Color::Cyan)),
    ])];
    for wrapped in textwrap::wrap(description, width.max(10) as usize) {
        lines.push(Line::from(Span::styled(
            wrapped.into_owned(),
            Style::default().fg(Color::Gray),
        )));
    }
    Ok(lines)
}

fn card_lines(item: &Level3Item, inner_width: u16) -> Result<Vec<Line<'static>>, String> {
    let Level3Item::Square {
        title,
        url,
        description,
        footer,
    } = item
    else {
        return Err("not a card".to_string());
    };
    if title.is_empty() {
        return Err("card with empty title".to_string());
    }

    let mut lines = vec![Line::from(Span::styled(
        title.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];
    let wrapped = textwrap::wrap(description, inner_width.max(10) as usize);
    for chunk in wrapped.iter().take(2) {
        lines.push(Line::from(Span::styled(
            chunk.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    while lines.len() < 3 {
        lines.push(Line::default());
    }
    lines.push(Line::from(vec![
        Span::styled(footer.clone(), Style::default().fg(Color::Yellow)),
        Span::styled(format!("  {url}"), Style::default().fg(Color::DarkGray)),
    ]));
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn header() -> Level3Item {
        Level3Item::Header {
            source: "**New in: the summer edit**".to_string(),
        }
    }

    fn square(title: &str) -> Level3Item {
        Level3Item::Square {
            title: title.to_string(),
            url: "/x".to_string(),
            description: "A short description".to_string(),
            footer: "From $99".to_string(),
        }
    }

    fn row(title: &str) -> Level3Item {
        Level3Item::TitleDescription {
            title: title.to_string(),
            description: "Linked text row".to_string(),
            url: "/y".to_string(),
        }
    }

    #[test]
    fn canonical_grouping_produces_four_blocks() {
        let items = vec![header(), square("A"), square("B"), header(), row("C")];
        let groups = group_runs(&items);
        let (placed, _) = layout_groups(&groups, 80);
        // 2 headers + 2 cards + 1 row = 5 widgets, but the cards share one
        // grid row (same y) while the headers and row each sit alone.
        assert_eq!(placed.len(), 5);
        let card_ys: Vec<u16> = placed
            .iter()
            .filter(|p| p.bordered)
            .map(|p| p.rect.y)
            .collect();
        assert_eq!(card_ys.len(), 2);
        assert_eq!(card_ys[0], card_ys[1], "adjacent cards share one grid row");
    }

    #[test]
    fn separated_squares_do_not_share_a_grid() {
        let items = vec![square("A"), header(), square("B")];
        let (placed, _) = layout_groups(&group_runs(&items), 80);
        let card_ys: Vec<u16> = placed
            .iter()
            .filter(|p| p.bordered)
            .map(|p| p.rect.y)
            .collect();
        assert_ne!(card_ys[0], card_ys[1]);
    }

    #[test]
    fn malformed_item_is_skipped_not_fatal() {
        let items = vec![
            square("Good"),
            Level3Item::Square {
                title: String::new(), // rejected by card_lines
                url: "/x".to_string(),
                description: "d".to_string(),
                footer: "f".to_string(),
            },
            square("Also good"),
        ];
        let (placed, _) = layout_groups(&group_runs(&items), 80);
        assert_eq!(placed.iter().filter(|p| p.bordered).count(), 2);
    }

    #[test]
    fn narrow_panel_wraps_cards_onto_new_rows() {
        let items = vec![square("A"), square("B"), square("C")];
        let (placed, total) = layout_groups(&group_runs(&items), CARD_WIDTH + 2);
        let ys: Vec<u16> = placed.iter().map(|p| p.rect.y).collect();
        assert_eq!(ys.len(), 3);
        assert!(ys[0] < ys[1] && ys[1] < ys[2]);
        assert!(total >= CARD_HEIGHT * 3);
    }

    #[test]
    fn render_smoke_test() {
        let data = Level3Data {
            id: "summer".to_string(),
            items: vec![header(), square("Wrap dresses"), row("Linen midi")],
        };
        let mut state = LeafContentState::default();
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                LeafContent::new(Some(&data), &mut state).render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("New in: the summer edit"));
        assert!(text.contains("Wrap dresses"));
        assert!(text.contains("Linen midi"));
    }

    #[test]
    fn empty_category_renders_placeholder() {
        let mut state = LeafContentState::default();
        let backend = TestBackend::new(60, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                LeafContent::new(None, &mut state).render(f, f.area());
            })
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("No content"));
    }
}
