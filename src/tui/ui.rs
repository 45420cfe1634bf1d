//! Frame composition for the two surfaces.
//!
//! `draw_ui` decides which surface is live from `App::surface`, lays out
//! its chrome, and defers to the components. The surfaces never render at
//! the same time and never call each other — whatever both need comes out
//! of the store.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::{App, PanelKind, SurfaceMode};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    DrillDown, Dropdown, MobileHeader, PanelView, TopBar,
};

/// Row occupied by the wide top bar's entries (for pointer hit tests).
pub const TOP_BAR_ROW: u16 = 0;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [body_area, status_area] = Layout::vertical([Min(0), Length(1)]).areas(frame.area());

    match app.surface {
        SurfaceMode::Wide => draw_wide(frame, body_area, app, tui),
        SurfaceMode::Narrow => draw_narrow(frame, body_area, app, tui),
    }

    // Auxiliary panel overlays everything but the status line.
    if let Some(kind) = app.active_panel() {
        let search_box = match kind {
            PanelKind::Search => tui.panel_search.as_mut(),
            _ => None,
        };
        PanelView::new(kind, app.surface, search_box).render(frame, body_area);
    }

    draw_status(frame, status_area, app);
}

fn draw_wide(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [bar_area, below_area] = Layout::vertical([Length(2), Min(0)]).areas(area);

    let tree = app.store.tree();
    TopBar::new(
        &mut tui.top_bar,
        tree.as_deref(),
        app.active_panel(),
        &app.site_name,
    )
    .render(frame, bar_area);

    if let Some(dropdown) = tui.dropdown.as_mut() {
        let height = below_area.height.min(14);
        let panel_area = Rect::new(below_area.x, below_area.y, below_area.width, height);
        Dropdown::new(dropdown, &app.store).render(frame, panel_area);
        return;
    }

    draw_page_placeholder(frame, below_area, app);
}

fn draw_narrow(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [header_area, rest_area] = Layout::vertical([Length(1), Min(0)]).areas(area);

    let (level, crumb_label, menu_open) = match tui.menu.as_ref() {
        Some(menu) => (
            menu.level(),
            menu.crumb_label().map(|s| s.to_string()),
            true,
        ),
        None => (1, None, false),
    };
    let mut header = MobileHeader::new(app.site_name.clone(), level, crumb_label, menu_open);
    let search_visible = header.search_visible();
    header.render(frame, header_area);

    let Some(menu) = tui.menu.as_mut() else {
        draw_page_placeholder(frame, rest_area, app);
        return;
    };

    // The search slot mounts above the list, only at the top level.
    let body_area = if search_visible && menu.search.is_some() {
        let [search_area, body_area] =
            Layout::vertical([Length(3), Min(0)]).areas(rest_area);
        if let Some(search) = menu.search.as_mut() {
            search.render(frame, search_area);
        }
        body_area
    } else {
        rest_area
    };

    match menu.drill.as_mut() {
        Some(drill) => DrillDown::new(drill).render(frame, body_area),
        None => {
            let text = if menu.gave_up {
                "Navigation unavailable."
            } else {
                "Loading navigation..."
            };
            frame.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                body_area,
            );
        }
    }
}

fn draw_page_placeholder(frame: &mut Frame, area: Rect, app: &App) {
    let hint = match app.surface {
        SurfaceMode::Wide => "Hover the bar to browse  ·  c cart  a account  / search  q quit",
        SurfaceMode::Narrow => "m menu  ·  c cart  a account  / search  q quit",
    };
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Storefront page content renders here.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            hint,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        area,
    );
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if let Some(error) = &app.error {
        format!("vitrine ({}) | ERROR: {}", app.site_name, error)
    } else if app.status_message.is_empty() {
        format!("vitrine ({})", app.site_name)
    } else {
        format!("vitrine ({}) | {}", app.site_name, app.status_message)
    };
    let style = if app.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Span::styled(status_text, style), area);
}
