//! # Top Bar Component (wide surface root)
//!
//! Renders the logo, the first-level entries, and the auxiliary panel
//! icons, and owns the dropdown state machine:
//!
//! ```text
//! Closed ──pointer enters group entry──▶ Open(entry)
//! Open(entry) ──pointer leaves, 100ms grace, no re-entry──▶ Closed
//! ```
//!
//! Pointer re-entry on the entry or on the dropdown body cancels the
//! pending close, so moving the pointer from the entry into the panel
//! never flickers. A pinned (debug) state suppresses all leave-driven
//! closes.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `TopBarState` lives in `TuiState`
//! - `TopBar` is created each frame with borrowed state

use std::ops::Range;
use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::nav::NavTree;
use crate::core::state::PanelKind;

/// Event sent to the dropdown component on every transition. Carries the
/// new active id; the cooperating close protocol is expressed through
/// `TopBarState::schedule_close` / `cancel_close`, which the run loop
/// invokes on the dropdown's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum TopBarEvent {
    DropdownStateChange { active: Option<String> },
    PanelClicked(PanelKind),
}

/// A horizontal hit zone recorded during render.
#[derive(Debug, Clone)]
pub struct EntryZone {
    pub cols: Range<u16>,
    pub slug: String,
    pub has_children: bool,
}

/// Persistent state for the top bar and its dropdown state machine.
pub struct TopBarState {
    active: Option<String>,
    /// At most one pending close per the shared-timer discipline; always
    /// replaced, never accumulated.
    pending_close: Option<Instant>,
    pinned: bool,
    close_delay: Duration,
    pub hovered: Option<String>,
    /// Entry hit zones, rebuilt on every render pass.
    pub entry_zones: Vec<EntryZone>,
    pub panel_zones: Vec<(Range<u16>, PanelKind)>,
}

impl TopBarState {
    pub fn new(close_delay: Duration) -> Self {
        Self {
            active: None,
            pending_close: None,
            pinned: false,
            close_delay,
            hovered: None,
            entry_zones: Vec::new(),
            panel_zones: Vec::new(),
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Pointer entered an entry. Any pending close is canceled first, so a
    /// leave/re-enter inside the grace window never closes the dropdown.
    pub fn pointer_enter(
        &mut self,
        slug: &str,
        has_children: bool,
        now: Instant,
    ) -> Option<TopBarEvent> {
        self.hovered = Some(slug.to_string());
        if has_children {
            self.pending_close = None;
            if self.active.as_deref() != Some(slug) && !self.pinned {
                self.active = Some(slug.to_string());
                return Some(TopBarEvent::DropdownStateChange {
                    active: self.active.clone(),
                });
            }
            None
        } else {
            // A childless entry is outside the dropdown protocol; treat it
            // as a leave for the currently open group.
            self.schedule_close(now);
            None
        }
    }

    /// Pointer left the entry row (or moved to unrelated chrome).
    pub fn pointer_leave(&mut self, now: Instant) {
        self.hovered = None;
        self.schedule_close(now);
    }

    /// Pointer entered the dropdown body: cancel the pending close
    /// immediately.
    pub fn cancel_close(&mut self) {
        self.pending_close = None;
    }

    fn schedule_close(&mut self, now: Instant) {
        if self.active.is_some() && !self.pinned {
            self.pending_close = Some(now + self.close_delay);
        }
    }

    /// Fire the delayed close once its deadline has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<TopBarEvent> {
        if let Some(deadline) = self.pending_close
            && now >= deadline
        {
            self.pending_close = None;
            self.active = None;
            return Some(TopBarEvent::DropdownStateChange { active: None });
        }
        None
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_close
    }

    /// Immediate close with no grace delay (explicit dismissal). Also
    /// releases a debug pin, so hover works normally afterwards.
    pub fn force_close(&mut self) -> Option<TopBarEvent> {
        self.pending_close = None;
        self.pinned = false;
        if self.active.take().is_some() {
            return Some(TopBarEvent::DropdownStateChange { active: None });
        }
        None
    }

    /// Debug mode: pin an entry permanently open and suppress leave-driven
    /// closes.
    pub fn pin(&mut self, slug: &str) -> TopBarEvent {
        self.pinned = true;
        self.pending_close = None;
        self.active = Some(slug.to_string());
        TopBarEvent::DropdownStateChange {
            active: self.active.clone(),
        }
    }

    pub fn entry_at(&self, col: u16) -> Option<&EntryZone> {
        self.entry_zones.iter().find(|z| z.cols.contains(&col))
    }

    pub fn panel_at(&self, col: u16) -> Option<PanelKind> {
        self.panel_zones
            .iter()
            .find(|(cols, _)| cols.contains(&col))
            .map(|(_, kind)| *kind)
    }
}

/// Transient render wrapper for the top bar.
pub struct TopBar<'a> {
    state: &'a mut TopBarState,
    tree: Option<&'a NavTree>,
    active_panel: Option<PanelKind>,
    site_name: &'a str,
}

impl<'a> TopBar<'a> {
    pub fn new(
        state: &'a mut TopBarState,
        tree: Option<&'a NavTree>,
        active_panel: Option<PanelKind>,
        site_name: &'a str,
    ) -> Self {
        Self {
            state,
            tree,
            active_panel,
            site_name,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.entry_zones.clear();
        self.state.panel_zones.clear();

        let mut spans: Vec<Span> = Vec::new();
        let mut col: u16 = area.x;

        // Logo: cloned from the tree on each render; the authored original
        // stays with the tree.
        let logo_text = self
            .tree
            .and_then(|t| t.logo.clone())
            .map(|l| l.text)
            .unwrap_or_else(|| self.site_name.to_string());
        let logo = format!(" {} ", logo_text);
        col += logo.width() as u16;
        spans.push(Span::styled(
            logo,
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ));

        for entry in self.tree.map(|t| t.entries.as_slice()).unwrap_or_default() {
            let slug = entry.slug();
            let label = format!("  {}  ", entry.label());
            let width = label.width() as u16;

            let is_active = self.state.active.as_deref() == Some(slug.as_str());
            let is_hovered = self.state.hovered.as_deref() == Some(slug.as_str());
            // The active indicator toggled on every transition.
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else if is_hovered {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            self.state.entry_zones.push(EntryZone {
                cols: col..col + width,
                slug,
                has_children: entry.has_children(),
            });
            spans.push(Span::styled(label, style));
            col += width;
        }

        // Panel icons, right-aligned.
        let icons: [(PanelKind, &str); 3] = [
            (PanelKind::Search, " ⌕ search "),
            (PanelKind::Account, " ◉ account "),
            (PanelKind::Cart, " ▣ cart "),
        ];
        let icons_width: u16 = icons.iter().map(|(_, s)| s.width() as u16).sum();
        let mut icon_col = (area.x + area.width).saturating_sub(icons_width);
        if icon_col > col {
            spans.push(Span::raw(" ".repeat((icon_col - col) as usize)));
        } else {
            icon_col = col;
        }
        for (kind, text) in icons {
            let width = text.width() as u16;
            let style = if self.active_panel == Some(kind) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            self.state.panel_zones.push((icon_col..icon_col + width, kind));
            spans.push(Span::styled(text, style));
            icon_col += width;
        }

        frame.render_widget(Line::from(spans), area);

        // Separator under the bar.
        if area.height > 1 {
            let sep = Rect::new(area.x, area.y + 1, area.width, 1);
            frame.render_widget(
                Line::from(Span::styled(
                    "─".repeat(area.width as usize),
                    Style::default().fg(Color::DarkGray),
                )),
                sep,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav::{NavChild, NavEntry};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    const GRACE: Duration = Duration::from_millis(100);

    fn state() -> TopBarState {
        TopBarState::new(GRACE)
    }

    fn tree() -> NavTree {
        NavTree {
            logo: None,
            entries: vec![
                NavEntry::Leaf {
                    label: "Sale".to_string(),
                    href: "/sale".to_string(),
                    source: String::new(),
                },
                NavEntry::Group {
                    label: "Women".to_string(),
                    source: String::new(),
                    children: vec![NavChild {
                        title: "Shoes".to_string(),
                        href: "/women/shoes".to_string(),
                        source: String::new(),
                        third_level_ids: vec![],
                        third_level: None,
                    }],
                },
            ],
        }
    }

    #[test]
    fn entering_group_entry_opens_dropdown() {
        let mut s = state();
        let now = Instant::now();
        let event = s.pointer_enter("women", true, now);
        assert_eq!(
            event,
            Some(TopBarEvent::DropdownStateChange {
                active: Some("women".to_string())
            })
        );
        assert_eq!(s.active(), Some("women"));
    }

    #[test]
    fn entering_leaf_entry_never_opens() {
        let mut s = state();
        assert!(s.pointer_enter("sale", false, Instant::now()).is_none());
        assert_eq!(s.active(), None);
    }

    #[test]
    fn leave_closes_only_after_grace_elapses() {
        let mut s = state();
        let t0 = Instant::now();
        s.pointer_enter("women", true, t0);
        s.pointer_leave(t0);
        // Before the deadline: nothing happens.
        assert!(s.tick(t0 + Duration::from_millis(50)).is_none());
        assert_eq!(s.active(), Some("women"));
        // After the deadline: closed.
        let event = s.tick(t0 + Duration::from_millis(150));
        assert_eq!(event, Some(TopBarEvent::DropdownStateChange { active: None }));
        assert_eq!(s.active(), None);
    }

    #[test]
    fn reentry_within_grace_never_closes() {
        let mut s = state();
        let t0 = Instant::now();
        s.pointer_enter("women", true, t0);
        s.pointer_leave(t0);
        // Re-enter before the delay elapses: the pending close is canceled.
        s.pointer_enter("women", true, t0 + Duration::from_millis(50));
        assert!(s.tick(t0 + Duration::from_millis(500)).is_none());
        assert_eq!(s.active(), Some("women"));
    }

    #[test]
    fn dropdown_entry_cancels_pending_close() {
        let mut s = state();
        let t0 = Instant::now();
        s.pointer_enter("women", true, t0);
        s.pointer_leave(t0);
        s.cancel_close();
        assert!(s.next_deadline().is_none());
        assert!(s.tick(t0 + Duration::from_millis(500)).is_none());
    }

    #[test]
    fn switching_groups_retargets_the_dropdown() {
        let mut s = state();
        let t0 = Instant::now();
        s.pointer_enter("women", true, t0);
        let event = s.pointer_enter("men", true, t0 + Duration::from_millis(10));
        assert_eq!(
            event,
            Some(TopBarEvent::DropdownStateChange {
                active: Some("men".to_string())
            })
        );
    }

    #[test]
    fn pinned_state_suppresses_leave_closes() {
        let mut s = state();
        let t0 = Instant::now();
        s.pin("women");
        s.pointer_leave(t0);
        assert!(s.next_deadline().is_none());
        assert!(s.tick(t0 + Duration::from_secs(10)).is_none());
        assert_eq!(s.active(), Some("women"));
    }

    #[test]
    fn force_close_skips_the_grace_delay_and_releases_a_pin() {
        let mut s = state();
        s.pin("women");
        let event = s.force_close();
        assert_eq!(event, Some(TopBarEvent::DropdownStateChange { active: None }));
        assert!(!s.is_pinned());
        // Hover works normally again.
        assert!(s.pointer_enter("women", true, Instant::now()).is_some());
    }

    #[test]
    fn moving_to_leaf_entry_schedules_close() {
        let mut s = state();
        let t0 = Instant::now();
        s.pointer_enter("women", true, t0);
        s.pointer_enter("sale", false, t0 + Duration::from_millis(10));
        assert!(s.next_deadline().is_some());
        let event = s.tick(t0 + Duration::from_millis(200));
        assert_eq!(event, Some(TopBarEvent::DropdownStateChange { active: None }));
    }

    #[test]
    fn render_records_hit_zones() {
        let backend = TestBackend::new(80, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut s = state();
        let tree = tree();
        terminal
            .draw(|f| {
                TopBar::new(&mut s, Some(&tree), None, "Storefront").render(f, f.area());
            })
            .unwrap();

        assert_eq!(s.entry_zones.len(), 2);
        assert_eq!(s.entry_zones[0].slug, "sale");
        assert!(!s.entry_zones[0].has_children);
        assert_eq!(s.entry_zones[1].slug, "women");
        assert!(s.entry_zones[1].has_children);
        assert_eq!(s.panel_zones.len(), 3);

        // The recorded zones answer hit tests.
        let mid = s.entry_zones[1].cols.start;
        assert_eq!(s.entry_at(mid).unwrap().slug, "women");

        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Sale"));
        assert!(text.contains("Women"));
        assert!(text.contains("cart"));
    }
}
