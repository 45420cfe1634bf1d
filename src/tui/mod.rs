//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders whichever
//! surface is live, and routes input into the components and the core
//! `update()` reducer.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw: it sleeps up to 500ms when
//! idle and shrinks the poll timeout to the nearest pending deadline —
//! the dropdown's delayed close, the resize debounce, or the narrow
//! surface's readiness cadence. Each concern owns at most one pending
//! deadline, replaced before rescheduling, so competing enter/leave
//! callbacks can never double-fire.

pub mod component;
pub mod components;
pub mod event;
mod ui;

use log::{debug, error, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::extract::{build_level3_data, build_nav_tree};
use crate::core::nav::NavEntry;
use crate::core::state::{App, PanelKind, SurfaceMode};
use crate::core::store::NavStore;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    DrillDownState, DrillEvent, DropdownState, SearchBox, SearchEvent, TopBarEvent, TopBarState,
};
use crate::tui::event::{TuiEvent, command_for_char, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(500);
const MIN_POLL: Duration = Duration::from_millis(10);

/// The narrow surface's open-menu subtree. Constructed fresh on every
/// open and dropped whole on close, so no stale breadcrumb state (or a
/// lingering search widget) survives a close/reopen cycle.
pub struct MenuState {
    /// None until the store's tree is ready.
    pub drill: Option<DrillDownState>,
    /// Search slot, mounted lazily at level 1 only.
    pub search: Option<SearchBox>,
    ready_deadline: Instant,
    pub gave_up: bool,
}

impl MenuState {
    fn new(now: Instant, ready_timeout: Duration) -> Self {
        Self {
            drill: None,
            search: None,
            ready_deadline: now + ready_timeout,
            gave_up: false,
        }
    }

    pub fn level(&self) -> u8 {
        self.drill.as_ref().map(|d| d.level()).unwrap_or(1)
    }

    pub fn crumb_label(&self) -> Option<&str> {
        self.drill.as_ref().and_then(|d| d.current_label())
    }

    /// Bounded readiness wait: the first render happens once the store's
    /// tree is non-empty; past the deadline we give up with an error
    /// instead of retrying silently forever.
    fn poll_ready(&mut self, store: &NavStore, now: Instant) -> bool {
        if self.drill.is_some() || self.gave_up {
            return false;
        }
        if store.tree().is_some_and(|t| !t.is_empty()) {
            self.drill = Some(DrillDownState::new(store));
            self.sync_search_slot();
            return true;
        }
        if now >= self.ready_deadline {
            error!("navigation data never became ready; giving up");
            self.gave_up = true;
            return true;
        }
        false
    }

    fn waiting(&self) -> bool {
        self.drill.is_none() && !self.gave_up
    }

    /// Mount or detach the search slot to match the current level.
    fn sync_search_slot(&mut self) {
        let at_top = self.level() < 2;
        match (at_top, self.search.is_some()) {
            (true, false) => self.search = Some(SearchBox::new()),
            (false, true) => self.search = None,
            _ => {}
        }
    }
}

/// TUI-specific presentation state (not part of core session state)
pub struct TuiState {
    pub top_bar: TopBarState,
    /// Present iff the wide dropdown is open.
    pub dropdown: Option<DropdownState>,
    /// Present iff the narrow menu is open.
    pub menu: Option<MenuState>,
    /// Search widget mounted into the wide search panel.
    pub panel_search: Option<SearchBox>,
    /// Latest resize, settling after the debounce window.
    resize_pending: Option<(Instant, u16)>,
    resize_debounce: Duration,
}

impl TuiState {
    pub fn new(close_delay: Duration, resize_debounce: Duration) -> Self {
        Self {
            top_bar: TopBarState::new(close_delay),
            dropdown: None,
            menu: None,
            panel_search: None,
            resize_pending: None,
            resize_debounce,
        }
    }

    /// Replace (never accumulate) the pending resize.
    fn schedule_resize(&mut self, width: u16, now: Instant) {
        self.resize_pending = Some((now + self.resize_debounce, width));
    }

    fn take_settled_resize(&mut self, now: Instant) -> Option<u16> {
        if let Some((deadline, width)) = self.resize_pending
            && now >= deadline
        {
            self.resize_pending = None;
            return Some(width);
        }
        None
    }

    /// Poll timeout: idle cadence, shrunk to the nearest pending deadline.
    fn poll_timeout(&self, ready_poll: Duration, now: Instant) -> Duration {
        let mut timeout = IDLE_POLL;
        if self.menu.as_ref().is_some_and(|m| m.waiting()) {
            timeout = timeout.min(ready_poll);
        }
        for deadline in [
            self.top_bar.next_deadline(),
            self.resize_pending.map(|(d, _)| d),
        ]
        .into_iter()
        .flatten()
        {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout.max(MIN_POLL)
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse capture)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

pub fn run(config: &ResolvedConfig, mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new(
        Duration::from_millis(config.close_delay_ms),
        Duration::from_millis(config.resize_debounce_ms),
    );
    let ready_poll = Duration::from_millis(config.ready_poll_ms);
    let ready_timeout = Duration::from_millis(config.ready_timeout_ms);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from the background content loader
    let (tx, rx) = mpsc::channel();
    spawn_content_load(config.nav_path.clone(), config.fragments_dir.clone(), tx);

    // Initial surface from the current viewport
    let size = terminal.size()?;
    app.surface = app.surface_for_width(size.width, config.breakpoint);
    info!("starting on {:?} surface ({} cols)", app.surface, size.width);

    let mut needs_redraw = true;

    loop {
        let now = Instant::now();

        // Narrow readiness wait (bounded, not an unbounded busy-wait)
        if let Some(menu) = tui.menu.as_mut()
            && menu.poll_ready(&app.store, now)
        {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = tui.poll_timeout(ready_poll, Instant::now());
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let now = Instant::now();

            // Ctrl+C always quits regardless of focus
            if matches!(event, TuiEvent::ForceQuit) {
                if update(&mut app, Action::Quit) == Effect::Quit {
                    should_quit = true;
                }
                continue;
            }

            // Viewport changes settle through the debounce window
            if let TuiEvent::Resize(width, _) = event {
                tui.schedule_resize(width, now);
                continue;
            }

            // An open panel captures input first
            if app.active_panel().is_some() {
                if handle_panel_event(&mut app, &mut tui, &event) {
                    should_quit = true;
                }
                continue;
            }

            match app.surface {
                SurfaceMode::Wide => {
                    if handle_wide_event(&mut app, &mut tui, &event, now) {
                        should_quit = true;
                    }
                }
                SurfaceMode::Narrow => {
                    if handle_narrow_event(&mut app, &mut tui, &event, now, ready_timeout) {
                        should_quit = true;
                    }
                }
            }
        }

        // Deadline-driven transitions
        let now = Instant::now();
        if let Some(event) = tui.top_bar.tick(now) {
            apply_dropdown_change(&mut tui, &app.store, event);
            needs_redraw = true;
        }
        if let Some(width) = tui.take_settled_resize(now) {
            let surface = app.surface_for_width(width, config.breakpoint);
            if surface != app.surface {
                info!("relocating to {:?} surface ({} cols)", surface, width);
                // Leaving a surface tears its interactive subtrees down.
                tui.dropdown = None;
                tui.menu = None;
                update(&mut app, Action::SurfaceChanged(surface));
            }
            needs_redraw = true;
        }

        if should_quit {
            break;
        }

        // Handle background loader actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            match update(&mut app, action) {
                Effect::Quit => {
                    should_quit = true;
                    break;
                }
                Effect::TreeLoaded => on_tree_loaded(&mut app, &mut tui),
                Effect::None => {}
            }
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// Debug surface: pin the first group entry permanently open.
fn on_tree_loaded(app: &mut App, tui: &mut TuiState) {
    if !app.debug_pin_dropdown || app.surface != SurfaceMode::Wide {
        return;
    }
    let Some(tree) = app.store.tree() else {
        return;
    };
    let first_group = tree
        .entries
        .iter()
        .find(|e| matches!(e, NavEntry::Group { .. }))
        .map(|e| e.slug());
    if let Some(slug) = first_group {
        info!("debug mode: pinning dropdown '{slug}' open");
        let event = tui.top_bar.pin(&slug);
        apply_dropdown_change(tui, &app.store, event);
    } else {
        warn!("debug mode requested but the tree has no group entries");
    }
}

/// Route a dropdown transition to the dropdown component: the single
/// targeted event carrying the new active id.
fn apply_dropdown_change(tui: &mut TuiState, store: &NavStore, event: TopBarEvent) {
    if let TopBarEvent::DropdownStateChange { active } = event {
        debug!("dropdown-state-change: {:?}", active);
        tui.dropdown = active.map(|id| DropdownState::new(id, store));
    }
}

/// Mount or drop the wide search panel's widget to match panel state.
fn sync_panel_search(app: &App, tui: &mut TuiState) {
    match (app.active_panel(), tui.panel_search.is_some()) {
        (Some(PanelKind::Search), false) => tui.panel_search = Some(SearchBox::new()),
        (Some(PanelKind::Search), true) => {}
        // Teardown detaches the widget so nothing stale survives a reopen.
        (_, true) => tui.panel_search = None,
        _ => {}
    }
}

/// Input routing while a panel is open. Returns true to quit.
fn handle_panel_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> bool {
    if app.active_panel() == Some(PanelKind::Search) {
        if let Some(search) = tui.panel_search.as_mut() {
            match search.handle_event(event) {
                Some(SearchEvent::Submitted(query)) => {
                    // Autocompletion and results belong to the search
                    // collaborator; we only surface the handoff.
                    info!("search submitted: {query}");
                    app.status_message = format!("Searching \"{query}\"...");
                    update(app, Action::CloseAllPanels);
                    sync_panel_search(app, tui);
                    return false;
                }
                Some(SearchEvent::Dismissed) => {
                    update(app, Action::CloseAllPanels);
                    sync_panel_search(app, tui);
                    return false;
                }
                None => {}
            }
        }
        return false;
    }

    match event {
        TuiEvent::Escape => {
            update(app, Action::CloseAllPanels);
            sync_panel_search(app, tui);
        }
        TuiEvent::InputChar(c) => match command_for_char(*c) {
            Some(TuiEvent::Quit) => return true,
            Some(TuiEvent::ToggleCart) => toggle_panel(app, tui, PanelKind::Cart),
            Some(TuiEvent::ToggleAccount) => toggle_panel(app, tui, PanelKind::Account),
            Some(TuiEvent::ToggleSearch) => toggle_panel(app, tui, PanelKind::Search),
            _ => {}
        },
        _ => {}
    }
    false
}

fn toggle_panel(app: &mut App, tui: &mut TuiState, kind: PanelKind) {
    update(app, Action::TogglePanel(kind));
    sync_panel_search(app, tui);
}

/// Wide surface input. Returns true to quit.
fn handle_wide_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent, now: Instant) -> bool {
    match event {
        TuiEvent::MouseMove(col, row) => pointer_move_wide(app, tui, *col, *row, now),
        TuiEvent::MouseClick(col, row) => {
            if *row == ui::TOP_BAR_ROW
                && let Some(kind) = tui.top_bar.panel_at(*col)
            {
                toggle_panel(app, tui, kind);
            } else if let Some(dropdown) = tui.dropdown.as_mut()
                && dropdown.contains(*col, *row)
                && let Some(slug) = dropdown.category_at(*row).map(str::to_string)
            {
                dropdown.set_active_category(&slug);
            }
        }
        TuiEvent::ScrollUp => {
            if let Some(dropdown) = tui.dropdown.as_mut() {
                dropdown.leaf_state.scroll_by(-1);
            }
        }
        TuiEvent::ScrollDown => {
            if let Some(dropdown) = tui.dropdown.as_mut() {
                dropdown.leaf_state.scroll_by(1);
            }
        }
        TuiEvent::Escape => {
            // Explicit dismissal skips the grace delay.
            if let Some(event) = tui.top_bar.force_close() {
                apply_dropdown_change(tui, &app.store, event);
            }
        }
        TuiEvent::InputChar(c) => match command_for_char(*c) {
            Some(TuiEvent::Quit) => return update(app, Action::Quit) == Effect::Quit,
            Some(TuiEvent::ToggleCart) => toggle_panel(app, tui, PanelKind::Cart),
            Some(TuiEvent::ToggleAccount) => toggle_panel(app, tui, PanelKind::Account),
            Some(TuiEvent::ToggleSearch) => toggle_panel(app, tui, PanelKind::Search),
            _ => {}
        },
        _ => {}
    }
    false
}

/// Pointer protocol for the wide surface: entries open on hover, the
/// dropdown body cancels the pending close, anything else schedules it.
fn pointer_move_wide(app: &App, tui: &mut TuiState, col: u16, row: u16, now: Instant) {
    if row == ui::TOP_BAR_ROW {
        if let Some(zone) = tui.top_bar.entry_at(col).cloned() {
            if let Some(event) = tui.top_bar.pointer_enter(&zone.slug, zone.has_children, now) {
                apply_dropdown_change(tui, &app.store, event);
            }
        } else {
            tui.top_bar.pointer_leave(now);
        }
        return;
    }

    if let Some(dropdown) = tui.dropdown.as_mut() {
        if dropdown.contains(col, row) {
            // Cooperating close protocol: entering the panel cancels the
            // pending close immediately.
            tui.top_bar.cancel_close();
            if let Some(slug) = dropdown.category_at(row).map(str::to_string)
                && let Some(event) = dropdown.set_active_category(&slug)
            {
                debug!("category-change: {:?}", event);
            }
        } else {
            tui.top_bar.pointer_leave(now);
        }
    }
}

/// Narrow surface input. Returns true to quit.
fn handle_narrow_event(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    now: Instant,
    ready_timeout: Duration,
) -> bool {
    let Some(menu) = tui.menu.as_mut() else {
        // Menu closed: chrome-level commands only.
        match event {
            TuiEvent::InputChar(c) => match command_for_char(*c) {
                Some(TuiEvent::Quit) => return update(app, Action::Quit) == Effect::Quit,
                Some(TuiEvent::ToggleMenu) => {
                    tui.menu = Some(MenuState::new(now, ready_timeout));
                }
                Some(TuiEvent::ToggleCart) => toggle_panel(app, tui, PanelKind::Cart),
                Some(TuiEvent::ToggleAccount) => toggle_panel(app, tui, PanelKind::Account),
                Some(TuiEvent::ToggleSearch) => toggle_panel(app, tui, PanelKind::Search),
                _ => {}
            },
            TuiEvent::MouseClick(_, row) if *row == 0 => {
                tui.menu = Some(MenuState::new(now, ready_timeout));
            }
            _ => {}
        }
        return false;
    };

    // Search slot first: it owns text input while mounted.
    let search_active = menu.search.as_ref().is_some_and(|s| !s.query().is_empty());
    if let Some(search) = menu.search.as_mut() {
        match event {
            TuiEvent::InputChar(c) if command_for_char(*c).is_none() || search_active => {
                search.handle_event(event);
                return false;
            }
            TuiEvent::Backspace if search_active => {
                search.handle_event(event);
                return false;
            }
            TuiEvent::Submit if search_active => {
                if let Some(SearchEvent::Submitted(query)) = search.handle_event(event) {
                    info!("search submitted: {query}");
                    app.status_message = format!("Searching \"{query}\"...");
                    tui.menu = None;
                }
                return false;
            }
            _ => {}
        }
    }

    let drill_event = match event {
        TuiEvent::Escape => Some(DrillEvent::Close),
        TuiEvent::Submit => menu.drill.as_mut().and_then(|d| d.navigate(&app.store)),
        TuiEvent::Back | TuiEvent::Backspace => {
            menu.drill.as_mut().and_then(|d| d.back(&app.store))
        }
        TuiEvent::CursorUp | TuiEvent::CursorDown => {
            if let Some(drill) = menu.drill.as_mut() {
                drill.handle_event(event);
            }
            None
        }
        TuiEvent::ScrollUp => {
            if let Some(drill) = menu.drill.as_mut() {
                drill.leaf_state.scroll_by(-1);
            }
            None
        }
        TuiEvent::ScrollDown => {
            if let Some(drill) = menu.drill.as_mut() {
                drill.leaf_state.scroll_by(1);
            }
            None
        }
        TuiEvent::MouseClick(_, row) => match menu.drill.as_mut() {
            Some(drill) if *row == 0 => drill.back(&app.store),
            Some(drill) => match drill.row_at(*row) {
                Some(index) => {
                    drill.select(index);
                    drill.navigate(&app.store)
                }
                None => None,
            },
            None => None,
        },
        TuiEvent::InputChar('q') => return update(app, Action::Quit) == Effect::Quit,
        TuiEvent::InputChar('m') => Some(DrillEvent::Close),
        _ => None,
    };

    match drill_event {
        Some(DrillEvent::Forward { level })
        | Some(DrillEvent::Back { level })
        | Some(DrillEvent::ThirdLevelBack { level }) => {
            debug!("drill-down level now {level}");
            menu.sync_search_slot();
        }
        Some(DrillEvent::OpenHref(href)) => {
            // In the storefront this navigates the page away; the preview
            // surfaces the handoff and tears the menu down.
            info!("navigating page to {href}");
            app.status_message = format!("→ {href}");
            tui.menu = None;
        }
        Some(DrillEvent::Close) => {
            // Teardown: the whole subtree (search widget included) drops.
            tui.menu = None;
        }
        None => {}
    }
    false
}

// ── Background content loading ──────────────────────────────────────────────

/// Load the nav document, then discover fragments in document (sorted)
/// order, sending one action per parsed piece. The reducer re-links after
/// every append, so fragment arrival order never matters.
fn spawn_content_load(
    nav_path: std::path::PathBuf,
    fragments_dir: std::path::PathBuf,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "loading content: nav={}, fragments={}",
        nav_path.display(),
        fragments_dir.display()
    );
    tokio::spawn(async move {
        match tokio::fs::read_to_string(&nav_path).await {
            Ok(markup) => {
                if tx.send(Action::TreeReady(build_nav_tree(&markup))).is_err() {
                    warn!("Failed to send TreeReady: receiver dropped");
                    return;
                }
            }
            Err(e) => {
                let message = format!("cannot read {}: {e}", nav_path.display());
                if tx.send(Action::ContentError(message)).is_err() {
                    warn!("Failed to send ContentError: receiver dropped");
                }
                return;
            }
        }

        let mut count = 0usize;
        match tokio::fs::read_dir(&fragments_dir).await {
            Ok(mut entries) => {
                let mut paths = Vec::new();
                while let Ok(Some(entry)) = entries.next_entry().await {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "md") {
                        paths.push(path);
                    }
                }
                // Document order: fragments are discovered sorted by name.
                paths.sort();

                for path in paths {
                    match tokio::fs::read_to_string(&path).await {
                        Ok(markup) => {
                            if let Some(data) = build_level3_data(&markup) {
                                debug!("fragment {} -> '{}'", path.display(), data.id);
                                count += 1;
                                if tx.send(Action::FragmentParsed(data)).is_err() {
                                    warn!("Failed to send FragmentParsed: receiver dropped");
                                    return;
                                }
                            }
                        }
                        Err(e) => warn!("skipping fragment {}: {e}", path.display()),
                    }
                }
            }
            Err(e) => info!("no fragments dir {}: {e}", fragments_dir.display()),
        }

        if tx.send(Action::ContentDone { count }).is_err() {
            warn!("Failed to send ContentDone: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_readiness_waits_then_attaches() {
        let mut store = NavStore::new();
        let t0 = Instant::now();
        let mut menu = MenuState::new(t0, Duration::from_secs(5));
        assert!(!menu.poll_ready(&store, t0));
        assert!(menu.waiting());

        store.set_tree(crate::core::nav::NavTree {
            logo: None,
            entries: vec![NavEntry::Leaf {
                label: "Sale".to_string(),
                href: "/sale".to_string(),
                source: String::new(),
            }],
        });
        assert!(menu.poll_ready(&store, t0 + Duration::from_millis(50)));
        assert!(menu.drill.is_some());
        assert!(menu.search.is_some(), "search slot mounts at level 1");
    }

    #[test]
    fn menu_readiness_times_out_with_error_state() {
        let store = NavStore::new();
        let t0 = Instant::now();
        let mut menu = MenuState::new(t0, Duration::from_millis(100));
        assert!(!menu.poll_ready(&store, t0));
        assert!(menu.poll_ready(&store, t0 + Duration::from_millis(200)));
        assert!(menu.gave_up);
        assert!(!menu.waiting());
    }

    #[test]
    fn resize_debounce_keeps_only_the_latest() {
        let mut tui = TuiState::new(Duration::from_millis(100), Duration::from_millis(150));
        let t0 = Instant::now();
        tui.schedule_resize(80, t0);
        tui.schedule_resize(120, t0 + Duration::from_millis(50));
        // Not settled before the (rescheduled) window elapses.
        assert_eq!(tui.take_settled_resize(t0 + Duration::from_millis(120)), None);
        assert_eq!(
            tui.take_settled_resize(t0 + Duration::from_millis(250)),
            Some(120)
        );
        assert_eq!(tui.take_settled_resize(t0 + Duration::from_millis(300)), None);
    }

    #[test]
    fn poll_timeout_shrinks_to_nearest_deadline() {
        let mut tui = TuiState::new(Duration::from_millis(100), Duration::from_millis(150));
        let t0 = Instant::now();
        assert_eq!(tui.poll_timeout(Duration::from_millis(50), t0), IDLE_POLL);
        tui.schedule_resize(80, t0);
        let timeout = tui.poll_timeout(Duration::from_millis(50), t0);
        assert!(timeout <= Duration::from_millis(150));
        assert!(timeout >= MIN_POLL);
    }
}
