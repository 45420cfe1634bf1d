use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};

/// TUI-specific input events
pub enum TuiEvent {
    // Session control
    ForceQuit, // Ctrl+C always quits
    Quit,      // 'q' outside text entry
    Escape,
    Submit,

    // Navigation
    CursorUp,
    CursorDown,
    Back, // Left arrow: drill-down back / leave third-level view

    // Panels and menu
    ToggleCart,    // 'c'
    ToggleAccount, // 'a'
    ToggleSearch,  // '/'
    ToggleMenu,    // 'm' on the narrow surface

    // Text entry (search slot)
    InputChar(char),
    Backspace,

    // Pointer
    MouseMove(u16, u16),
    MouseClick(u16, u16),
    ScrollUp,
    ScrollDown,

    // Viewport
    Resize(u16, u16),
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if event::poll(timeout).unwrap_or(false) {
        match event::read().ok()? {
            Event::Key(key_event) => {
                log::debug!(
                    "Key event: {:?} with modifiers {:?}",
                    key_event.code,
                    key_event.modifiers
                );
                match (key_event.modifiers, key_event.code) {
                    (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                    (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                    (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                    (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                    (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                    (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                    (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                    (_, KeyCode::Left) => Some(TuiEvent::Back),
                    _ => None,
                }
            }
            Event::Mouse(mouse_event) => match mouse_event.kind {
                MouseEventKind::Moved => {
                    Some(TuiEvent::MouseMove(mouse_event.column, mouse_event.row))
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
                }
                MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
                MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
                _ => None,
            },
            Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
            _ => None,
        }
    } else {
        None
    }
}

/// Map bare character input onto command events, for contexts where no
/// text entry is focused.
pub fn command_for_char(c: char) -> Option<TuiEvent> {
    match c {
        'q' => Some(TuiEvent::Quit),
        'c' => Some(TuiEvent::ToggleCart),
        'a' => Some(TuiEvent::ToggleAccount),
        '/' => Some(TuiEvent::ToggleSearch),
        'm' => Some(TuiEvent::ToggleMenu),
        _ => None,
    }
}
