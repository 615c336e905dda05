use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Session-level actions, independent of key binding.  Keys that only
/// edit or navigate inside a widget are left to that widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Accept the current input (description, chat message, final screen).
    Accept,
    /// Leave the session without finishing.
    Cancel,
    /// Terminate immediately from any stage.
    Interrupt,
    /// Save the latest draft and end the conversation.
    Finish,
}

/// Map a raw key event to an [`Action`].
///
/// `text_box_focused` — the multi-line description box owns the keyboard.
/// There Enter inserts a newline and Esc accepts the description.
pub fn map_key(event: &KeyEvent, text_box_focused: bool) -> Option<Action> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    match event.code {
        KeyCode::Char('c') if ctrl => Some(Action::Interrupt),
        KeyCode::Char('s') if ctrl => Some(Action::Finish),

        KeyCode::Esc if text_box_focused => Some(Action::Accept),
        KeyCode::Esc => Some(Action::Cancel),

        KeyCode::Enter if text_box_focused => None,
        KeyCode::Enter if !ctrl && !alt => Some(Action::Accept),

        _ => None,
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
