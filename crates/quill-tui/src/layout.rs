use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

const STATUS_HEIGHT: u16 = 1;
const HINT_HEIGHT: u16 = 1;
const BORDER: u16 = 2;
/// Rows of the chat screen below the transcript: spacer, indicator, input.
const CHAT_FOOTER_ROWS: u16 = 3;

/// The regions that make up the TUI layout.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub body: Rect,
    pub hint_bar: Rect,
}

impl AppLayout {
    /// Calculate layout regions from a `Rect` (terminal area).
    pub fn compute(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(STATUS_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(HINT_HEIGHT),
            ])
            .split(area);

        AppLayout { status_bar: vertical[0], body: vertical[1], hint_bar: vertical[2] }
    }

    /// Convenience wrapper: derive the area from the current frame.
    pub fn new(frame: &Frame) -> Self {
        Self::compute(frame.area())
    }
}

/// Size of the transcript viewport for a terminal of `width` x `height`
/// cells: the body pane's interior minus the chat footer.
pub fn viewport_size(width: u16, height: u16) -> (u16, u16) {
    let w = width.saturating_sub(BORDER).max(1);
    let h = height
        .saturating_sub(STATUS_HEIGHT + HINT_HEIGHT + BORDER + CHAT_FOOTER_ROWS)
        .max(1);
    (w, h)
}
