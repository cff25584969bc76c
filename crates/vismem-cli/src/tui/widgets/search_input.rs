use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

const FOCUSED_TITLE: &str = " Search (Enter to submit, Tab for suggestions, Esc to cancel) ";
const IDLE_TITLE: &str = " Search (press /) ";

/// Single-line query input. `cursor` is a character index into `text`,
/// never a byte offset, so multibyte input renders the same as ASCII.
pub struct SearchInput<'a> {
    pub text: &'a str,
    pub cursor: usize,
    pub focused: bool,
}

impl SearchInput<'_> {
    /// Split the text into (before cursor, character under cursor,
    /// after cursor), counting in characters. Past the end of the text
    /// the cursor sits on a space.
    fn split_at_cursor(&self) -> (String, char, String) {
        let mut chars = self.text.chars();
        let before: String = chars.by_ref().take(self.cursor).collect();
        let under = chars.next().unwrap_or(' ');
        (before, under, chars.collect())
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }))
            .title(if self.focused { FOCUSED_TITLE } else { IDLE_TITLE });

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let prompt = Span::styled("❯ ", Style::default().fg(Color::Cyan));
        let line = if self.focused {
            let (before, under, after) = self.split_at_cursor();
            let cursor_cell = Span::styled(
                under.to_string(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
            Line::from(vec![prompt, Span::raw(before), cursor_cell, Span::raw(after)])
        } else {
            Line::from(vec![prompt, Span::raw(self.text)])
        };
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }
}
