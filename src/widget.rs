//! Ratatui rendering for an engine's display buffer.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// One span per character, all sharing `style`.
pub fn display_line(display: &[char], style: Style) -> Line<'static> {
    let spans: Vec<Span<'static>> = display
        .iter()
        .map(|ch| Span::styled(ch.to_string(), style))
        .collect();

    Line::from(spans)
}

/// Renders the current display of a
/// [`ScrambleEngine`](crate::engine::ScrambleEngine).
///
/// The style is passed through to every character unchanged.
pub struct ScrambleText<'a> {
    display: &'a [char],
    style: Style,
    alignment: Alignment,
    block: Option<Block<'a>>,
}

impl<'a> ScrambleText<'a> {
    pub fn new(display: &'a [char]) -> Self {
        Self {
            display,
            style: Style::default(),
            alignment: Alignment::Left,
            block: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for ScrambleText<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut paragraph =
            Paragraph::new(display_line(self.display, self.style)).alignment(self.alignment);
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn line_has_a_span_per_char() {
        let style = Style::default().fg(Color::Cyan);
        let line = display_line(&['A', '#', 'C'], style);
        assert_eq!(line.spans.len(), 3);
        assert!(line.spans.iter().all(|span| span.style == style));
    }

    #[test]
    fn renders_chars_with_uniform_style() {
        let style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);

        ScrambleText::new(&['A', '9', 'C'])
            .style(style)
            .render(area, &mut buf);

        assert_eq!(row(&buf, 0), "A9C  ");
        for x in 0..3 {
            assert_eq!(buf[(x, 0)].fg, Color::Green);
            assert!(buf[(x, 0)].modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn centers_inside_block() {
        let area = Rect::new(0, 0, 7, 3);
        let mut buf = Buffer::empty(area);

        ScrambleText::new(&['O', 'K'])
            .alignment(Alignment::Center)
            .block(Block::bordered())
            .render(area, &mut buf);

        assert_eq!(row(&buf, 1), "│ OK  │");
    }

    #[test]
    fn empty_display_renders_nothing() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        ScrambleText::new(&[]).render(area, &mut buf);
        assert_eq!(row(&buf, 0), "    ");
    }
}
