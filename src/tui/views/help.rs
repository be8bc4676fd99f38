use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::tui::theme::Theme;

const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("Tab/S-Tab ", "Next / previous pane"),
    ("C-s / F5  ", "Run the test"),
    ("C-e       ", "Export results to CSV"),
    ("C-t       ", "Cycle theme"),
    ("PgUp/PgDn ", "Scroll results"),
    ("C-u       ", "Clear the focused field"),
    ("F1        ", "Show this help"),
    ("C-c       ", "Quit"),
];

const CATALOG_KEYS: &[(&str, &str)] = &[
    ("Up/k Dn/j ", "Move"),
    ("Space     ", "Select / deselect"),
    ("a / Enter ", "Add selection to the list"),
    ("c         ", "Clear selection"),
    ("e t ? q   ", "Export, theme, help, quit"),
];

/// Help overlay
pub struct HelpView<'a> {
    theme: &'a Theme,
}

impl<'a> HelpView<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn key_line(&self, key: &'static str, what: &'static str) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {}", key), Style::default().fg(self.theme.shortcut)),
            Span::raw(what),
        ])
    }
}

impl Widget for HelpView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Calculate centered popup area
        let popup_width = 50.min(area.width.saturating_sub(4));
        let popup_height = 22.min(area.height.saturating_sub(4));
        let popup_x = (area.width - popup_width) / 2 + area.x;
        let popup_y = (area.height - popup_height) / 2 + area.y;
        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(format!(" Help - conncheck {} ", env!("CARGO_PKG_VERSION")))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused));

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let mut lines = vec![Line::from("")];
        lines.extend(GLOBAL_KEYS.iter().map(|&(k, w)| self.key_line(k, w)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Catalog pane:",
            Style::default().fg(self.theme.header),
        )));
        lines.extend(CATALOG_KEYS.iter().map(|&(k, w)| self.key_line(k, w)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(self.theme.text_dim),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
