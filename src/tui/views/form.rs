use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap};

use crate::catalog::CatalogState;
use crate::tui::app::{Focus, UiState};
use crate::tui::theme::Theme;

const CURSOR: &str = "\u{258f}";

/// Left-hand input form: source, free-text destinations, catalog
pub struct FormView<'a> {
    ui: &'a UiState,
    catalog: &'a CatalogState,
    theme: &'a Theme,
}

impl<'a> FormView<'a> {
    pub fn new(ui: &'a UiState, catalog: &'a CatalogState, theme: &'a Theme) -> Self {
        Self { ui, catalog, theme }
    }

    fn block(&self, title: &'a str, pane: Focus) -> Block<'a> {
        let color = if self.ui.focus == pane {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        Block::default()
            .title(Span::styled(title, Style::default().fg(self.theme.header)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
    }

    fn text_with_cursor(&self, text: &str, pane: Focus) -> String {
        if self.ui.focus == pane {
            format!("{}{}", text, CURSOR)
        } else {
            text.to_string()
        }
    }

    fn render_catalog(&self, area: Rect, buf: &mut Buffer) {
        let selected = self.ui.catalog_selected.len();
        let title = if selected > 0 {
            format!(" Catalog ({} selected) ", selected)
        } else {
            " Catalog ".to_string()
        };
        let color = if self.ui.focus == Focus::Catalog {
            self.theme.border_focused
        } else {
            self.theme.border
        };
        let block = Block::default()
            .title(Span::styled(title, Style::default().fg(self.theme.header)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        if let Some(label) = self.catalog.placeholder() {
            let mut lines = vec![Line::from(Span::styled(
                label,
                Style::default().fg(self.theme.text_dim),
            ))];
            if let CatalogState::Unavailable(reason) = self.catalog {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    CatalogState::UNAVAILABLE_HINT,
                    Style::default().fg(self.theme.warning),
                )));
                lines.push(Line::from(Span::styled(
                    reason.as_str(),
                    Style::default().fg(self.theme.text_dim),
                )));
            }
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let mark = if self.ui.catalog_selected.contains(&i) {
                    Span::styled("[x] ", Style::default().fg(self.theme.success))
                } else {
                    Span::styled("[ ] ", Style::default().fg(self.theme.text_dim))
                };
                ListItem::new(Line::from(vec![
                    mark,
                    Span::styled(entry.label(), Style::default().fg(self.theme.text)),
                ]))
            })
            .collect();

        let mut state = ListState::default();
        if self.ui.focus == Focus::Catalog {
            state.select(Some(self.ui.catalog_cursor));
        }

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(self.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

impl Widget for FormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(45),
                Constraint::Min(4),
            ])
            .split(area);

        let source = self.text_with_cursor(&self.ui.source, Focus::Source);
        Paragraph::new(source)
            .style(Style::default().fg(self.theme.text))
            .block(self.block(" Source (cluster) ", Focus::Source))
            .render(chunks[0], buf);

        let dests = self.text_with_cursor(&self.ui.destinations_text, Focus::Destinations);
        Paragraph::new(dests)
            .style(Style::default().fg(self.theme.text))
            .wrap(Wrap { trim: false })
            .block(self.block(" Destinations (comma or newline separated) ", Focus::Destinations))
            .render(chunks[1], buf);

        self.render_catalog(chunks[2], buf);
    }
}
