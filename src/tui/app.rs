use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use parking_lot::RwLock;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use scopeguard::defer;
use std::collections::BTreeSet;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::catalog::CatalogState;
use crate::controller::SessionController;
use crate::destinations;
use crate::error::ExportError;
use crate::state::SessionState;
use crate::tui::theme::Theme;
use crate::tui::views::{FormView, HelpView, ResultsView};

/// Catalog slot filled by the background load
pub type SharedCatalog = Arc<RwLock<CatalogState>>;

/// Which pane receives typed keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Source,
    Destinations,
    Catalog,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Source => Self::Destinations,
            Self::Destinations => Self::Catalog,
            Self::Catalog => Self::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Source => Self::Catalog,
            Self::Destinations => Self::Source,
            Self::Catalog => Self::Destinations,
        }
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Submit,
    Export,
    Quit,
}

/// UI state
#[derive(Default)]
pub struct UiState {
    pub focus: Focus,
    /// Source input
    pub source: String,
    /// Free-text destinations input
    pub destinations_text: String,
    /// Highlighted catalog row
    pub catalog_cursor: usize,
    /// Selected catalog rows
    pub catalog_selected: BTreeSet<usize>,
    /// Names or addresses to select once the catalog arrives
    pub preselect: Vec<String>,
    /// Show help overlay
    pub show_help: bool,
    /// Status message to display
    pub status_message: Option<(String, Instant)>,
    /// Current theme index
    pub theme_index: usize,
    /// Vertical scroll of the results pane
    pub results_scroll: u16,
}

impl UiState {
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    pub fn clear_old_status(&mut self) {
        if let Some((_, time)) = &self.status_message
            && time.elapsed() > Duration::from_secs(3)
        {
            self.status_message = None;
        }
    }

    pub fn theme_name(&self) -> &'static str {
        let names = Theme::list();
        names[self.theme_index % names.len()]
    }

    /// Addresses of the selected catalog rows, in catalog order
    pub fn selected_addresses(&self, catalog: &CatalogState) -> Vec<String> {
        let entries = catalog.entries();
        self.catalog_selected
            .iter()
            .filter_map(|&i| entries.get(i))
            .map(|e| e.address.clone())
            .collect()
    }

    /// Apply pending pre-selections once entries are available
    pub fn apply_preselect(&mut self, catalog: &CatalogState) {
        if self.preselect.is_empty() || matches!(catalog, CatalogState::Loading) {
            return;
        }
        for wanted in std::mem::take(&mut self.preselect) {
            match catalog.position(&wanted) {
                Some(i) => {
                    self.catalog_selected.insert(i);
                }
                None => self.set_status(format!("Not in catalog: {}", wanted)),
            }
        }
    }

    /// Update state for one key press
    pub fn handle_key(&mut self, key: KeyEvent, catalog: &CatalogState) -> Action {
        // Handle overlays first
        if self.show_help {
            self.show_help = false;
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('s') if ctrl => return Action::Submit,
            KeyCode::F(5) => return Action::Submit,
            KeyCode::Char('e') if ctrl => return Action::Export,
            KeyCode::Char('t') if ctrl => {
                self.cycle_theme();
                return Action::None;
            }
            KeyCode::F(1) => {
                self.show_help = true;
                return Action::None;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Action::None;
            }
            KeyCode::PageDown => {
                self.results_scroll = self.results_scroll.saturating_add(5);
                return Action::None;
            }
            KeyCode::PageUp => {
                self.results_scroll = self.results_scroll.saturating_sub(5);
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Source => {
                match key.code {
                    KeyCode::Enter => self.focus = Focus::Destinations,
                    _ => edit_text(&mut self.source, key, false),
                }
                Action::None
            }
            Focus::Destinations => {
                edit_text(&mut self.destinations_text, key, true);
                Action::None
            }
            Focus::Catalog => self.handle_catalog_key(key, catalog),
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent, catalog: &CatalogState) -> Action {
        let count = catalog.entries().len();
        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('e') => return Action::Export,
            KeyCode::Char('?') | KeyCode::Char('h') => self.show_help = true,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Up | KeyCode::Char('k') => {
                if count > 0 {
                    self.catalog_cursor = if self.catalog_cursor == 0 {
                        count - 1
                    } else {
                        self.catalog_cursor.min(count) - 1
                    };
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    self.catalog_cursor = (self.catalog_cursor + 1) % count;
                }
            }
            KeyCode::Char(' ') => {
                if self.catalog_cursor < count && !self.catalog_selected.remove(&self.catalog_cursor) {
                    self.catalog_selected.insert(self.catalog_cursor);
                }
            }
            KeyCode::Char('a') | KeyCode::Enter => {
                let selections = self.selected_addresses(catalog);
                if selections.is_empty() {
                    self.set_status("No catalog destinations selected");
                } else {
                    self.destinations_text =
                        destinations::add_to_editable(&self.destinations_text, &selections);
                    self.set_status(format!("Added {} destination(s) to the list", selections.len()));
                }
            }
            KeyCode::Char('c') => self.catalog_selected.clear(),
            _ => {}
        }
        Action::None
    }

    fn cycle_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % Theme::list().len();
        self.set_status(format!("Theme: {}", self.theme_name()));
    }
}

/// Append/erase on a text field. Ctrl+U clears it.
fn edit_text(text: &mut String, key: KeyEvent, multiline: bool) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => text.clear(),
        KeyCode::Char(c) if !ctrl => text.push(c),
        KeyCode::Enter if multiline => text.push('\n'),
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {}
    }
}

/// What the session looked like when the TUI closed
#[derive(Debug, Clone)]
pub struct TuiOutcome {
    pub theme: String,
    pub source: String,
}

/// Run the TUI application. Returns the final theme and source for persistence.
pub async fn run_tui(
    controller: SessionController,
    catalog: SharedCatalog,
    ui_state: UiState,
    cancel: CancellationToken,
) -> Result<TuiOutcome> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    // Ensure terminal is restored on any exit (success, error, or panic)
    defer! {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut ui_state = ui_state;
    let tick_rate = Duration::from_millis(100);

    run_app(&mut terminal, &controller, &catalog, &mut ui_state, cancel, tick_rate).await?;

    Ok(TuiOutcome {
        theme: ui_state.theme_name().to_string(),
        source: ui_state.source.trim().to_string(),
    })
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &SessionController,
    catalog: &SharedCatalog,
    ui_state: &mut UiState,
    cancel: CancellationToken,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        ui_state.clear_old_status();
        ui_state.apply_preselect(&catalog.read());

        let theme = Theme::by_name(ui_state.theme_name());

        terminal.draw(|f| {
            let session = controller.state().read();
            let catalog = catalog.read();
            draw_ui(f, &session, &catalog, ui_state, &theme);
        })?;

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let action = ui_state.handle_key(key, &catalog.read());
            match action {
                Action::None => {}
                Action::Quit => {
                    cancel.cancel();
                    break;
                }
                Action::Submit => submit(controller, catalog, ui_state),
                Action::Export => export(controller, ui_state),
            }
        }
    }

    Ok(())
}

/// Validate and start a submit; the network half runs on its own task
fn submit(controller: &SessionController, catalog: &SharedCatalog, ui_state: &mut UiState) {
    let selections = ui_state.selected_addresses(&catalog.read());
    match controller.prepare(&ui_state.source, &ui_state.destinations_text, &selections) {
        Ok(pending) => {
            ui_state.results_scroll = 0;
            let controller = controller.clone();
            tokio::spawn(async move {
                let outcome = controller.run(pending).await;
                debug!(?outcome, "submit finished");
            });
        }
        Err(_) => {
            // The rejection is stored in the session and shown in the results pane
            ui_state.results_scroll = 0;
        }
    }
}

fn export(controller: &SessionController, ui_state: &mut UiState) {
    match controller.export_to_file() {
        Ok(path) => ui_state.set_status(format!("Exported to {}", path.display())),
        Err(ExportError::Empty) => ui_state.set_status("No results to export"),
        Err(e) => ui_state.set_status(format!("Export failed: {}", e)),
    }
}

fn draw_ui(
    f: &mut ratatui::Frame,
    session: &SessionState,
    catalog: &CatalogState,
    ui_state: &UiState,
    theme: &Theme,
) {
    let area = f.area();

    // Layout: form | results, status bar below
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[0]);

    f.render_widget(FormView::new(ui_state, catalog, theme), columns[0]);
    f.render_widget(
        ResultsView::new(session, theme).scroll(ui_state.results_scroll),
        columns[1],
    );

    // Status bar
    let status_text = if let Some((ref msg, _)) = ui_state.status_message {
        msg.clone()
    } else {
        match ui_state.focus {
            Focus::Catalog => {
                "Space select | a add to list | C-s submit | e export | t theme | ? help | q quit"
                    .to_string()
            }
            _ => "Tab next pane | C-s/F5 submit | C-e export | C-t theme | F1 help | C-c quit"
                .to_string(),
        }
    };

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(theme.text_dim));
    f.render_widget(status_bar, rows[1]);

    // Overlays
    if ui_state.show_help {
        f.render_widget(HelpView::new(theme), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(ui: &mut UiState, catalog: &CatalogState, s: &str) {
        for c in s.chars() {
            ui.handle_key(key(KeyCode::Char(c)), catalog);
        }
    }

    fn catalog() -> CatalogState {
        CatalogState::Loaded(vec![
            CatalogEntry::new("Google DNS", "8.8.8.8:53"),
            CatalogEntry::new("Cloudflare", "1.1.1.1:53"),
            CatalogEntry::new("Internal", "10.0.0.1:443"),
        ])
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let cat = CatalogState::Empty;
        let mut ui = UiState::default();
        type_str(&mut ui, &cat, "prod-eu");
        ui.handle_key(key(KeyCode::Backspace), &cat);
        assert_eq!(ui.source, "prod-e");

        ui.handle_key(key(KeyCode::Enter), &cat);
        assert_eq!(ui.focus, Focus::Destinations);
        type_str(&mut ui, &cat, "a:1");
        ui.handle_key(key(KeyCode::Enter), &cat);
        type_str(&mut ui, &cat, "q");
        assert_eq!(ui.destinations_text, "a:1\nq");

        ui.handle_key(ctrl('u'), &cat);
        assert!(ui.destinations_text.is_empty());
    }

    #[test]
    fn test_global_keys() {
        let cat = CatalogState::Empty;
        let mut ui = UiState::default();
        assert_eq!(ui.handle_key(ctrl('s'), &cat), Action::Submit);
        assert_eq!(ui.handle_key(key(KeyCode::F(5)), &cat), Action::Submit);
        assert_eq!(ui.handle_key(ctrl('e'), &cat), Action::Export);
        assert_eq!(ui.handle_key(ctrl('c'), &cat), Action::Quit);
        // Plain letters in a text field are text, not commands
        assert_eq!(ui.handle_key(key(KeyCode::Char('q')), &cat), Action::None);
        assert_eq!(ui.source, "q");
    }

    #[test]
    fn test_focus_cycles() {
        let cat = CatalogState::Empty;
        let mut ui = UiState::default();
        ui.handle_key(key(KeyCode::Tab), &cat);
        ui.handle_key(key(KeyCode::Tab), &cat);
        assert_eq!(ui.focus, Focus::Catalog);
        ui.handle_key(key(KeyCode::Tab), &cat);
        assert_eq!(ui.focus, Focus::Source);
        ui.handle_key(key(KeyCode::BackTab), &cat);
        assert_eq!(ui.focus, Focus::Catalog);
    }

    #[test]
    fn test_catalog_select_and_add() {
        let cat = catalog();
        let mut ui = UiState {
            focus: Focus::Catalog,
            destinations_text: "8.8.8.8:53, x:1".to_string(),
            ..Default::default()
        };

        ui.handle_key(key(KeyCode::Char(' ')), &cat);
        ui.handle_key(key(KeyCode::Down), &cat);
        ui.handle_key(key(KeyCode::Down), &cat);
        ui.handle_key(key(KeyCode::Char(' ')), &cat);
        assert_eq!(ui.selected_addresses(&cat), vec!["8.8.8.8:53", "10.0.0.1:443"]);

        ui.handle_key(key(KeyCode::Char('a')), &cat);
        assert_eq!(ui.destinations_text, "8.8.8.8:53\nx:1\n10.0.0.1:443");

        // Toggle off
        ui.handle_key(key(KeyCode::Char(' ')), &cat);
        assert_eq!(ui.selected_addresses(&cat), vec!["8.8.8.8:53"]);

        ui.handle_key(key(KeyCode::Up), &cat);
        ui.handle_key(key(KeyCode::Up), &cat);
        ui.handle_key(key(KeyCode::Up), &cat);
        assert_eq!(ui.catalog_cursor, 2);
    }

    #[test]
    fn test_catalog_command_keys() {
        let cat = catalog();
        let mut ui = UiState {
            focus: Focus::Catalog,
            ..Default::default()
        };
        assert_eq!(ui.handle_key(key(KeyCode::Char('e')), &cat), Action::Export);
        ui.handle_key(key(KeyCode::Char('t')), &cat);
        assert_eq!(ui.theme_name(), "dracula");
        ui.handle_key(key(KeyCode::Char('?')), &cat);
        assert!(ui.show_help);
        // Any key closes help without acting
        assert_eq!(ui.handle_key(key(KeyCode::Char('q')), &cat), Action::None);
        assert!(!ui.show_help);
        assert_eq!(ui.handle_key(key(KeyCode::Char('q')), &cat), Action::Quit);
    }

    #[test]
    fn test_space_on_empty_catalog_is_noop() {
        let cat = CatalogState::Unavailable("down".into());
        let mut ui = UiState {
            focus: Focus::Catalog,
            ..Default::default()
        };
        ui.handle_key(key(KeyCode::Char(' ')), &cat);
        ui.handle_key(key(KeyCode::Down), &cat);
        assert!(ui.catalog_selected.is_empty());
        assert_eq!(ui.catalog_cursor, 0);
    }

    #[test]
    fn test_preselect_waits_for_catalog() {
        let mut ui = UiState {
            preselect: vec!["Cloudflare".into(), "nope".into()],
            ..Default::default()
        };
        ui.apply_preselect(&CatalogState::Loading);
        assert_eq!(ui.preselect.len(), 2);

        let cat = catalog();
        ui.apply_preselect(&cat);
        assert!(ui.preselect.is_empty());
        assert_eq!(ui.selected_addresses(&cat), vec!["1.1.1.1:53"]);
        assert_eq!(ui.status_message.as_ref().map(|(m, _)| m.as_str()), Some("Not in catalog: nope"));
    }
}
