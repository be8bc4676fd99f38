use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::reconcile::Reconciliation;
use crate::runner::TestResult;
use crate::state::{Phase, SessionState};
use crate::tui::theme::Theme;

/// Right-hand pane: status, celebration, success and failure buckets
pub struct ResultsView<'a> {
    session: &'a SessionState,
    theme: &'a Theme,
    scroll: u16,
}

impl<'a> ResultsView<'a> {
    pub fn new(session: &'a SessionState, theme: &'a Theme) -> Self {
        Self {
            session,
            theme,
            scroll: 0,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let s = self.session;

        if let Some(msg) = s.status_message() {
            let color = if s.is_submitting() {
                self.theme.warning
            } else {
                self.theme.error
            };
            lines.push(Line::from(Span::styled(msg, Style::default().fg(color))));
            return lines;
        }

        let Some(ref rec) = s.reconciliation else {
            lines.push(Line::from(Span::styled(
                "Enter a source and destinations, then press Ctrl+S to run a test.",
                Style::default().fg(self.theme.text_dim),
            )));
            return lines;
        };

        if let Some(headline) = rec.headline(&s.source) {
            let style = if rec.celebrates() {
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text_dim)
            };
            lines.push(Line::from(Span::styled(headline, style)));
            lines.push(Line::from(""));
        }

        self.push_metadata(&mut lines, rec);
        self.push_bucket(
            &mut lines,
            format!("Successful ({})", rec.success_count()),
            &rec.successes,
            rec.successes_placeholder(),
            true,
        );
        lines.push(Line::from(""));
        self.push_bucket(
            &mut lines,
            format!("Failed ({})", rec.failure_count()),
            &rec.failures,
            rec.failures_placeholder(),
            false,
        );

        if !rec.missing.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("No result returned for: {}", rec.missing.join(", ")),
                Style::default().fg(self.theme.warning),
            )));
        }
        if !rec.unrequested.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Results for unrequested destinations: {}", rec.unrequested.join(", ")),
                Style::default().fg(self.theme.text_dim),
            )));
        }

        lines
    }

    fn push_metadata(&self, lines: &mut Vec<Line<'static>>, rec: &Reconciliation) {
        let dim = Style::default().fg(self.theme.text_dim);
        if let Some(job) = rec.job_name() {
            lines.push(Line::from(vec![
                Span::styled("Job:  ", dim),
                Span::styled(job.to_string(), Style::default().fg(self.theme.text)),
            ]));
        }
        if !rec.pod_names().is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Pods: ", dim),
                Span::styled(rec.pod_names().join(", "), Style::default().fg(self.theme.text)),
            ]));
        }
        if rec.job_name().is_some() || !rec.pod_names().is_empty() {
            lines.push(Line::from(""));
        }
    }

    fn push_bucket(
        &self,
        lines: &mut Vec<Line<'static>>,
        title: String,
        results: &[TestResult],
        placeholder: Option<&'static str>,
        success: bool,
    ) {
        let color = if success {
            self.theme.success
        } else {
            self.theme.error
        };
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(self.theme.header).add_modifier(Modifier::BOLD),
        )));

        if let Some(text) = placeholder {
            lines.push(Line::from(Span::styled(
                format!("  {}", text),
                Style::default().fg(self.theme.text_dim),
            )));
            return;
        }

        let mark = if success { "\u{2713}" } else { "\u{2717}" };
        for r in results {
            let mut spans = vec![
                Span::styled(format!("  {} ", mark), Style::default().fg(color)),
                Span::styled(r.destination.clone(), Style::default().fg(self.theme.text)),
            ];
            // FAILED is implied by the bucket; anything else is shown as sent
            if !success && r.status.as_str() != "FAILED" {
                spans.push(Span::styled(
                    format!(" [{}]", r.status),
                    Style::default().fg(self.theme.warning),
                ));
            }
            if let Some(ref d) = r.duration {
                spans.push(Span::styled(
                    format!(" ({})", d),
                    Style::default().fg(self.theme.text_dim),
                ));
            }
            if !r.details.is_empty() {
                spans.push(Span::styled(
                    format!(" - {}", r.details),
                    Style::default().fg(self.theme.text_dim),
                ));
            }
            lines.push(Line::from(spans));
        }
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let phase = self.session.phase;
        let title_color = match phase {
            Phase::Error => self.theme.error,
            Phase::Submitting => self.theme.warning,
            _ => self.theme.header,
        };
        let title = if self.session.source.is_empty() {
            format!(" Results \u{2500}\u{2500} {} ", phase.label())
        } else {
            format!(
                " Results \u{2500}\u{2500} {} \u{2500}\u{2500} {} ",
                self.session.source,
                phase.label()
            )
        };

        let block = Block::default()
            .title(Span::styled(title, Style::default().fg(title_color)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::reconcile::reconcile;
    use crate::runner::{RunMetadata, TestRunResponse};

    fn text(view: &ResultsView) -> Vec<String> {
        view.lines().iter().map(|l| l.to_string()).collect()
    }

    fn displayed(results: Vec<TestResult>, metadata: Option<RunMetadata>) -> SessionState {
        let mut state = SessionState::default();
        let token = state.begin_submit("cluster-a");
        let mut response = TestRunResponse::new(results);
        if let Some(m) = metadata {
            response = response.with_metadata(m);
        }
        let rec = reconcile(&response);
        state.complete(token, response, rec);
        state
    }

    #[test]
    fn test_idle_hint() {
        let state = SessionState::default();
        let theme = Theme::default();
        let lines = text(&ResultsView::new(&state, &theme));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Ctrl+S"));
    }

    #[test]
    fn test_celebration_and_metadata() {
        let meta = RunMetadata {
            kubernetes_job_name: Some("job-1".into()),
            kubernetes_pod_names: Some(vec!["pod-a".into()]),
        };
        let state = displayed(
            vec![TestResult::new("a:1", "SUCCESS", "ok").with_duration("12ms")],
            Some(meta),
        );
        let theme = Theme::default();
        let lines = text(&ResultsView::new(&state, &theme));

        assert_eq!(lines[0], "Hooray! All 1 connection(s) from cluster-a were successful!");
        assert!(lines.contains(&"Job:  job-1".to_string()));
        assert!(lines.contains(&"Pods: pod-a".to_string()));
        assert!(lines.contains(&"  \u{2713} a:1 (12ms) - ok".to_string()));
        assert!(lines.contains(&"  No failed connections.".to_string()));
    }

    #[test]
    fn test_failures_show_non_standard_status() {
        let state = displayed(
            vec![
                TestResult::new("a:1", "FAILED", "timeout"),
                TestResult::new("b:2", "TIMEOUT", ""),
            ],
            None,
        );
        let theme = Theme::default();
        let lines = text(&ResultsView::new(&state, &theme));

        assert!(lines.contains(&"  No successful connections.".to_string()));
        assert!(lines.contains(&"  \u{2717} a:1 - timeout".to_string()));
        assert!(lines.contains(&"  \u{2717} b:2 [TIMEOUT]".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("Hooray")));
    }

    #[test]
    fn test_empty_run() {
        let state = displayed(vec![], None);
        let theme = Theme::default();
        let lines = text(&ResultsView::new(&state, &theme));
        assert_eq!(lines[0], "No test results to display for cluster-a.");
        assert_eq!(lines.iter().filter(|l| l.as_str() == "  None").count(), 2);
    }

    #[test]
    fn test_validation_and_pending_messages() {
        let theme = Theme::default();

        let mut state = SessionState::default();
        state.reject(ValidationError::EmptySource);
        let lines = text(&ResultsView::new(&state, &theme));
        assert_eq!(lines, vec!["Error: Source (Kubernetes Cluster Name) cannot be empty."]);

        let mut state = SessionState::default();
        state.begin_submit("cluster-b");
        let lines = text(&ResultsView::new(&state, &theme));
        assert_eq!(lines, vec!["Testing connectivity from cluster-b..."]);
    }
}
