use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::engine::summary::ProgressSummary;
use crate::i18n::Dictionary;
use crate::store::FontSize;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::{centered_rect, text_alignment, with_margin};
use crate::ui::theme::Theme;

pub struct ProgressView<'a> {
    pub summary: &'a ProgressSummary<'a>,
    pub confirm_reset: bool,
    pub font_size: FontSize,
    pub theme: &'a Theme,
    pub dict: Dictionary,
}

impl ProgressView<'_> {
    fn stat_line(&self, label_key: &str, value: String) -> Line<'static> {
        let colors = &self.theme.colors;
        Line::from(vec![
            Span::styled(
                format!("  {}: ", self.dict.get(label_key)),
                Style::default().fg(colors.muted()),
            ),
            Span::styled(
                value,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ])
    }

    fn heading(&self, key: &str) -> Line<'static> {
        Line::from(Span::styled(
            self.dict.get(key),
            Style::default()
                .fg(self.theme.colors.fg())
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let dict = &self.dict;
        let summary = self.summary;

        let mut lines = vec![
            self.stat_line(
                "progress.stats_completed",
                format!("{}/{}", summary.completed, summary.total),
            ),
            self.stat_line("progress.stats_points", summary.points.to_string()),
            self.stat_line(
                "progress.stats_time",
                format!("{} {}", summary.minutes, dict.get("lessons.duration_unit")),
            ),
            Line::from(""),
            self.heading("progress.achievements"),
        ];

        if summary.badges.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", dict.get("progress.achievements_empty")),
                Style::default().fg(colors.muted()),
            )));
        }
        for badge in &summary.badges {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} {}", badge.icon(), dict.get(&badge.title_key())),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", dict.get(&badge.description_key())),
                    Style::default().fg(colors.muted()),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(self.heading("progress.recent_activity"));
        if summary.recent.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", dict.get("progress.recent_activity_empty")),
                Style::default().fg(colors.muted()),
            )));
        }
        for lesson in &summary.recent {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  ✓ {}", lesson.title),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("  +{} {}", lesson.points, dict.get("lessons.points_unit")),
                    Style::default().fg(colors.success()),
                ),
            ]));
        }
        if let Some(updated) = summary.last_updated {
            lines.push(Line::from(Span::styled(
                format!(
                    "  {} {}",
                    dict.get("progress.completed_on"),
                    updated.format("%Y-%m-%d")
                ),
                Style::default().fg(colors.muted()),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[X] {}", dict.get("progress.reset")),
            Style::default().fg(colors.error()),
        )));
        lines
    }

    fn render_confirm(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let popup = centered_rect(50, 25, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!(" {} ", self.dict.get("progress.reset")))
            .border_style(Style::default().fg(colors.error()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.dict.get("progress.reset_confirm"),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                self.dict.get("keys.confirm"),
                Style::default().fg(colors.accent()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

impl Widget for &ProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.dict.get("progress.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = with_margin(block.inner(area), self.font_size.margin());
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.dict.get("progress.subtitle"),
            Style::default().fg(colors.muted()),
        )))
        .alignment(text_alignment(self.dict.locale()))
        .render(layout[0], buf);

        ProgressBar::new(
            self.dict.get("progress.overall_progress"),
            self.summary.completed,
            self.summary.total,
            self.theme,
        )
        .render(layout[1], buf);

        Paragraph::new(self.detail_lines())
            .alignment(text_alignment(self.dict.locale()))
            .wrap(Wrap { trim: false })
            .render(layout[2], buf);

        if self.confirm_reset {
            self.render_confirm(area, buf);
        }
    }
}
