use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::i18n::Dictionary;
use crate::lesson::Lesson;
use crate::ui::theme::Theme;

pub struct CompletionView<'a> {
    pub lesson: &'a Lesson,
    pub theme: &'a Theme,
    pub dict: Dictionary,
}

impl Widget for &CompletionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dict = &self.dict;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.success()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let top = inner.height.saturating_sub(9) / 2;
        let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
        lines.extend([
            Line::from(Span::styled(
                format!("🎉 {}", dict.get("lesson.congrats_title")),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                dict.get("lesson.completed_lesson_prefix"),
                Style::default().fg(colors.muted()),
            )),
            Line::from(Span::styled(
                self.lesson.title.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                dict.get("lesson.earned_label"),
                Style::default().fg(colors.muted()),
            )),
            Line::from(Span::styled(
                format!("+{} {}", self.lesson.points, dict.get("lessons.points_unit")),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "[Enter] {}   [P] {}",
                    dict.get("lesson.more_lessons"),
                    dict.get("lesson.see_progress")
                ),
                Style::default().fg(colors.hint()),
            )),
        ]);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Shown when a lesson id has no match in the active catalog.
pub struct NotFoundView<'a> {
    pub lesson_id: &'a str,
    pub theme: &'a Theme,
    pub dict: Dictionary,
}

impl Widget for &NotFoundView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.error()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.dict.get("lesson.not_found_title"),
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.lesson_id.to_string(),
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("[Esc] {}", self.dict.get("lesson.back_to_lessons")),
                Style::default().fg(colors.accent()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
