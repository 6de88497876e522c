use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::i18n::Dictionary;
use crate::lesson::Step;
use crate::session::LessonRunner;
use crate::speech::SpeechRate;
use crate::store::FontSize;
use crate::ui::components::exercise::ExerciseView;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::{text_alignment, with_margin, wrapped_line_count};
use crate::ui::theme::Theme;

/// One step of the open lesson: position, text, hint and exercise.
pub struct LessonView<'a> {
    pub runner: &'a LessonRunner,
    pub theme: &'a Theme,
    pub dict: Dictionary,
    pub font_size: FontSize,
    pub narrating: bool,
    pub speech_rate: SpeechRate,
}

impl LessonView<'_> {
    fn step_label(&self) -> String {
        let index = self.runner.step_index().unwrap_or(0);
        format!(
            "{} {} {} {}",
            self.dict.get("lesson.step_label"),
            index + 1,
            self.dict.get("lesson.step_of"),
            self.runner.lesson().step_count()
        )
    }

    fn body_lines(&self, step: &Step) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let dict = &self.dict;
        let spacing = self.font_size.line_spacing();

        let mut lines = vec![
            Line::from(Span::styled(
                step.title.resolve(dict),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for paragraph in step.content.resolve(dict).split('\n') {
            lines.push(Line::from(Span::styled(
                paragraph.to_string(),
                Style::default().fg(colors.fg()),
            )));
            for _ in 0..spacing {
                lines.push(Line::from(""));
            }
        }

        if let Some(hint) = &step.hint {
            lines.push(Line::from(""));
            if self.runner.hint_visible() {
                lines.push(Line::from(Span::styled(
                    format!("💡 {}", hint.resolve(dict)),
                    Style::default().fg(colors.hint()),
                )));
            }
            let toggle = if self.runner.hint_visible() {
                dict.get("lesson.hide_hint")
            } else {
                dict.get("lesson.show_hint")
            };
            lines.push(Line::from(Span::styled(
                format!("[H] {toggle}"),
                Style::default().fg(colors.muted()),
            )));
        }

        lines
    }

    fn navigation_line(&self, step: &Step) -> Line<'static> {
        let colors = &self.theme.colors;
        let dict = &self.dict;
        let enabled = Style::default().fg(colors.accent());
        let disabled = Style::default().fg(colors.muted());

        let first = self.runner.step_index() == Some(0);
        let mut spans = vec![Span::styled(
            format!("← {}", dict.get("lesson.previous")),
            if first { disabled } else { enabled },
        )];
        if step.has_next_action() {
            let next = if self.runner.is_last_step() {
                dict.get("lesson.finish")
            } else {
                dict.get("lesson.next")
            };
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("{next} →"),
                enabled.add_modifier(Modifier::BOLD),
            ));
        }

        let speech = if self.narrating {
            dict.get("lessons.speech_stop")
        } else {
            dict.get("lessons.speech_play")
        };
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            format!(
                "🔊 {speech} · {} {}",
                dict.get("lessons.speech_speed"),
                self.speech_rate.label()
            ),
            Style::default().fg(colors.muted()),
        ));
        Line::from(spans)
    }
}

impl Widget for &LessonView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(step) = self.runner.current_step() else {
            return;
        };

        let block = Block::bordered()
            .title(format!(" {} ", self.runner.lesson().title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = with_margin(block.inner(area), self.font_size.margin());
        block.render(area, buf);

        let body = self.body_lines(step);
        let alignment = text_alignment(self.dict.locale());

        let exercise_height = if self.runner.exercise().is_some() {
            Constraint::Min(10)
        } else {
            Constraint::Length(0)
        };
        let body_height = body
            .iter()
            .map(|line| wrapped_line_count(&line.to_string(), inner.width as usize).max(1))
            .sum::<usize>() as u16;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(body_height.max(3)),
                exercise_height,
                Constraint::Length(1),
            ])
            .split(inner);

        let step_number = self.runner.step_index().map_or(0, |i| i + 1);
        ProgressBar::new(
            self.step_label(),
            step_number,
            self.runner.lesson().step_count(),
            self.theme,
        )
        .render(layout[0], buf);

        Paragraph::new(body)
            .alignment(alignment)
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        if let Some(exercise) = self.runner.exercise() {
            let view = ExerciseView {
                exercise,
                theme: self.theme,
                dict: self.dict,
            };
            (&view).render(layout[2], buf);
        }

        Paragraph::new(self.navigation_line(step))
            .alignment(alignment)
            .render(layout[3], buf);
    }
}
