use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::i18n::Dictionary;
use crate::session::widgets::app_finder::ALL_FINDER_APPS;
use crate::session::widgets::phone_simulator::ALL_PHONE_APPS;
use crate::session::widgets::scam_detector::{ALL_ANSWERS, WARNING_SIGNAL_KEYS};
use crate::session::widgets::{
    AppFinder, Exercise, Feedback, MessageComposer, PhoneSimulator, ScamDetector,
};
use crate::ui::layout::text_alignment;
use crate::ui::theme::Theme;

/// Draws the mounted exercise of the current step with its inline feedback.
pub struct ExerciseView<'a> {
    pub exercise: &'a Exercise,
    pub theme: &'a Theme,
    pub dict: Dictionary,
}

impl ExerciseView<'_> {
    fn option_line(&self, number: usize, label: String, highlighted: bool, marked: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let indicator = if highlighted { ">" } else { " " };
        let style = if marked {
            Style::default()
                .fg(colors.selection_fg())
                .bg(colors.selection_bg())
                .add_modifier(Modifier::BOLD)
        } else if highlighted {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        Line::from(Span::styled(format!(" {indicator} [{number}] {label}"), style))
    }

    fn feedback_lines(&self, feedback: Feedback, correct: &[&str], incorrect: &[&str]) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let (keys, color) = match feedback {
            Feedback::None => return Vec::new(),
            Feedback::Correct => (correct, colors.success()),
            Feedback::Incorrect => (incorrect, colors.error()),
        };
        let mut lines = vec![Line::from("")];
        for (i, key) in keys.iter().enumerate() {
            let style = if i == 0 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(self.dict.get(key), style)));
        }
        lines
    }

    fn phone_lines(&self, phone: &PhoneSimulator) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(Span::styled(
                self.dict.get("interactive.phone_simulator.instruction"),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        for (i, app) in ALL_PHONE_APPS.iter().enumerate() {
            let label = format!("{} {}", app.icon(), self.dict.get(app.label_key()));
            lines.push(self.option_line(i + 1, label, i == phone.cursor(), phone.selected() == Some(*app)));
        }
        lines.extend(self.feedback_lines(
            phone.feedback(),
            &["interactive.phone_simulator.success"],
            &[],
        ));
        lines
    }

    fn composer_lines(&self, composer: &MessageComposer) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let dict = &self.dict;
        let label_style = Style::default().fg(colors.muted());

        let mut lines = vec![
            Line::from(Span::styled(
                dict.get("interactive.message_composer.header"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(format!("{} ", dict.get("interactive.message_composer.to_label")), label_style),
                Span::styled(
                    dict.get("interactive.message_composer.to_value"),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(Span::styled(
                dict.get("interactive.message_composer.message_label"),
                label_style,
            )),
        ];

        let input = composer.input();
        let input_style = Style::default().fg(colors.fg());
        let cursor_style = Style::default()
            .fg(colors.bg())
            .bg(colors.fg());
        let input_line = if input.is_empty() && composer.feedback() != Feedback::Correct {
            Line::from(vec![
                Span::raw(" > "),
                Span::styled(" ", cursor_style),
                Span::styled(
                    dict.get("interactive.message_composer.placeholder"),
                    Style::default().fg(colors.muted()),
                ),
            ])
        } else {
            let (before, cursor, after) = input.render_parts();
            let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
            Line::from(vec![
                Span::raw(" > "),
                Span::styled(before.to_string(), input_style),
                Span::styled(cursor_text, cursor_style),
                Span::styled(after.to_string(), input_style),
            ])
        };
        lines.push(input_line);

        let send_style = if composer.can_send() {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.muted())
        };
        lines.push(Line::from(Span::styled(
            format!("   [Enter] {}", dict.get("interactive.message_composer.send")),
            send_style,
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            dict.get("interactive.message_composer.instruction"),
            Style::default().fg(colors.hint()),
        )));

        match composer.feedback() {
            Feedback::None => {}
            Feedback::Correct => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    dict.get("interactive.message_composer.success_title"),
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )));
            }
            Feedback::Incorrect => {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    dict.get("interactive.message_composer.retry_title"),
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    dict.format(
                        "interactive.message_composer.retry_hint",
                        &[("expected", composer.expected())],
                    ),
                    Style::default().fg(colors.fg()),
                )));
            }
        }
        lines
    }

    fn scam_lines(&self, detector: &ScamDetector) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let dict = &self.dict;

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    dict.get("interactive.scam_detector.message_from"),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", dict.get("interactive.scam_detector.message_time")),
                    Style::default().fg(colors.muted()),
                ),
            ]),
            Line::from(Span::styled(
                format!("  \"{}\"", dict.get("interactive.scam_detector.message_text")),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                dict.get("interactive.scam_detector.warning_title"),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        for key in WARNING_SIGNAL_KEYS {
            lines.push(Line::from(Span::styled(
                format!("  ⚠ {}", dict.get(key)),
                Style::default().fg(colors.warning()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            dict.get("interactive.scam_detector.question"),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        for (i, answer) in ALL_ANSWERS.iter().enumerate() {
            lines.push(self.option_line(
                i + 1,
                dict.get(answer.label_key()),
                i == detector.cursor(),
                detector.answer() == Some(*answer),
            ));
        }
        lines.extend(self.feedback_lines(
            detector.feedback(),
            &[
                "interactive.scam_detector.correct_title",
                "interactive.scam_detector.correct_text",
                "interactive.scam_detector.correct_tip",
            ],
            &[
                "interactive.scam_detector.wrong_title",
                "interactive.scam_detector.wrong_text",
            ],
        ));
        if detector.feedback() == Feedback::Incorrect {
            lines.push(self.retry_line("interactive.scam_detector.retry_button"));
        }
        lines
    }

    fn finder_lines(&self, finder: &AppFinder) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let dict = &self.dict;

        let mut lines = vec![
            Line::from(Span::styled(
                dict.get("interactive.app_finder.title"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                dict.get("interactive.app_finder.hint"),
                Style::default().fg(colors.hint()),
            )),
            Line::from(""),
        ];
        for (i, app) in ALL_FINDER_APPS.iter().enumerate() {
            let label = format!("{} {}", app.icon(), dict.get(app.label_key()));
            lines.push(self.option_line(i + 1, label, i == finder.cursor(), finder.selected() == Some(*app)));
        }
        lines.extend(self.feedback_lines(
            finder.feedback(),
            &[
                "interactive.app_finder.correct_title",
                "interactive.app_finder.correct_text",
            ],
            &[
                "interactive.app_finder.wrong_title",
                "interactive.app_finder.wrong_text",
            ],
        ));
        if finder.feedback() == Feedback::Incorrect {
            lines.push(self.retry_line("interactive.app_finder.retry_button"));
        }
        lines
    }

    fn retry_line(&self, key: &str) -> Line<'static> {
        Line::from(Span::styled(
            format!("   [Enter] {}", self.dict.get(key)),
            Style::default()
                .fg(self.theme.colors.accent())
                .add_modifier(Modifier::BOLD),
        ))
    }
}

impl Widget for &ExerciseView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = match self.exercise.feedback() {
            Feedback::None => colors.border_focused(),
            Feedback::Correct => colors.success(),
            Feedback::Incorrect => colors.error(),
        };

        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match self.exercise {
            Exercise::PhoneSimulator(w) => self.phone_lines(w),
            Exercise::MessageComposer(w) => self.composer_lines(w),
            Exercise::ScamDetector(w) => self.scam_lines(w),
            Exercise::AppFinder(w) => self.finder_lines(w),
        };

        Paragraph::new(lines)
            .alignment(text_alignment(self.dict.locale()))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
