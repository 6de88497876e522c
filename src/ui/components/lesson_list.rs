use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::listing::{LessonStatus, ListingEntry};
use crate::i18n::Dictionary;
use crate::store::FontSize;
use crate::ui::layout::{text_alignment, with_margin};
use crate::ui::theme::Theme;

/// Lessons grouped under category headings, one selectable row each.
pub struct LessonList<'a> {
    pub entries: &'a [ListingEntry<'a>],
    pub selected: usize,
    pub points: u32,
    pub font_size: FontSize,
    pub theme: &'a Theme,
    pub dict: Dictionary,
}

impl LessonList<'_> {
    fn status_span(&self, status: LessonStatus) -> Span<'static> {
        let colors = &self.theme.colors;
        match status {
            LessonStatus::Locked => Span::styled(
                format!("🔒 {}", self.dict.get("lessons.locked")),
                Style::default().fg(colors.muted()),
            ),
            LessonStatus::Completed => Span::styled(
                format!("✓ {}", self.dict.get("lessons.repeat")),
                Style::default().fg(colors.success()),
            ),
            LessonStatus::Available => Span::styled(
                format!("▶ {}", self.dict.get("lessons.start")),
                Style::default().fg(colors.accent()),
            ),
        }
    }

    /// Builds the rows and returns the line index of the selected entry.
    fn build_lines(&self) -> (Vec<Line<'static>>, usize) {
        let colors = &self.theme.colors;
        let dict = &self.dict;
        let spacing = self.font_size.line_spacing();

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut selected_line = 0;
        let mut current_category = None;

        for (i, entry) in self.entries.iter().enumerate() {
            let lesson = entry.lesson;
            if current_category != Some(lesson.category) {
                if current_category.is_some() {
                    lines.push(Line::from(""));
                }
                current_category = Some(lesson.category);
                lines.push(Line::from(Span::styled(
                    format!("{} {}", lesson.category.icon(), dict.get(lesson.category.label_key())),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )));
            }

            let is_selected = i == self.selected;
            if is_selected {
                selected_line = lines.len();
            }
            let indicator = if is_selected { ">" } else { " " };
            let title_style = match (is_selected, entry.status) {
                (true, _) => Style::default()
                    .fg(colors.selection_fg())
                    .bg(colors.selection_bg())
                    .add_modifier(Modifier::BOLD),
                (false, LessonStatus::Locked) => Style::default().fg(colors.muted()),
                (false, _) => Style::default().fg(colors.fg()),
            };

            lines.push(Line::from(vec![
                Span::styled(format!(" {indicator} {}", lesson.title), title_style),
                Span::raw("  "),
                self.status_span(entry.status),
            ]));
            lines.push(Line::from(Span::styled(
                format!(
                    "     {} · {} {} · {} {}",
                    dict.get(lesson.difficulty.label_key()),
                    lesson.duration_minutes,
                    dict.get("lessons.duration_unit"),
                    lesson.points,
                    dict.get("lessons.points_unit"),
                ),
                Style::default().fg(colors.muted()),
            )));
            let description = if entry.status == LessonStatus::Locked {
                dict.get("lessons.complete_previous")
            } else {
                lesson.description.clone()
            };
            lines.push(Line::from(Span::styled(
                format!("     {description}"),
                Style::default().fg(colors.fg()),
            )));
            for _ in 0..spacing {
                lines.push(Line::from(""));
            }
        }

        (lines, selected_line)
    }
}

impl Widget for &LessonList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " {}  ·  {}: {} ",
                self.dict.get("lessons.title"),
                self.dict.get("lessons.your_points"),
                self.points
            ))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = with_margin(block.inner(area), self.font_size.margin());
        block.render(area, buf);

        if inner.height < 2 {
            return;
        }

        let intro = Line::from(Span::styled(
            self.dict.get("lessons.intro"),
            Style::default().fg(colors.muted()),
        ));
        let intro_area = Rect::new(inner.x, inner.y, inner.width, 1);
        Paragraph::new(intro).render(intro_area, buf);

        let list_area = Rect::new(inner.x, inner.y + 2, inner.width, inner.height.saturating_sub(2));
        let (lines, selected_line) = self.build_lines();

        // Keep the selected row and its detail lines on screen.
        let visible = list_area.height as usize;
        let offset = (selected_line + 3).saturating_sub(visible);

        Paragraph::new(lines)
            .alignment(text_alignment(self.dict.locale()))
            .wrap(Wrap { trim: false })
            .scroll((offset as u16, 0))
            .render(list_area, buf);
    }
}
