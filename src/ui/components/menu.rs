use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::i18n::Dictionary;
use crate::store::FontSize;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Lessons,
    Progress,
    Language,
    FontSize,
    Quit,
}

pub const MENU_ACTIONS: [MenuAction; 5] = [
    MenuAction::Lessons,
    MenuAction::Progress,
    MenuAction::Language,
    MenuAction::FontSize,
    MenuAction::Quit,
];

impl MenuAction {
    fn key(self) -> &'static str {
        match self {
            MenuAction::Lessons => "1",
            MenuAction::Progress => "2",
            MenuAction::Language => "L",
            MenuAction::FontSize => "+/-",
            MenuAction::Quit => "Q",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Menu {
    pub selected: usize,
}

impl Menu {
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MENU_ACTIONS.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = MENU_ACTIONS.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        MENU_ACTIONS[self.selected.min(MENU_ACTIONS.len() - 1)]
    }
}

struct MenuItem {
    key: &'static str,
    label: String,
    description: String,
}

pub struct MenuView<'a> {
    pub menu: &'a Menu,
    pub theme: &'a Theme,
    pub dict: Dictionary,
    pub font_size: FontSize,
    pub points: u32,
}

impl MenuView<'_> {
    fn items(&self) -> Vec<MenuItem> {
        let dict = &self.dict;
        MENU_ACTIONS
            .iter()
            .map(|action| {
                let (label, description) = match action {
                    MenuAction::Lessons => (dict.get("nav.lessons"), dict.get("lessons.intro")),
                    MenuAction::Progress => (
                        dict.get("nav.progress"),
                        format!("{}: {}", dict.get("lessons.your_points"), self.points),
                    ),
                    MenuAction::Language => (
                        dict.get("nav.language"),
                        dict.locale().native_name().to_string(),
                    ),
                    MenuAction::FontSize => (
                        dict.get("accessibility.font_size_label"),
                        dict.get(self.font_size.label_key()),
                    ),
                    MenuAction::Quit => (dict.get("nav.quit"), String::new()),
                };
                MenuItem {
                    key: action.key(),
                    label,
                    description,
                }
            })
            .collect()
    }
}

impl Widget for &MenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.dict.get("app.title"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.dict.get("app.tagline"),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let items = self.items();
        let row_height = 2 + self.font_size.line_spacing();
        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                items
                    .iter()
                    .map(|_| Constraint::Length(row_height))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        let alignment = crate::ui::layout::text_alignment(self.dict.locale());
        for (i, item) in items.iter().enumerate() {
            let is_selected = i == self.menu.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{}] {}", item.key, item.label);
            let desc_text = format!("     {}", item.description);

            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let lines = vec![
                Line::from(Span::styled(label_text, label_style)),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.muted()))),
            ];

            if let Some(row) = menu_layout.get(i) {
                Paragraph::new(lines).alignment(alignment).render(*row, buf);
            }
        }
    }
}
