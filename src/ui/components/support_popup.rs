use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::app::SupportOverlay;
use crate::i18n::Dictionary;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Swish donation prompt drawn over whatever screen is open.
pub struct SupportPopup<'a> {
    pub overlay: &'a SupportOverlay,
    pub theme: &'a Theme,
    pub dict: Dictionary,
}

impl Widget for &SupportPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dict = &self.dict;

        let popup = centered_rect(60, 60, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!(" 💝 {} ", dict.get("support_popup.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.overlay.message.clone(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                dict.get("support_popup.choose_amount"),
                Style::default().fg(colors.muted()),
            )),
            Line::from(Span::styled(
                format!("Swish: {}", self.overlay.swish_number),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(url) = &self.overlay.qr_code_url {
            lines.push(Line::from(Span::styled(
                format!("{}: {url}", dict.get("support_popup.qr_label")),
                Style::default().fg(colors.muted()),
            )));
        }

        let checkbox = if self.overlay.dont_show { "[x]" } else { "[ ]" };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{checkbox} {}", dict.get("support_popup.dont_show")),
            Style::default().fg(colors.fg()),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            dict.get("keys.popup"),
            Style::default().fg(colors.hint()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
