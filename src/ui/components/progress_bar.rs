use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bordered bar for `done` out of `total` units (steps or lessons). The
/// caption sits in the border, the percentage in the middle of the bar.
pub struct ProgressBar<'a> {
    caption: String,
    done: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(caption: impl Into<String>, done: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            caption: caption.into(),
            done: done.min(total),
            total,
            theme,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }

    fn filled_cells(&self, width: u16) -> u16 {
        (self.ratio() * width as f64).round() as u16
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.caption))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled = self.filled_cells(inner.width);
        for x in inner.x..inner.x + inner.width {
            let bg = if x < inner.x + filled {
                colors.bar_filled()
            } else {
                colors.bar_empty()
            };
            buf[(x, inner.y)].set_style(Style::default().bg(bg));
        }

        let percent = format!("{:.0}%", self.ratio() * 100.0);
        let label_x = inner.x + inner.width.saturating_sub(percent.len() as u16) / 2;
        buf.set_string(
            label_x,
            inner.y,
            &percent,
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::BOLD),
        );
    }
}
