//! Modal dialogs: text prompts and notices.

use cacamba_core::workflow::Severity;
use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::Dialog;

pub fn draw(f: &mut Frame, area: Rect, dialog: &Dialog) {
  match dialog {
    Dialog::Input { prompt, value } => {
      let popup = centered(area, 60, 5);
      let block = Block::default()
        .title(format!(" {} ", prompt.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
      let lines = vec![
        Line::from(Span::styled(
          prompt.label(),
          Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
          Span::raw(value.clone()),
          Span::styled("_", Style::default().fg(Color::Yellow)),
        ]),
      ];
      f.render_widget(Clear, popup);
      f.render_widget(Paragraph::new(lines).block(block), popup);
    }
    Dialog::Notice(notice) => {
      let (title, color) = match notice.severity {
        Severity::Info => (" Info ", Color::Green),
        Severity::Warning => (" Warning ", Color::Yellow),
        Severity::Error => (" Error ", Color::Red),
      };
      let popup = centered(area, 70, 8);
      let block = Block::default()
        .title(title)
        .title_bottom(" Enter to close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
      f.render_widget(Clear, popup);
      f.render_widget(
        Paragraph::new(notice.message.as_str())
          .wrap(Wrap { trim: true })
          .block(block),
        popup,
      );
    }
  }
}

/// A `width` × `height` box in the middle of `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
    .flex(Flex::Center)
    .areas(area);
  let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
    .flex(Flex::Center)
    .areas(row);
  cell
}
