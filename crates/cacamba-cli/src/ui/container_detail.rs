//! Container detail pane (right panel).

use cacamba_core::container::{Container, PICKUP_AFTER_DAYS};
use chrono::NaiveDate;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the selected container into `area`.
pub fn draw(f: &mut Frame, area: Rect, selected: Option<&Container>, today: NaiveDate) {
  let title = selected
    .map(|c| format!(" Container {} ", c.identifier))
    .unwrap_or_else(|| " Detail ".to_string());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(c) = selected else {
    f.render_widget(
      Paragraph::new("Select a container to see its details.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let days = c.days_on_site_on(today);
  let (status, status_style) = if c.needs_pickup_on(today) {
    (
      "due for pickup".to_string(),
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )
  } else {
    (
      format!("on site (pickup after {PICKUP_AFTER_DAYS} days)"),
      Style::default().fg(Color::Green),
    )
  };
  let position = match c.coordinates {
    Some(xy) => format!("{:.6}, {:.6}", xy.latitude, xy.longitude),
    None => "unknown".into(),
  };

  let lines = vec![
    field("Address", c.full_address()),
    field("Postal code", c.postal_code.clone()),
    field("Placed on", c.placement_date.clone()),
    field("Days on site", days.to_string()),
    Line::from(vec![label("Status"), Span::styled(status, status_style)]),
    field("Position", position),
  ];

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn label(name: &str) -> Span<'static> {
  Span::styled(
    format!("{name:<14}"),
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
  )
}

fn field(name: &str, value: String) -> Line<'static> {
  Line::from(vec![label(name), Span::raw(value)])
}
