//! Container list pane (left panel).

use cacamba_core::container::Container;
use chrono::NaiveDate;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

/// Render the container list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App, today: NaiveDate) {
  let filtered = app.filtered_containers();
  let total = app.containers.len();
  let due = app.containers.iter().filter(|c| c.needs_pickup_on(today)).count();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" Containers ({}/{}) ", filtered.len(), total)
  } else if due > 0 {
    format!(" Containers ({total}, {due} due) ")
  } else {
    format!(" Containers ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered.iter().map(|c| item(c, today)).collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if items.is_empty() {
    let hint = if total == 0 { "No containers yet. Press r to register one." } else { "No matches." };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}

/// `C1 - Rua A, 42 - Rio de Janeiro [PICKUP - 5 days]`
fn item(c: &Container, today: NaiveDate) -> ListItem<'static> {
  let mut spans = vec![
    Span::styled(c.identifier.clone(), Style::default().add_modifier(Modifier::BOLD)),
    Span::raw(format!(
      " - {}, {} - {}",
      c.address.street, c.street_number, c.address.city
    )),
  ];
  if c.needs_pickup_on(today) {
    spans.push(Span::styled(
      format!(" [PICKUP - {} days]", c.days_on_site_on(today)),
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ));
  }
  ListItem::new(Line::from(spans))
}
