//! TUI rendering: lays out the panes and any open dialog.

pub mod container_detail;
pub mod container_list;
pub mod dialog;

use chrono::{Local, NaiveDate};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Dialog};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let today = Local::now().date_naive();
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app, today);
  draw_body(f, rows[1], app, today);
  draw_status(f, rows[2], app);

  if let Some(d) = &app.dialog {
    dialog::draw(f, area, d);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App, today: NaiveDate) {
  let left = Span::styled(
    format!(" cacamba  {}", app.store_path.display()),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} ", today.format("%d/%m/%Y")),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App, today: NaiveDate) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(area);

  container_list::draw(f, cols[0], app, today);
  container_detail::draw(f, cols[1], app.cursor_container(), today);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match &app.dialog {
    Some(Dialog::Input { .. }) => ("INPUT", "Enter confirm  Esc cancel"),
    Some(Dialog::Notice(_)) => ("NOTICE", "Enter dismiss"),
    None if app.filter_active => ("SEARCH", "Type to filter  Esc clear  Enter keep"),
    None => (
      "NORMAL",
      "↑↓/jk navigate  r register  d remove  m map  / search  g reload  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() || app.dialog.is_some() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
