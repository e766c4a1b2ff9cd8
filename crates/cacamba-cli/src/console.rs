//! The terminal as the workflow's [`Operator`].
//!
//! Each question or notice opens a dialog and runs a nested draw/read loop
//! until the operator answers or dismisses it.

use std::{io, path::Path, time::Duration};

use cacamba_core::{
  container::Container,
  workflow::{Notice, Operator, Prompt},
};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, warn};

use crate::{
  app::{App, DialogOutcome},
  ui,
};

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Wait up to 50 ms for a key press, yielding to tokio while blocked.
pub fn next_key() -> io::Result<Option<KeyEvent>> {
  tokio::task::block_in_place(|| {
    if !event::poll(Duration::from_millis(50))? {
      return Ok(None);
    }
    match event::read()? {
      Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
      _ => Ok(None),
    }
  })
}

pub struct Console<'a> {
  terminal: &'a mut Tui,
  app:      &'a mut App,
}

impl<'a> Console<'a> {
  pub fn new(terminal: &'a mut Tui, app: &'a mut App) -> Self { Self { terminal, app } }

  /// Draw and read keys until the open dialog closes.
  fn run_dialog(&mut self) -> DialogOutcome {
    let outcome = loop {
      let app = &*self.app;
      if let Err(e) = self.terminal.draw(|f| ui::draw(f, app)) {
        error!(error = %e, "drawing dialog failed");
        break DialogOutcome::Dismissed;
      }
      match next_key() {
        Ok(Some(key)) => match self.app.dialog_key(key) {
          DialogOutcome::Pending => {}
          done => break done,
        },
        Ok(None) => {}
        Err(e) => {
          error!(error = %e, "reading terminal input failed");
          break DialogOutcome::Dismissed;
        }
      }
    };
    self.app.close_dialog();
    outcome
  }
}

impl Operator for Console<'_> {
  fn ask(&mut self, prompt: Prompt) -> Option<String> {
    self.app.open_input(prompt);
    match self.run_dialog() {
      DialogOutcome::Submitted(answer) => Some(answer),
      _ => None,
    }
  }

  fn notify(&mut self, notice: Notice) {
    self.app.open_notice(notice);
    self.run_dialog();
  }

  fn refresh(&mut self, containers: &[Container]) {
    self.app.set_containers(containers.to_vec());
  }

  fn map_ready(&mut self, path: &Path) {
    let target = path.to_string_lossy();
    match webbrowser::open(&target) {
      Ok(()) => self.app.status_msg = format!("Map opened: {}", path.display()),
      Err(e) => {
        warn!(path = %path.display(), error = %e, "could not open browser");
        self.notify(Notice::warning(format!(
          "Map saved to {} but the browser could not be opened: {e}",
          path.display()
        )));
      }
    }
  }
}
