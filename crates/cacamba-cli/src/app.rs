//! Application state machine and key dispatcher.
//!
//! Holds only what the screen shows. Workflow actions (register, remove,
//! map) are handed back to the event loop as [`Action`]s, which runs them
//! against the store with a [`crate::console::Console`] as operator.

use std::path::PathBuf;

use cacamba_core::{
  container::Container,
  workflow::{Notice, Prompt},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};

// ─── Action ──────────────────────────────────────────────────────────────────

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  None,
  Quit,
  Register,
  Remove,
  ShowMap,
  Reload,
}

// ─── Dialog ──────────────────────────────────────────────────────────────────

/// A modal on top of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
  Input { prompt: Prompt, value: String },
  Notice(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
  /// Still open.
  Pending,
  /// Enter on an input dialog.
  Submitted(String),
  /// Closed without an answer (Esc, or any dismissal of a notice).
  Dismissed,
}

// ─── App ─────────────────────────────────────────────────────────────────────

pub struct App {
  /// Every stored container, as of the last refresh.
  pub containers: Vec<Container>,

  /// Current fuzzy-filter string.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* list.
  pub list_cursor: usize,

  /// Open modal, if any. Keys go to it first.
  pub dialog: Option<Dialog>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub store_path: PathBuf,
}

impl App {
  pub fn new(store_path: PathBuf) -> Self {
    Self {
      containers: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      dialog: None,
      status_msg: String::new(),
      store_path,
    }
  }

  /// Replace the list, keeping the cursor in range.
  pub fn set_containers(&mut self, containers: Vec<Container>) {
    self.containers = containers;
    let len = self.filtered_containers().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Containers whose identifier or address match the filter.
  pub fn filtered_containers(&self) -> Vec<&Container> {
    if self.filter.is_empty() {
      return self.containers.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .containers
      .iter()
      .filter(|c| {
        matcher.fuzzy_match(&c.identifier, &self.filter).is_some()
          || matcher.fuzzy_match(&c.full_address(), &self.filter).is_some()
      })
      .collect()
  }

  pub fn cursor_container(&self) -> Option<&Container> {
    self.filtered_containers().get(self.list_cursor).copied()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key on the main screen.
  pub fn handle_key(&mut self, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Action::Quit;
    }

    if self.filter_active {
      self.handle_filter_key(key);
      return Action::None;
    }

    match key.code {
      KeyCode::Char('q') => Action::Quit,
      KeyCode::Char('r') | KeyCode::Char('n') => Action::Register,
      KeyCode::Char('d') | KeyCode::Delete => Action::Remove,
      KeyCode::Char('m') => Action::ShowMap,
      KeyCode::Char('g') | KeyCode::F(5) => Action::Reload,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_containers().len();
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
        Action::None
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
        Action::None
      }
      KeyCode::Home => {
        self.list_cursor = 0;
        Action::None
      }
      KeyCode::End => {
        self.list_cursor = self.filtered_containers().len().saturating_sub(1);
        Action::None
      }

      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
        Action::None
      }
      KeyCode::Esc if !self.filter.is_empty() => {
        self.filter.clear();
        self.list_cursor = 0;
        Action::None
      }

      _ => Action::None,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
      }
      KeyCode::Char(c) => self.filter.push(c),
      _ => return,
    }
    self.list_cursor = 0;
  }

  // ── Dialogs ───────────────────────────────────────────────────────────────

  pub fn open_input(&mut self, prompt: Prompt) {
    self.dialog = Some(Dialog::Input { prompt, value: String::new() });
  }

  pub fn open_notice(&mut self, notice: Notice) {
    self.status_msg = notice.message.clone();
    self.dialog = Some(Dialog::Notice(notice));
  }

  /// Feed a key to the open dialog.
  pub fn dialog_key(&mut self, key: KeyEvent) -> DialogOutcome {
    let ctrl_c =
      key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');

    match &mut self.dialog {
      None => DialogOutcome::Dismissed,
      Some(_) if ctrl_c => DialogOutcome::Dismissed,
      Some(Dialog::Input { value, .. }) => match key.code {
        KeyCode::Enter => DialogOutcome::Submitted(std::mem::take(value)),
        KeyCode::Esc => DialogOutcome::Dismissed,
        KeyCode::Backspace => {
          value.pop();
          DialogOutcome::Pending
        }
        KeyCode::Char(c) => {
          value.push(c);
          DialogOutcome::Pending
        }
        _ => DialogOutcome::Pending,
      },
      Some(Dialog::Notice(_)) => match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => DialogOutcome::Dismissed,
        _ => DialogOutcome::Pending,
      },
    }
  }

  pub fn close_dialog(&mut self) { self.dialog = None; }
}
