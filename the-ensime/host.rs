//! Capabilities the response core needs from its host.
//!
//! The core only defines the interface. The editor integration implements
//! [`Editor`] and the connection layer implements [`RequestSender`]; the
//! dispatcher talks to both through [`Host`].

use std::{
  path::{
    Path,
    PathBuf,
  },
  time::Duration,
};

use thiserror::Error;

use crate::{
  notes::Note,
  request::Request,
  signature::Suggestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub u64);

#[derive(Debug, Error)]
pub enum HostError {
  #[error("failed to open {url} externally: {reason}")]
  OpenUrl { url: String, reason: String },
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// A continuation run by the host after a delay.
pub type Task = Box<dyn FnOnce(&mut dyn Host)>;

/// Called with the chosen row, or `None` when the picker was dismissed.
pub type OnSelect = Box<dyn FnOnce(&mut dyn Host, Option<usize>)>;

/// Called with the href of a link clicked inside a popup.
pub type OnNavigate = Box<dyn FnMut(&mut dyn Host, &str)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
  pub label:  String,
  pub detail: Option<String>,
}

impl SelectionItem {
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label:  label.into(),
      detail: None,
    }
  }

  pub fn with_detail(label: impl Into<String>, detail: impl Into<String>) -> Self {
    Self {
      label:  label.into(),
      detail: Some(detail.into()),
    }
  }
}

pub struct Popup {
  pub content:            String,
  pub max_width:          Option<u32>,
  pub hide_on_mouse_move: bool,
  pub on_navigate:        Option<OnNavigate>,
}

impl Popup {
  /// Plain transient notice dismissed when the mouse moves.
  pub fn notice(text: impl Into<String>) -> Self {
    Self {
      content:            text.into(),
      max_width:          None,
      hide_on_mouse_move: true,
      on_navigate:        None,
    }
  }

  pub fn html(content: impl Into<String>, max_width: u32, on_navigate: OnNavigate) -> Self {
    Self {
      content:            content.into(),
      max_width:          Some(max_width),
      hide_on_mouse_move: false,
      on_navigate:        Some(on_navigate),
    }
  }
}

pub trait Editor {
  fn view_for_file(&self, path: &Path) -> Option<ViewId>;
  fn open_file(&mut self, path: &Path) -> ViewId;
  fn is_loading(&self, view: ViewId) -> bool;
  /// Zero-based row containing the byte `offset`.
  fn offset_to_row(&self, view: ViewId, offset: usize) -> u32;
  fn focus_view(&mut self, view: ViewId);
  fn scroll_to_line(&mut self, view: ViewId, line: u32);
  fn open_and_scroll(&mut self, path: &Path, line: u32);
  fn reload_file(&mut self, path: &Path);
  fn open_files(&self) -> Vec<PathBuf>;
  fn redraw_highlights(&mut self, notes: &[Note]);

  fn status_message(&mut self, text: &str);
  fn error_message(&mut self, text: &str);
  fn show_popup(&mut self, popup: Popup);
  fn hide_popup(&mut self);
  fn show_selection(&mut self, items: Vec<SelectionItem>, on_select: OnSelect);
  fn schedule(&mut self, delay: Duration, task: Task);
  fn set_clipboard(&mut self, text: &str);
  fn open_url(&mut self, url: &str) -> Result<(), HostError>;
  /// Port of the server's documentation endpoint, once known.
  fn http_port(&self) -> Option<u16>;

  fn current_prefix(&self) -> Option<String>;
  fn set_current_prefix(&mut self, prefix: Option<String>);
  fn set_suggestions(&mut self, suggestions: Vec<Suggestion>);
  fn is_completion_visible(&self) -> bool;
  /// Makes a visible completion popup pick up the latest suggestions.
  fn refresh_completions(&mut self);
}

pub trait RequestSender {
  fn send_async(&mut self, request: Request);
}

pub trait Host: Editor + RequestSender {}

impl<T: Editor + RequestSender> Host for T {}
