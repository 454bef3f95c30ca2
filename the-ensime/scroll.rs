//! Scrolling a view that may still be loading from disk.

use std::time::Duration;

use tracing::debug;

use crate::host::{
  Editor,
  Host,
  ViewId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub attempts: u32,
  pub delay:    Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      attempts: 10,
      delay:    Duration::from_millis(100),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
  /// 1-indexed line.
  Line(u32),
  /// Byte offset, mapped to a line by the view once loaded.
  Offset(usize),
}

impl ScrollTarget {
  /// An explicit non-zero line wins over an offset.
  pub fn from_position(line: Option<u32>, offset: Option<usize>) -> Option<Self> {
    match (line, offset) {
      (Some(line), _) if line > 0 => Some(Self::Line(line)),
      (_, Some(offset)) => Some(Self::Offset(offset)),
      _ => None,
    }
  }

  pub fn resolve<E: Editor + ?Sized>(self, editor: &E, view: ViewId) -> u32 {
    match self {
      Self::Line(line) => line,
      Self::Offset(offset) => editor.offset_to_row(view, offset) + 1,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
  Loading,
  Ready,
  Abandoned,
}

#[derive(Debug, Clone)]
pub struct ScrollWait {
  view:          ViewId,
  target:        ScrollTarget,
  attempts_left: u32,
  delay:         Duration,
  state:         ScrollState,
}

impl ScrollWait {
  pub fn new(view: ViewId, target: ScrollTarget, policy: RetryPolicy) -> Self {
    Self {
      view,
      target,
      attempts_left: policy.attempts,
      delay: policy.delay,
      state: ScrollState::Loading,
    }
  }

  pub fn state(&self) -> ScrollState {
    self.state
  }

  /// Scrolls once the view has loaded. While it is still loading each poll
  /// spends one attempt; with none left the wait is abandoned.
  pub fn poll<E: Editor + ?Sized>(&mut self, editor: &mut E) -> ScrollState {
    if self.state != ScrollState::Loading {
      return self.state;
    }

    if !editor.is_loading(self.view) {
      let line = self.target.resolve(editor, self.view);
      editor.scroll_to_line(self.view, line);
      self.state = ScrollState::Ready;
    } else if self.attempts_left == 0 {
      debug!(view = self.view.0, "scrolling abandoned, view did not finish loading");
      self.state = ScrollState::Abandoned;
    } else {
      self.attempts_left -= 1;
    }
    self.state
  }

  /// Polls on the host's scheduler until the wait settles.
  pub fn start(self, host: &mut dyn Host) {
    host.schedule(Duration::ZERO, Box::new(move |host: &mut dyn Host| self.drive(host)));
  }

  fn drive(mut self, host: &mut dyn Host) {
    if self.poll(host) == ScrollState::Loading {
      let delay = self.delay;
      host.schedule(delay, Box::new(move |host: &mut dyn Host| self.drive(host)));
    }
  }
}
