//! Request-time context looked up when the matching response arrives.
//!
//! The request layer records options under the call id it sends; response
//! handlers read or take them back. Both sides hold clones of the same
//! handle.

use std::{
  collections::{
    HashMap,
    VecDeque,
  },
  path::PathBuf,
  sync::Arc,
};

use parking_lot::Mutex;

use crate::protocol::CallId;

pub type ProcedureId = u64;

/// Unread string responses kept before the oldest is dropped.
pub const STRING_RESPONSE_LIMIT: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOptions {
  pub file_name: Option<PathBuf>,
  pub browse:    bool,
}

impl CallOptions {
  pub fn for_file(file_name: impl Into<PathBuf>) -> Self {
    Self {
      file_name: Some(file_name.into()),
      browse:    false,
    }
  }

  pub fn browsing() -> Self {
    Self {
      file_name: None,
      browse:    true,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct CallContext {
  entries: Arc<Mutex<HashMap<CallId, CallOptions>>>,
}

impl CallContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, call_id: CallId, options: CallOptions) -> Option<CallOptions> {
    self.entries.lock().insert(call_id, options)
  }

  pub fn get(&self, call_id: &CallId) -> Option<CallOptions> {
    self.entries.lock().get(call_id).cloned()
  }

  pub fn take(&self, call_id: &CallId) -> Option<CallOptions> {
    self.entries.lock().remove(call_id)
  }

  pub fn contains(&self, call_id: &CallId) -> bool {
    self.entries.lock().contains_key(call_id)
  }

  pub fn len(&self) -> usize {
    self.entries.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.lock().is_empty()
  }
}

/// Files targeted by in-flight refactorings, keyed by procedure id.
#[derive(Debug, Clone, Default)]
pub struct RefactorTargets {
  entries: Arc<Mutex<HashMap<ProcedureId, PathBuf>>>,
}

impl RefactorTargets {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, procedure_id: ProcedureId, file: impl Into<PathBuf>) -> Option<PathBuf> {
    self.entries.lock().insert(procedure_id, file.into())
  }

  pub fn get(&self, procedure_id: ProcedureId) -> Option<PathBuf> {
    self.entries.lock().get(&procedure_id).cloned()
  }

  pub fn remove(&self, procedure_id: ProcedureId) -> Option<PathBuf> {
    self.entries.lock().remove(&procedure_id)
  }
}

/// String responses not consumed by a browser, waiting for the caller to
/// take them. Holds at most [`STRING_RESPONSE_LIMIT`] entries, one per call.
#[derive(Debug, Clone, Default)]
pub struct StringResponses {
  entries: VecDeque<(CallId, String)>,
}

impl StringResponses {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `text` for `call_id`, replacing an earlier response for the same
  /// call and evicting the oldest entry when full.
  pub fn insert(&mut self, call_id: CallId, text: String) {
    self.entries.retain(|(id, _)| *id != call_id);
    if self.entries.len() == STRING_RESPONSE_LIMIT {
      self.entries.pop_front();
    }
    self.entries.push_back((call_id, text));
  }

  pub fn take(&mut self, call_id: &CallId) -> Option<String> {
    let index = self.entries.iter().position(|(id, _)| id == call_id)?;
    self.entries.remove(index).map(|(_, text)| text)
  }

  pub fn clear(&mut self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
