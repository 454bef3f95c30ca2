use std::{
  collections::HashMap,
  path::{
    Path,
    PathBuf,
  },
  sync::Arc,
};

use serde_json::Value;
use thiserror::Error;
use tracing::{
  debug,
  error,
  warn,
};

use crate::{
  call_context::{
    CallContext,
    RefactorTargets,
    StringResponses,
  },
  config::Config,
  handlers,
  host::Host,
  notes::NoteStore,
  protocol::{
    CallId,
    Message,
    Tag,
  },
  session::Session,
};

#[derive(Debug, Error)]
pub enum HandlerError {
  /// The handler exists but deliberately does not support this message.
  #[error("handler not implemented")]
  NotImplemented,
  #[error("failed to decode payload: {0}")]
  Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("handler for {tag} failed: {source}")]
pub struct DispatchError {
  pub tag:    Tag,
  #[source]
  pub source: HandlerError,
}

/// How a dispatched message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Handled,
  /// The handler reported it does not support the message.
  Unsupported,
  /// No handler is registered for the tag.
  Unhandled,
}

/// Everything a handler may touch while processing one message.
pub struct HandlerContext<'a> {
  pub host:             &'a mut dyn Host,
  pub session:          &'a mut Session,
  pub notes:            &'a mut NoteStore,
  pub calls:            &'a CallContext,
  pub refactorings:     &'a RefactorTargets,
  pub string_responses: &'a mut StringResponses,
  pub config:           &'a Config,
  pub project_root:     &'a Path,
}

pub type Handler =
  Arc<dyn Fn(&mut HandlerContext<'_>, &CallId, &Value) -> Result<(), HandlerError> + Send + Sync>;

/// Maps each tag to exactly one handler.
pub struct DispatchTable {
  handlers: HashMap<Tag, Handler>,
}

impl Clone for DispatchTable {
  fn clone(&self) -> Self {
    Self {
      handlers: self.handlers.clone(),
    }
  }
}

impl Default for DispatchTable {
  fn default() -> Self {
    Self::new()
  }
}

impl DispatchTable {
  pub fn new() -> Self {
    Self {
      handlers: HashMap::new(),
    }
  }

  /// The table of built-in response handlers.
  pub fn standard() -> Self {
    let mut table = Self::new();
    handlers::register(&mut table);
    table
  }

  pub fn set(&mut self, tag: Tag, handler: Handler) -> Option<Handler> {
    self.handlers.insert(tag, handler)
  }

  pub fn get(&self, tag: &Tag) -> Option<&Handler> {
    self.handlers.get(tag)
  }

  pub fn remove(&mut self, tag: &Tag) -> Option<Handler> {
    self.handlers.remove(tag)
  }

  pub fn len(&self) -> usize {
    self.handlers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handlers.is_empty()
  }
}

/// Routes decoded server messages to their handlers and owns the state
/// scoped to the current connection.
pub struct Dispatcher {
  table:            DispatchTable,
  session:          Session,
  notes:            NoteStore,
  calls:            CallContext,
  refactorings:     RefactorTargets,
  string_responses: StringResponses,
  config:           Config,
  project_root:     PathBuf,
}

impl Dispatcher {
  pub fn new(
    config: Config,
    project_root: impl Into<PathBuf>,
    calls: CallContext,
    refactorings: RefactorTargets,
  ) -> Self {
    Self::with_table(
      DispatchTable::standard(),
      config,
      project_root,
      calls,
      refactorings,
    )
  }

  pub fn with_table(
    table: DispatchTable,
    config: Config,
    project_root: impl Into<PathBuf>,
    calls: CallContext,
    refactorings: RefactorTargets,
  ) -> Self {
    Self {
      table,
      session: Session::new(),
      notes: NoteStore::new(),
      calls,
      refactorings,
      string_responses: StringResponses::new(),
      config,
      project_root: project_root.into(),
    }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn notes(&self) -> &NoteStore {
    &self.notes
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn table_mut(&mut self) -> &mut DispatchTable {
    &mut self.table
  }

  /// Starts over for a new connection.
  pub fn reset_session(&mut self) {
    self.session = Session::new();
    self.notes.clear();
    self.string_responses.clear();
  }

  /// Takes the text of a `StringResponse` that was not opened in a browser.
  pub fn take_string_response(&mut self, call_id: &CallId) -> Option<String> {
    self.string_responses.take(call_id)
  }

  /// Runs the handler registered for the message's tag.
  ///
  /// Unknown tags are logged and skipped. A handler reporting
  /// [`HandlerError::NotImplemented`] is surfaced as a status message; any
  /// other handler failure is returned.
  pub fn dispatch(
    &mut self,
    host: &mut dyn Host,
    message: Message,
  ) -> Result<Outcome, DispatchError> {
    let Message { tag, call_id, body } = message;
    debug!(tag = %tag, call_id = %call_id, "handling incoming response");

    let Some(handler) = self.table.get(&tag).cloned() else {
      warn!(tag = %tag, payload = %body, "response has not been handled");
      return Ok(Outcome::Unhandled);
    };

    let mut ctx = HandlerContext {
      host: &mut *host,
      session: &mut self.session,
      notes: &mut self.notes,
      calls: &self.calls,
      refactorings: &self.refactorings,
      string_responses: &mut self.string_responses,
      config: &self.config,
      project_root: &self.project_root,
    };

    match handler(&mut ctx, &call_id, &body) {
      Ok(()) => Ok(Outcome::Handled),
      Err(HandlerError::NotImplemented) => {
        let text = self
          .config
          .feedback
          .handler_not_implemented(tag.as_str(), self.session.server_version());
        error!(tag = %tag, "{text}");
        host.status_message(&text);
        Ok(Outcome::Unsupported)
      },
      Err(source) => Err(DispatchError { tag, source }),
    }
  }
}
