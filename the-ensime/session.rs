pub const UNKNOWN_SERVER_VERSION: &str = "unknown";

/// State scoped to one server connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
  server_version: Option<String>,
  connected:      bool,
  indexer_ready:  bool,
  analyzer_ready: bool,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn server_version(&self) -> &str {
    self
      .server_version
      .as_deref()
      .unwrap_or(UNKNOWN_SERVER_VERSION)
  }

  pub fn is_connected(&self) -> bool {
    self.connected
  }

  pub fn indexer_ready(&self) -> bool {
    self.indexer_ready
  }

  pub fn analyzer_ready(&self) -> bool {
    self.analyzer_ready
  }

  /// Records the connection info. Only the first call of a session takes
  /// effect; returns whether it did.
  pub fn record_connection(&mut self, version: Option<String>) -> bool {
    if self.connected {
      return false;
    }
    self.connected = true;
    self.server_version = version;
    true
  }

  /// Returns `true` when the flag was newly set.
  pub fn mark_indexer_ready(&mut self) -> bool {
    !std::mem::replace(&mut self.indexer_ready, true)
  }

  /// Returns `true` when the flag was newly set.
  pub fn mark_analyzer_ready(&mut self) -> bool {
    !std::mem::replace(&mut self.analyzer_ready, true)
  }
}
