use std::fmt;

use serde::{
  Deserialize,
  Serialize,
};
use serde_json::Value;
use thiserror::Error;

/// Correlation id the request layer attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallId {
  Number(u64),
  String(String),
}

impl fmt::Display for CallId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Number(id) => write!(f, "{id}"),
      Self::String(id) => f.write_str(id),
    }
  }
}

impl From<u64> for CallId {
  fn from(id: u64) -> Self {
    Self::Number(id)
  }
}

impl From<&str> for CallId {
  fn from(id: &str) -> Self {
    Self::String(id.to_string())
  }
}

impl From<String> for CallId {
  fn from(id: String) -> Self {
    Self::String(id)
  }
}

/// Discriminator of an inbound message. Values the client does not know
/// about are kept verbatim in [`Tag::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
  ConnectionInfo,
  BackgroundMessage,
  SymbolInfo,
  IndexerReady,
  AnalyzerReady,
  ScalaNotes,
  JavaNotes,
  ClearScalaNotes,
  BasicTypeInfo,
  ArrowTypeInfo,
  FullTypecheckComplete,
  StringResponse,
  CompletionInfoList,
  SymbolSearchResults,
  DebugOutput,
  DebugBreak,
  DebugBacktrace,
  DebugVmError,
  RefactorDiff,
  ImportSuggestions,
  PackageInfo,
  SourcePositions,
  HierarchyInfo,
  Unknown(String),
}

impl Tag {
  pub const KNOWN: [Tag; 23] = [
    Tag::ConnectionInfo,
    Tag::BackgroundMessage,
    Tag::SymbolInfo,
    Tag::IndexerReady,
    Tag::AnalyzerReady,
    Tag::ScalaNotes,
    Tag::JavaNotes,
    Tag::ClearScalaNotes,
    Tag::BasicTypeInfo,
    Tag::ArrowTypeInfo,
    Tag::FullTypecheckComplete,
    Tag::StringResponse,
    Tag::CompletionInfoList,
    Tag::SymbolSearchResults,
    Tag::DebugOutput,
    Tag::DebugBreak,
    Tag::DebugBacktrace,
    Tag::DebugVmError,
    Tag::RefactorDiff,
    Tag::ImportSuggestions,
    Tag::PackageInfo,
    Tag::SourcePositions,
    Tag::HierarchyInfo,
  ];

  pub fn from_typehint(typehint: &str) -> Self {
    Self::KNOWN
      .iter()
      .find(|tag| tag.as_str() == typehint)
      .cloned()
      .unwrap_or_else(|| Self::Unknown(typehint.to_string()))
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::ConnectionInfo => "ConnectionInfo",
      Self::BackgroundMessage => "SendBackgroundMessageEvent",
      Self::SymbolInfo => "SymbolInfo",
      Self::IndexerReady => "IndexerReadyEvent",
      Self::AnalyzerReady => "AnalyzerReadyEvent",
      Self::ScalaNotes => "NewScalaNotesEvent",
      Self::JavaNotes => "NewJavaNotesEvent",
      Self::ClearScalaNotes => "ClearAllScalaNotesEvent",
      Self::BasicTypeInfo => "BasicTypeInfo",
      Self::ArrowTypeInfo => "ArrowTypeInfo",
      Self::FullTypecheckComplete => "FullTypeCheckCompleteEvent",
      Self::StringResponse => "StringResponse",
      Self::CompletionInfoList => "CompletionInfoList",
      Self::SymbolSearchResults => "SymbolSearchResults",
      Self::DebugOutput => "DebugOutputEvent",
      Self::DebugBreak => "DebugBreakEvent",
      Self::DebugBacktrace => "DebugBacktrace",
      Self::DebugVmError => "DebugVmError",
      Self::RefactorDiff => "RefactorDiffEffect",
      Self::ImportSuggestions => "ImportSuggestions",
      Self::PackageInfo => "PackageInfo",
      Self::SourcePositions => "SourcePositions",
      Self::HierarchyInfo => "HierarchyInfo",
      Self::Unknown(typehint) => typehint,
    }
  }

  pub fn is_known(&self) -> bool {
    !matches!(self, Self::Unknown(_))
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
  pub tag:     Tag,
  pub call_id: CallId,
  pub body:    Value,
}

#[derive(Debug, Error)]
pub enum MessageError {
  #[error("message payload is not an object")]
  NotAnObject,
  #[error("message payload has no typehint")]
  MissingTypehint,
}

impl Message {
  pub fn new(tag: Tag, call_id: CallId, body: Value) -> Self {
    Self { tag, call_id, body }
  }

  /// Reads the tag out of the payload's `typehint` field.
  pub fn from_payload(call_id: CallId, body: Value) -> Result<Self, MessageError> {
    let object = body.as_object().ok_or(MessageError::NotAnObject)?;
    let typehint = object
      .get("typehint")
      .and_then(Value::as_str)
      .ok_or(MessageError::MissingTypehint)?;
    Ok(Self {
      tag: Tag::from_typehint(typehint),
      call_id,
      body,
    })
  }
}
