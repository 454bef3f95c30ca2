pub mod call_context;
pub mod config;
pub mod dispatch;
mod handlers;
pub mod host;
pub mod html;
pub mod locations;
pub mod notes;
pub mod patch;
pub mod protocol;
pub mod request;
pub mod scroll;
pub mod session;
pub mod signature;
pub mod types;

pub use call_context::{
  CallContext,
  CallOptions,
  RefactorTargets,
  StringResponses,
};
pub use config::{
  Config,
  ConfigError,
};
pub use dispatch::{
  DispatchError,
  DispatchTable,
  Dispatcher,
  HandlerError,
  Outcome,
};
pub use handlers::SUPPORTED_REFACTORINGS;
pub use host::{
  Editor,
  Host,
  RequestSender,
};
pub use protocol::{
  CallId,
  Message,
  Tag,
};
pub use request::Request;
