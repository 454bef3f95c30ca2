use std::path::PathBuf;

use serde::Serialize;

/// Requests a handler hands to the request layer. They are sent without
/// waiting; any reply comes back as a separately dispatched message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "typehint")]
pub enum Request {
  #[serde(rename = "TypecheckFilesReq")]
  TypecheckFiles { files: Vec<PathBuf> },
  #[serde(rename = "AddImportRefactorDesc", rename_all = "camelCase")]
  AddImport {
    qualified_name: String,
    file:           PathBuf,
  },
}
