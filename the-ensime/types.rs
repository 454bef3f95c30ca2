use std::path::PathBuf;

use serde::Deserialize;

/// Type description sent by the server, either a plain type or a method
/// signature with its parameter sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "typehint")]
pub enum TypeInfo {
  #[serde(rename = "BasicTypeInfo")]
  Basic(BasicType),
  #[serde(rename = "ArrowTypeInfo")]
  Arrow(ArrowType),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicType {
  pub name:      String,
  #[serde(default)]
  pub full_name: Option<String>,
  #[serde(default)]
  pub decl_as:   Option<DeclaredAs>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowType {
  pub name:           String,
  #[serde(default)]
  pub param_sections: Vec<ParamSection>,
  pub result_type:    Box<TypeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSection {
  #[serde(default)]
  pub params:      Vec<(String, TypeInfo)>,
  #[serde(default)]
  pub is_implicit: bool,
}

impl TypeInfo {
  pub fn basic(name: impl Into<String>, full_name: impl Into<String>) -> Self {
    Self::Basic(BasicType {
      name:      name.into(),
      full_name: Some(full_name.into()),
      decl_as:   None,
    })
  }

  pub fn arrow(param_sections: Vec<ParamSection>, result_type: TypeInfo) -> Self {
    Self::Arrow(ArrowType {
      name: String::new(),
      param_sections,
      result_type: Box::new(result_type),
    })
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Basic(basic) => &basic.name,
      Self::Arrow(arrow) => &arrow.name,
    }
  }

  pub fn is_basic(&self) -> bool {
    matches!(self, Self::Basic(_))
  }

  /// Parameter sections of a method type. Basic types have none.
  pub fn param_sections(&self) -> &[ParamSection] {
    match self {
      Self::Basic(_) => &[],
      Self::Arrow(arrow) => &arrow.param_sections,
    }
  }
}

impl BasicType {
  /// The fully qualified name, or the short name when the server omitted it.
  pub fn full_name(&self) -> &str {
    self.full_name.as_deref().unwrap_or(&self.name)
  }
}

impl ParamSection {
  pub fn new(params: Vec<(String, TypeInfo)>) -> Self {
    Self {
      params,
      is_implicit: false,
    }
  }

  pub fn implicit(params: Vec<(String, TypeInfo)>) -> Self {
    Self {
      params,
      is_implicit: true,
    }
  }
}

/// Declaration kind tag such as `Class`, `Trait` or `Object`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeclaredAs {
  pub typehint: String,
}

impl DeclaredAs {
  pub fn keyword(&self) -> &str {
    &self.typehint
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
  pub name:      String,
  #[serde(default)]
  pub type_info: Option<TypeInfo>,
}

/// A position reported by the server. Depending on the variant the server
/// picked it carries a line, an offset, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourcePosition {
  #[serde(default)]
  pub file:   Option<PathBuf>,
  #[serde(default)]
  pub line:   Option<u32>,
  #[serde(default)]
  pub offset: Option<usize>,
}

impl SourcePosition {
  pub fn location(&self) -> Option<Location> {
    let file = self.file.clone()?;
    Some(Location {
      file,
      line: self.line.unwrap_or(0),
    })
  }
}

/// A resolved jump target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
  pub file: PathBuf,
  pub line: u32,
}

impl Location {
  pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
    Self {
      file: file.into(),
      line,
    }
  }

  /// Editors are 1-indexed, so a server line of `0` is shown as `1`.
  pub fn display_line(&self) -> u32 {
    self.line.max(1)
  }
}
