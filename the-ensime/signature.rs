//! Rendering of server type descriptions into display text, completion menu
//! columns and insertable snippets.

use crate::types::{
  Completion,
  ParamSection,
  TypeInfo,
};

const BY_NAME_PREFIX: &str = "<byname>[";
const REPEATED_PREFIX: &str = "<repeated>[";

/// A completion entry ready to hand to the editor's completion popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
  /// Bare member name.
  pub word:    String,
  /// Full signature shown in the popup.
  pub abbr:    String,
  /// Result type for methods, member type otherwise.
  pub menu:    String,
  /// Text inserted on accept, with numbered placeholders for parameters.
  pub snippet: String,
}

impl Suggestion {
  /// Single-line trigger text: the word, then the signature centered in a
  /// 32 column cell, then the type right aligned.
  pub fn trigger(&self) -> String {
    format!("{}\t{:^32.30} {:>10}", self.word, self.abbr, self.menu)
  }
}

/// Text shown for a type: the full name of a basic type, or
/// `(params)... => Result` for a method type.
pub fn format_type(info: &TypeInfo) -> String {
  match info {
    TypeInfo::Basic(basic) => basic.full_name().to_string(),
    TypeInfo::Arrow(arrow) => {
      format!(
        "{} => {}",
        format_param_sections(&arrow.param_sections),
        member_type_name(info)
      )
    },
  }
}

/// Name for the type column: the result type of a method, the type itself
/// otherwise.
pub fn member_type_name(info: &TypeInfo) -> &str {
  match info {
    TypeInfo::Basic(basic) => &basic.name,
    TypeInfo::Arrow(arrow) => arrow.result_type.name(),
  }
}

pub fn format_param_sections(sections: &[ParamSection]) -> String {
  sections.iter().map(format_param_section).collect()
}

pub fn format_param_section(section: &ParamSection) -> String {
  let implicit = if section.is_implicit { "implicit " } else { "" };
  let params = section
    .params
    .iter()
    .map(|(name, tpe)| format!("{name}: {}", format_param(tpe)))
    .collect::<Vec<_>>()
    .join(", ");
  format!("({implicit}{params})")
}

/// Short name for a parameter type. By-name parameters render as
/// `=> Inner` and repeated parameters as `Inner*`.
pub fn format_param_type(name: &str) -> String {
  if let Some(inner) = name.strip_prefix(BY_NAME_PREFIX) {
    return format!("=> {}", strip_closing_bracket(inner));
  }
  if let Some(inner) = name.strip_prefix(REPEATED_PREFIX) {
    return format!("{}*", strip_closing_bracket(inner));
  }
  name.to_string()
}

/// Parameter list with every parameter replaced by a `${n:name:Type}`
/// placeholder. Indices run across all sections starting at 1.
pub fn format_insertion_snippet(info: &TypeInfo) -> String {
  let mut index = 1usize;
  let mut out = String::new();
  for section in info.param_sections() {
    let params = section
      .params
      .iter()
      .map(|(name, tpe)| {
        let placeholder = format!("${{{index}:{name}:{}}}", format_param(tpe));
        index += 1;
        placeholder
      })
      .collect::<Vec<_>>()
      .join(", ");
    out.push('(');
    out.push_str(&params);
    out.push(')');
  }
  out
}

/// Converts a completion into a suggestion. Completions the server sent
/// without type information are rejected.
pub fn completion_to_suggestion(completion: &Completion) -> Option<Suggestion> {
  let info = completion.type_info.as_ref()?;
  let name = &completion.name;
  let (abbr, snippet) = if info.param_sections().is_empty() {
    (name.clone(), name.clone())
  } else {
    (
      format!("{name}{}", format_param_sections(info.param_sections())),
      format!("{name}{}", format_insertion_snippet(info)),
    )
  };

  Some(Suggestion {
    word: name.clone(),
    abbr,
    menu: member_type_name(info).to_string(),
    snippet,
  })
}

pub fn suggestions_from(completions: &[Completion]) -> Vec<Suggestion> {
  completions
    .iter()
    .filter_map(completion_to_suggestion)
    .collect()
}

fn format_param(info: &TypeInfo) -> String {
  match info {
    TypeInfo::Basic(basic) => format_param_type(&basic.name),
    TypeInfo::Arrow(_) => format_type(info),
  }
}

fn strip_closing_bracket(inner: &str) -> &str {
  inner.strip_suffix(']').unwrap_or(inner)
}
