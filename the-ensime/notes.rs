use std::path::{
  Path,
  PathBuf,
};

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSeverity {
  Error,
  Warning,
  Info,
}

impl NoteSeverity {
  fn from_typehint(typehint: &str) -> Self {
    match typehint {
      "NoteError" => Self::Error,
      "NoteWarn" => Self::Warning,
      _ => Self::Info,
    }
  }
}

/// A compiler diagnostic reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
  pub file:     PathBuf,
  pub message:  String,
  pub severity: NoteSeverity,
  pub begin:    usize,
  pub end:      usize,
  pub line:     u32,
  pub column:   u32,
}

/// Notes accumulated since the last clear. Appending is the only way notes
/// get in and [`NoteStore::clear`] the only way they leave.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
  notes: Vec<Note>,
}

impl NoteStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(&mut self, notes: impl IntoIterator<Item = Note>) {
    self.notes.extend(notes);
  }

  pub fn clear(&mut self) {
    self.notes.clear();
  }

  pub fn all(&self) -> &[Note] {
    &self.notes
  }

  pub fn for_file<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a Note> {
    self.notes.iter().filter(move |note| note.file == file)
  }

  pub fn len(&self) -> usize {
    self.notes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.notes.is_empty()
  }
}

pub fn parse_notes_event(body: &Value) -> Result<Vec<Note>, serde_json::Error> {
  let payload: NotesEventPayload = serde_json::from_value(body.clone())?;
  Ok(
    payload
      .notes
      .into_iter()
      .map(NotePayload::into_note)
      .collect(),
  )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotesEventPayload {
  #[serde(default)]
  notes: Vec<NotePayload>,
}

#[derive(Debug, Deserialize)]
struct NotePayload {
  file:     PathBuf,
  msg:      String,
  severity: SeverityPayload,
  #[serde(default)]
  beg:      usize,
  #[serde(default)]
  end:      usize,
  #[serde(default)]
  line:     u32,
  #[serde(default)]
  col:      u32,
}

impl NotePayload {
  fn into_note(self) -> Note {
    Note {
      file:     self.file,
      message:  self.msg,
      severity: NoteSeverity::from_typehint(&self.severity.typehint),
      begin:    self.beg,
      end:      self.end,
      line:     self.line,
      column:   self.col,
    }
  }
}

#[derive(Debug, Deserialize)]
struct SeverityPayload {
  typehint: String,
}
