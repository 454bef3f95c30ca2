//! Unified diff parsing and application.
//!
//! Every file of a patch set is patched in memory first; nothing touches the
//! disk unless all hunks of all files apply. If writing one file fails, the
//! files already written are restored.

use std::{
  fs,
  io::Write,
  path::{
    Component,
    Path,
    PathBuf,
  },
};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{
  debug,
  warn,
};

const DEV_NULL: &str = "/dev/null";

#[derive(Debug, Error)]
pub enum PatchError {
  #[error("diff could not be parsed")]
  Unparseable,
  #[error("failed to read diff {path}: {source}")]
  Unreadable {
    path:   PathBuf,
    source: std::io::Error,
  },
  #[error("failed to read patch target {path}: {source}")]
  MissingTarget {
    path:   PathBuf,
    source: std::io::Error,
  },
  #[error("hunk {hunk} does not apply to {path} at line {line}")]
  HunkMismatch {
    path: PathBuf,
    hunk: usize,
    line: usize,
  },
  #[error("deleting {0} is not supported")]
  Deletion(PathBuf),
  #[error("failed to write {path}: {source}")]
  Write {
    path:   PathBuf,
    source: std::io::Error,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkLine {
  Context(String),
  Removed(String),
  Added(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
  pub source_start:  usize,
  pub source_len:    usize,
  pub target_start:  usize,
  pub target_len:    usize,
  pub lines:         Vec<HunkLine>,
  /// The new side ends without a trailing newline.
  pub target_no_eol: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
  pub source: String,
  pub target: String,
  pub hunks:  Vec<Hunk>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSet {
  pub files: Vec<FilePatch>,
}

impl PatchSet {
  /// Parses a unified diff. Text that yields no file with at least one hunk
  /// is rejected.
  pub fn parse(text: &str) -> Result<Self, PatchError> {
    let mut lines = text.lines().peekable();
    let mut files = Vec::new();

    while let Some(line) = lines.next() {
      let Some(source) = line.strip_prefix("--- ") else {
        continue;
      };
      let target = lines
        .next()
        .and_then(|line| line.strip_prefix("+++ "))
        .ok_or(PatchError::Unparseable)?;

      let mut hunks = Vec::new();
      while let Some(header) = lines.peek().copied() {
        if !header.starts_with("@@") {
          break;
        }
        lines.next();
        let mut hunk = parse_hunk_header(header).ok_or(PatchError::Unparseable)?;
        read_hunk_body(&mut lines, &mut hunk)?;
        hunks.push(hunk);
      }
      if hunks.is_empty() {
        return Err(PatchError::Unparseable);
      }

      files.push(FilePatch {
        source: header_path(source),
        target: header_path(target),
        hunks,
      });
    }

    if files.is_empty() {
      return Err(PatchError::Unparseable);
    }
    Ok(Self { files })
  }

  /// Applies every file patch under `root` after dropping `strip` leading
  /// components from the header paths. Returns the written files.
  pub fn apply(&self, strip: usize, root: &Path) -> Result<Vec<PathBuf>, PatchError> {
    let mut staged: Vec<(PathBuf, String)> = Vec::new();

    for file in &self.files {
      if file.target == DEV_NULL {
        return Err(PatchError::Deletion(rebase(root, &file.source, strip)));
      }
      let path = rebase(root, &file.target, strip);
      let original = match staged.iter().position(|(staged, _)| *staged == path) {
        Some(index) => staged.remove(index).1,
        None if file.source == DEV_NULL => String::new(),
        None => {
          // A renamed file is read from its old path and written to the new one.
          let source = rebase(root, &file.source, strip);
          fs::read_to_string(&source).map_err(|err| {
            PatchError::MissingTarget {
              path:   source.clone(),
              source: err,
            }
          })?
        },
      };
      let patched = file.apply_to_text(&original, &path)?;
      staged.push((path, patched));
    }

    commit(&staged)?;
    Ok(staged.into_iter().map(|(path, _)| path).collect())
  }
}

impl FilePatch {
  /// Applies the hunks to `original`. `path` only labels errors.
  pub fn apply_to_text(&self, original: &str, path: &Path) -> Result<String, PatchError> {
    let crlf = original.contains("\r\n");
    let lines = original.lines().collect::<Vec<_>>();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut final_newline = original.ends_with('\n');
    let mut cursor = 0usize;

    for (index, hunk) in self.hunks.iter().enumerate() {
      let mismatch = |line: usize| {
        PatchError::HunkMismatch {
          path: path.to_path_buf(),
          hunk: index + 1,
          line,
        }
      };

      // A hunk without old lines inserts after `source_start`.
      let start = if hunk.source_len == 0 {
        hunk.source_start
      } else {
        hunk.source_start.saturating_sub(1)
      };
      if start < cursor || start > lines.len() {
        return Err(mismatch(start.saturating_add(1)));
      }
      out.extend_from_slice(&lines[cursor..start]);

      let mut pos = start;
      for line in &hunk.lines {
        match line {
          HunkLine::Context(text) | HunkLine::Removed(text) => {
            if lines.get(pos).copied() != Some(text.as_str()) {
              return Err(mismatch(pos.saturating_add(1)));
            }
            if matches!(line, HunkLine::Context(_)) {
              out.push(lines[pos]);
            }
            pos += 1;
          },
          HunkLine::Added(text) => out.push(text),
        }
      }
      cursor = pos;
      if cursor == lines.len() {
        final_newline = !hunk.target_no_eol;
      }
    }
    out.extend_from_slice(&lines[cursor..]);

    let eol = if crlf { "\r\n" } else { "\n" };
    let mut text = out.join(eol);
    if final_newline && !out.is_empty() {
      text.push_str(eol);
    }
    Ok(text)
  }
}

/// Filesystem root of `target`, resolving relative targets against
/// `project_root`. Diffs name files by absolute path, so hunks rebased here
/// with no components stripped land on the right files.
pub fn root_from_abspath(target: &Path, project_root: &Path) -> PathBuf {
  let absolute = if target.is_absolute() {
    target.to_path_buf()
  } else {
    project_root.join(target)
  };
  let root = absolute
    .components()
    .take_while(|component| matches!(component, Component::Prefix(_) | Component::RootDir))
    .collect::<PathBuf>();
  if root.as_os_str().is_empty() {
    project_root.to_path_buf()
  } else {
    root
  }
}

/// Parses `diff_text` and applies it rooted at the filesystem root of
/// `target`.
pub fn apply_refactor(
  diff_text: &str,
  target: &Path,
  project_root: &Path,
) -> Result<Vec<PathBuf>, PatchError> {
  let patch_set = PatchSet::parse(diff_text)?;
  let root = root_from_abspath(target, project_root);
  debug!(root = %root.display(), files = patch_set.files.len(), "applying refactoring patch");
  patch_set.apply(0, &root)
}

pub fn read_diff(path: &Path) -> Result<String, PatchError> {
  fs::read_to_string(path).map_err(|source| {
    PatchError::Unreadable {
      path: path.to_path_buf(),
      source,
    }
  })
}

fn parse_hunk_header(line: &str) -> Option<Hunk> {
  let rest = line.strip_prefix("@@ -")?;
  let (ranges, _) = rest.split_once(" @@")?;
  let (source, target) = ranges.split_once(" +")?;
  let (source_start, source_len) = parse_range(source)?;
  let (target_start, target_len) = parse_range(target)?;
  Some(Hunk {
    source_start,
    source_len,
    target_start,
    target_len,
    lines: Vec::new(),
    target_no_eol: false,
  })
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
  match range.split_once(',') {
    Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
    None => Some((range.parse().ok()?, 1)),
  }
}

fn read_hunk_body<'a>(
  lines: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
  hunk: &mut Hunk,
) -> Result<(), PatchError> {
  let mut source_left = hunk.source_len;
  let mut target_left = hunk.target_len;

  while source_left > 0 || target_left > 0 {
    let line = lines.next().ok_or(PatchError::Unparseable)?;
    if line.starts_with('\\') {
      mark_no_eol(hunk);
      continue;
    }

    let (marker, text) = match line.char_indices().nth(1) {
      Some((split, _)) => line.split_at(split),
      None => (line, ""),
    };
    let hunk_line = match marker {
      " " | "" => HunkLine::Context(text.to_string()),
      "-" => HunkLine::Removed(text.to_string()),
      "+" => HunkLine::Added(text.to_string()),
      _ => return Err(PatchError::Unparseable),
    };
    if !matches!(hunk_line, HunkLine::Added(_)) {
      source_left = source_left
        .checked_sub(1)
        .ok_or(PatchError::Unparseable)?;
    }
    if !matches!(hunk_line, HunkLine::Removed(_)) {
      target_left = target_left
        .checked_sub(1)
        .ok_or(PatchError::Unparseable)?;
    }
    hunk.lines.push(hunk_line);
  }

  if lines.peek().is_some_and(|line| line.starts_with('\\')) {
    lines.next();
    mark_no_eol(hunk);
  }
  Ok(())
}

fn mark_no_eol(hunk: &mut Hunk) {
  if matches!(
    hunk.lines.last(),
    Some(HunkLine::Added(_) | HunkLine::Context(_))
  ) {
    hunk.target_no_eol = true;
  }
}

fn header_path(header: &str) -> String {
  header
    .split('\t')
    .next()
    .unwrap_or(header)
    .trim_end()
    .to_string()
}

fn rebase(root: &Path, header_path: &str, strip: usize) -> PathBuf {
  let relative = header_path
    .split('/')
    .filter(|part| !part.is_empty())
    .skip(strip)
    .collect::<PathBuf>();
  root.join(relative)
}

fn commit(staged: &[(PathBuf, String)]) -> Result<(), PatchError> {
  let write_error = |path: &Path, source: std::io::Error| {
    PatchError::Write {
      path: path.to_path_buf(),
      source,
    }
  };

  let mut pending = Vec::with_capacity(staged.len());
  for (path, text) in staged {
    let dir = path
      .parent()
      .filter(|dir| !dir.as_os_str().is_empty())
      .unwrap_or(Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|err| write_error(path, err))?;
    file
      .write_all(text.as_bytes())
      .map_err(|err| write_error(path, err))?;
    if let Ok(metadata) = fs::metadata(path) {
      file
        .as_file()
        .set_permissions(metadata.permissions())
        .map_err(|err| write_error(path, err))?;
    }
    pending.push((path, file));
  }

  // Files replaced so far, with their previous contents, so a failed persist
  // can put them back.
  let mut replaced: Vec<(&Path, Option<Vec<u8>>)> = Vec::with_capacity(pending.len());
  for (path, file) in pending {
    let backup = fs::read(path).ok();
    if let Err(err) = file.persist(path) {
      rollback(&replaced);
      return Err(write_error(path, err.error));
    }
    replaced.push((path.as_path(), backup));
  }
  Ok(())
}

fn rollback(replaced: &[(&Path, Option<Vec<u8>>)]) {
  for (path, backup) in replaced.iter().rev() {
    let restored = match backup {
      Some(contents) => fs::write(path, contents),
      None => fs::remove_file(path),
    };
    if let Err(err) = restored {
      warn!(path = %path.display(), error = %err, "failed to restore file after patch failure");
    }
  }
}
