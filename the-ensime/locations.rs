use std::path::{
  Component,
  Path,
};

use crate::types::Location;

/// One row of a location picker: the `path | Line N` text and where to jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationEntry {
  pub label:  String,
  pub target: Location,
}

/// Builds picker rows in input order. Paths under `project_root` are shown
/// relative to it.
pub fn build_location_list(
  locations: impl IntoIterator<Item = Location>,
  project_root: &Path,
) -> Vec<LocationEntry> {
  locations
    .into_iter()
    .map(|target| {
      let path = display_path(project_root, &target.file);
      LocationEntry {
        label: file_and_line_info(&path, target.line),
        target,
      }
    })
    .collect()
}

pub fn file_and_line_info(path: &str, line: u32) -> String {
  format!("{} | Line {}", path.trim(), line.max(1))
}

/// Project-relative path with `/` separators when `file` lies under
/// `project_root`, the raw path otherwise.
pub fn display_path(project_root: &Path, file: &Path) -> String {
  relative_path(project_root, file)
    .map(|relative| encode_path(&relative))
    .unwrap_or_else(|| file.display().to_string())
}

fn relative_path<'a>(project_root: &Path, file: &'a Path) -> Option<&'a Path> {
  if project_root.as_os_str().is_empty() {
    return None;
  }
  file
    .strip_prefix(project_root)
    .ok()
    .filter(|relative| !relative.as_os_str().is_empty())
}

fn encode_path(path: &Path) -> String {
  path
    .components()
    .filter_map(|component| {
      match component {
        Component::Normal(part) => Some(part.to_string_lossy()),
        _ => None,
      }
    })
    .collect::<Vec<_>>()
    .join("/")
}

/// Replaces the server's internal `$` member separator with `.` and drops a
/// trailing separator left by module names (`Random$` -> `Random`).
pub fn normalize_symbol_name(name: &str) -> String {
  let dotted = name.replace('$', ".");
  dotted.trim_end_matches('.').to_string()
}
