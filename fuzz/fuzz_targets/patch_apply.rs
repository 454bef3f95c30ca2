#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use the_ensime::patch::PatchSet;

// Input is a diff and a source text separated by the first NUL byte.
fuzz_target!(|data: &[u8]| {
  let Ok(input) = std::str::from_utf8(data) else {
    return;
  };
  let (diff, original) = input.split_once('\0').unwrap_or((input, ""));

  let Ok(patch_set) = PatchSet::parse(diff) else {
    return;
  };
  for file in &patch_set.files {
    if let Ok(patched) = file.apply_to_text(original, Path::new("fuzz.scala")) {
      let _ = file.apply_to_text(&patched, Path::new("fuzz.scala"));
    }
  }
});
