use std::{
  collections::{
    HashMap,
    HashSet,
    VecDeque,
  },
  fs,
  path::{
    Path,
    PathBuf,
  },
  time::Duration,
};

use serde_json::{
  Value,
  json,
};
use tempfile::TempDir;
use the_ensime::{
  CallContext,
  CallId,
  CallOptions,
  Config,
  Dispatcher,
  Editor,
  Message,
  Outcome,
  RefactorTargets,
  Request,
  RequestSender,
  Tag,
  host::{
    HostError,
    OnSelect,
    Popup,
    SelectionItem,
    Task,
    ViewId,
  },
  notes::Note,
  signature::Suggestion,
};

#[derive(Default)]
struct RecordingHost {
  views:              HashMap<PathBuf, ViewId>,
  loading:            HashSet<ViewId>,
  slow_loading:       bool,
  open_files:         Vec<PathBuf>,
  focused:            Vec<ViewId>,
  scrolled:           Vec<(ViewId, u32)>,
  jumps:              Vec<(PathBuf, u32)>,
  reloaded:           Vec<PathBuf>,
  highlights:         Vec<Note>,
  statuses:           Vec<String>,
  errors:             Vec<String>,
  popups:             Vec<Popup>,
  selections:         VecDeque<(Vec<SelectionItem>, OnSelect)>,
  tasks:              VecDeque<(Duration, Task)>,
  clipboard:          Option<String>,
  opened_urls:        Vec<String>,
  browser_broken:     bool,
  http_port:          Option<u16>,
  prefix:             Option<String>,
  suggestions:        Vec<Suggestion>,
  completion_visible: bool,
  refreshes:          usize,
  sent:               Vec<Request>,
}

impl RecordingHost {
  /// Runs scheduled tasks in order, including the ones they schedule.
  fn run_tasks(&mut self) -> usize {
    let mut ran = 0;
    while let Some((_, task)) = self.tasks.pop_front() {
      task(self);
      ran += 1;
      assert!(ran < 100, "scheduled tasks did not settle");
    }
    ran
  }

  fn choose(&mut self, choice: Option<usize>) {
    let (_, on_select) = self.selections.pop_front().expect("a pending selection");
    on_select(self, choice);
  }

  fn selection_labels(&self) -> Vec<String> {
    self
      .selections
      .front()
      .expect("a pending selection")
      .0
      .iter()
      .map(|item| item.label.clone())
      .collect()
  }

  fn click(&mut self, href: &str) {
    let mut popup = self.popups.pop().expect("a popup");
    let mut on_navigate = popup.on_navigate.take().expect("navigable popup");
    on_navigate(self, href);
  }
}

impl Editor for RecordingHost {
  fn view_for_file(&self, path: &Path) -> Option<ViewId> {
    self.views.get(path).copied()
  }

  fn open_file(&mut self, path: &Path) -> ViewId {
    let view = ViewId(self.views.len() as u64 + 1);
    self.views.insert(path.to_path_buf(), view);
    if self.slow_loading {
      self.loading.insert(view);
    }
    view
  }

  fn is_loading(&self, view: ViewId) -> bool {
    self.loading.contains(&view)
  }

  fn offset_to_row(&self, _view: ViewId, offset: usize) -> u32 {
    (offset / 10) as u32
  }

  fn focus_view(&mut self, view: ViewId) {
    self.focused.push(view);
  }

  fn scroll_to_line(&mut self, view: ViewId, line: u32) {
    self.scrolled.push((view, line));
  }

  fn open_and_scroll(&mut self, path: &Path, line: u32) {
    self.jumps.push((path.to_path_buf(), line));
  }

  fn reload_file(&mut self, path: &Path) {
    self.reloaded.push(path.to_path_buf());
  }

  fn open_files(&self) -> Vec<PathBuf> {
    self.open_files.clone()
  }

  fn redraw_highlights(&mut self, notes: &[Note]) {
    self.highlights = notes.to_vec();
  }

  fn status_message(&mut self, text: &str) {
    self.statuses.push(text.to_string());
  }

  fn error_message(&mut self, text: &str) {
    self.errors.push(text.to_string());
  }

  fn show_popup(&mut self, popup: Popup) {
    self.popups.push(popup);
  }

  fn hide_popup(&mut self) {
    self.popups.clear();
  }

  fn show_selection(&mut self, items: Vec<SelectionItem>, on_select: OnSelect) {
    self.selections.push_back((items, on_select));
  }

  fn schedule(&mut self, delay: Duration, task: Task) {
    self.tasks.push_back((delay, task));
  }

  fn set_clipboard(&mut self, text: &str) {
    self.clipboard = Some(text.to_string());
  }

  fn open_url(&mut self, url: &str) -> Result<(), HostError> {
    if self.browser_broken {
      return Err(HostError::OpenUrl {
        url:    url.to_string(),
        reason: "no browser".into(),
      });
    }
    self.opened_urls.push(url.to_string());
    Ok(())
  }

  fn http_port(&self) -> Option<u16> {
    self.http_port
  }

  fn current_prefix(&self) -> Option<String> {
    self.prefix.clone()
  }

  fn set_current_prefix(&mut self, prefix: Option<String>) {
    self.prefix = prefix;
  }

  fn set_suggestions(&mut self, suggestions: Vec<Suggestion>) {
    self.suggestions = suggestions;
  }

  fn is_completion_visible(&self) -> bool {
    self.completion_visible
  }

  fn refresh_completions(&mut self) {
    self.refreshes += 1;
  }
}

impl RequestSender for RecordingHost {
  fn send_async(&mut self, request: Request) {
    self.sent.push(request);
  }
}

struct Fixture {
  dispatcher:   Dispatcher,
  host:         RecordingHost,
  calls:        CallContext,
  refactorings: RefactorTargets,
}

impl Fixture {
  fn new(project_root: &Path) -> Self {
    Self::with_config(Config::default(), project_root)
  }

  fn with_config(config: Config, project_root: &Path) -> Self {
    let calls = CallContext::new();
    let refactorings = RefactorTargets::new();
    Self {
      dispatcher: Dispatcher::new(config, project_root, calls.clone(), refactorings.clone()),
      host: RecordingHost::default(),
      calls,
      refactorings,
    }
  }

  fn send(&mut self, call_id: u64, body: Value) -> Outcome {
    let message = Message::from_payload(CallId::from(call_id), body).expect("message");
    self
      .dispatcher
      .dispatch(&mut self.host, message)
      .expect("dispatch")
  }
}

fn project() -> TempDir {
  TempDir::new().expect("temp dir")
}

fn basic(name: &str) -> Value {
  json!({ "typehint": "BasicTypeInfo", "name": name, "fullName": format!("scala.{name}") })
}

#[test]
fn unknown_tag_does_not_stop_dispatch() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  let outcome = fixture.send(1, json!({ "typehint": "SomethingNewEvent", "x": 1 }));
  assert_eq!(outcome, Outcome::Unhandled);

  let outcome = fixture.send(2, json!({ "typehint": "ConnectionInfo", "version": "0.9.10" }));
  assert_eq!(outcome, Outcome::Handled);
  assert_eq!(fixture.dispatcher.session().server_version(), "0.9.10");
}

#[test]
fn only_first_connection_info_counts() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(1, json!({ "typehint": "ConnectionInfo", "version": "1.0.0" }));
  fixture.send(2, json!({ "typehint": "ConnectionInfo", "version": "2.0.0" }));
  assert_eq!(fixture.dispatcher.session().server_version(), "1.0.0");
  assert_eq!(fixture.host.statuses.len(), 1);

  fixture.dispatcher.reset_session();
  fixture.send(3, json!({ "typehint": "ConnectionInfo", "version": "2.0.0" }));
  assert_eq!(fixture.dispatcher.session().server_version(), "2.0.0");
}

#[test]
fn unsupported_message_is_reported() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  fixture.send(1, json!({ "typehint": "ConnectionInfo", "version": "2.0.0" }));

  let outcome = fixture.send(2, json!({ "typehint": "PackageInfo", "name": "scala" }));
  assert_eq!(outcome, Outcome::Unsupported);
  let status = fixture.host.statuses.last().expect("status");
  assert!(status.contains("PackageInfo"));
  assert!(status.contains("2.0.0"));
}

#[test]
fn malformed_payload_is_an_error() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let message = Message::from_payload(
    CallId::from(1),
    json!({ "typehint": "NewScalaNotesEvent", "notes": 5 }),
  )
  .expect("message");

  let err = fixture
    .dispatcher
    .dispatch(&mut fixture.host, message)
    .expect_err("decode failure");
  assert_eq!(err.tag, Tag::ScalaNotes);
}

#[test]
fn readiness_and_typecheck_request() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let open = root.path().join("Main.scala");
  fixture.host.open_files = vec![open.clone()];

  fixture.send(1, json!({ "typehint": "IndexerReadyEvent" }));
  assert!(fixture.dispatcher.session().indexer_ready());
  assert!(!fixture.dispatcher.session().analyzer_ready());

  fixture.send(2, json!({ "typehint": "AnalyzerReadyEvent" }));
  assert!(fixture.dispatcher.session().analyzer_ready());
  assert_eq!(fixture.host.sent, vec![Request::TypecheckFiles {
    files: vec![open],
  }]);
}

#[test]
fn notes_accumulate_until_cleared() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let note = |msg: &str| {
    json!({
      "file": "/p/Main.scala",
      "msg": msg,
      "severity": { "typehint": "NoteError" },
      "beg": 10,
      "end": 12,
      "line": 2,
      "col": 3,
    })
  };

  fixture.send(
    1,
    json!({ "typehint": "NewScalaNotesEvent", "isFull": false, "notes": [note("a")] }),
  );
  fixture.send(
    2,
    json!({ "typehint": "NewScalaNotesEvent", "isFull": false, "notes": [note("b")] }),
  );
  fixture.send(
    3,
    json!({ "typehint": "NewJavaNotesEvent", "isFull": false, "notes": [note("c")] }),
  );
  assert_eq!(fixture.dispatcher.notes().len(), 2);

  fixture.send(4, json!({ "typehint": "FullTypeCheckCompleteEvent" }));
  let messages = fixture
    .host
    .highlights
    .iter()
    .map(|note| note.message.as_str())
    .collect::<Vec<_>>();
  assert_eq!(messages, ["a", "b"]);

  fixture.send(5, json!({ "typehint": "ClearAllScalaNotesEvent" }));
  assert!(fixture.dispatcher.notes().is_empty());
}

#[test]
fn import_suggestions_are_sorted_and_deduplicated() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let file = root.path().join("Main.scala");
  fixture
    .calls
    .insert(CallId::from(7), CallOptions::for_file(&file));

  fixture.send(
    7,
    json!({
      "typehint": "ImportSuggestions",
      "symLists": [
        [{ "name": "scala.util.Random$" }, { "name": "scala.util.Random$" }],
        [{ "name": "java.util.List$" }],
      ],
    }),
  );
  assert!(fixture.host.selections.is_empty());
  fixture.host.run_tasks();
  assert_eq!(fixture.host.selection_labels(), [
    "java.util.List",
    "scala.util.Random"
  ]);

  fixture.host.choose(Some(1));
  assert_eq!(fixture.host.sent, vec![Request::AddImport {
    qualified_name: "scala.util.Random".into(),
    file,
  }]);
  assert!(fixture.calls.is_empty());
}

#[test]
fn cancelled_import_sends_nothing() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  fixture
    .calls
    .insert(CallId::from(7), CallOptions::for_file(root.path().join("A.scala")));

  fixture.send(
    7,
    json!({ "typehint": "ImportSuggestions", "symLists": [[{ "name": "java.util.List" }]] }),
  );
  fixture.host.run_tasks();
  fixture.host.choose(None);
  assert!(fixture.host.sent.is_empty());
  assert!(fixture.calls.is_empty());
}

#[test]
fn no_import_suggestions_is_an_error() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(7, json!({ "typehint": "ImportSuggestions", "symLists": [[]] }));
  fixture.host.run_tasks();
  assert!(fixture.host.selections.is_empty());
  assert_eq!(fixture.host.errors.len(), 1);
}

#[test]
fn completions_for_new_prefix_replace_suggestions() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(
    1,
    json!({
      "typehint": "CompletionInfoList",
      "prefix": "fo",
      "completions": [
        {
          "name": "foo",
          "typeInfo": {
            "typehint": "ArrowTypeInfo",
            "name": "(x: Int)String",
            "paramSections": [{ "params": [["x", basic("Int")]], "isImplicit": false }],
            "resultType": basic("String"),
          },
        },
        { "name": "fold" },
        { "name": "format", "typeInfo": basic("String") },
      ],
    }),
  );

  assert_eq!(fixture.host.prefix.as_deref(), Some("fo"));
  let snippets = fixture
    .host
    .suggestions
    .iter()
    .map(|suggestion| suggestion.snippet.as_str())
    .collect::<Vec<_>>();
  assert_eq!(snippets, ["foo(${1:x:Int})", "format"]);
  assert_eq!(fixture.host.refreshes, 0);
}

#[test]
fn completions_for_tracked_prefix_refresh_visible_popup() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  fixture.host.prefix = Some("fo".into());
  fixture.host.completion_visible = true;

  fixture.send(
    1,
    json!({
      "typehint": "CompletionInfoList",
      "prefix": "fo",
      "completions": [{ "name": "format", "typeInfo": basic("String") }],
    }),
  );
  assert!(fixture.host.suggestions.is_empty());

  fixture.host.run_tasks();
  assert_eq!(fixture.host.suggestions.len(), 1);
  assert_eq!(fixture.host.refreshes, 1);
}

#[test]
fn stale_completions_are_dropped_once_popup_closes() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  fixture.host.prefix = Some("fo".into());

  fixture.send(
    1,
    json!({
      "typehint": "CompletionInfoList",
      "prefix": "fo",
      "completions": [{ "name": "format", "typeInfo": basic("String") }],
    }),
  );
  fixture.host.run_tasks();
  assert!(fixture.host.suggestions.is_empty());
  assert_eq!(fixture.host.refreshes, 0);
}

const SOURCE: &str = "package app\n\nobject Main {\n  val x = 1\n}\n";

fn refactor_effect(procedure_id: u64, kind: &str, diff: &Path) -> Value {
  json!({
    "typehint": "RefactorDiffEffect",
    "procedureId": procedure_id,
    "refactorType": { "typehint": kind },
    "diff": diff,
  })
}

fn write_diff(dir: &Path, target: &Path, context: &str) -> PathBuf {
  let diff = format!(
    "--- {path}\t2017-01-01 00:00:00\n+++ {path}\t2017-01-01 00:00:01\n@@ -1,3 +1,5 @@\n \
     {context}\n \n+import scala.util.Random\n+\n object Main {{\n",
    path = target.display()
  );
  let diff_path = dir.join("refactor.diff");
  fs::write(&diff_path, diff).expect("write diff");
  diff_path
}

#[test]
fn refactoring_patches_and_reloads_target() {
  let root = project();
  let target = root.path().join("Main.scala");
  fs::write(&target, SOURCE).expect("write source");
  let diff = write_diff(root.path(), &target, "package app");

  let mut fixture = Fixture::new(root.path());
  fixture.refactorings.insert(3, &target);
  fixture.send(9, refactor_effect(3, "AddImport", &diff));
  fixture.host.run_tasks();

  let patched = fs::read_to_string(&target).expect("read target");
  assert!(patched.starts_with("package app\n\nimport scala.util.Random\n\nobject Main {"));
  assert_eq!(fixture.host.reloaded, vec![target]);
  assert!(fixture.host.errors.is_empty());
  assert_eq!(fixture.refactorings.get(3), None);
}

#[test]
fn failed_refactoring_names_the_diff() {
  let root = project();
  let target = root.path().join("Main.scala");
  fs::write(&target, SOURCE).expect("write source");
  let diff = write_diff(root.path(), &target, "package other");

  let mut fixture = Fixture::new(root.path());
  fixture.refactorings.insert(3, &target);
  fixture.send(9, refactor_effect(3, "Rename", &diff));
  fixture.host.run_tasks();

  assert_eq!(fs::read_to_string(&target).expect("read target"), SOURCE);
  assert!(fixture.host.reloaded.is_empty());
  let error = fixture.host.errors.last().expect("error");
  assert!(error.contains(&diff.display().to_string()));
}

#[test]
fn unsupported_refactoring_is_ignored() {
  let root = project();
  let target = root.path().join("Main.scala");
  fs::write(&target, SOURCE).expect("write source");
  let diff = write_diff(root.path(), &target, "package app");

  let mut fixture = Fixture::new(root.path());
  fixture.refactorings.insert(3, &target);
  let outcome = fixture.send(9, refactor_effect(3, "ExtractMethod", &diff));
  fixture.host.run_tasks();

  assert_eq!(outcome, Outcome::Handled);
  assert_eq!(fs::read_to_string(&target).expect("read target"), SOURCE);
  assert!(fixture.host.errors.is_empty());
  assert!(fixture.host.statuses.is_empty());
  assert_eq!(fixture.refactorings.get(3), Some(target));
}

#[test]
fn refactoring_without_target_is_reported() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(9, refactor_effect(3, "AddImport", &root.path().join("x.diff")));
  assert_eq!(fixture.host.errors.len(), 1);
}

fn symbol_info(file: &Path, line: Option<u32>, offset: Option<usize>) -> Value {
  json!({
    "typehint": "SymbolInfo",
    "name": "Main",
    "declPos": { "typehint": "OffsetSourcePosition", "file": file, "line": line, "offset": offset },
  })
}

#[test]
fn declaration_in_open_view_is_focused() {
  let root = project();
  let file = root.path().join("Main.scala");
  let mut fixture = Fixture::new(root.path());
  let view = fixture.host.open_file(&file);

  fixture.send(1, symbol_info(&file, Some(12), None));
  assert_eq!(fixture.host.focused, vec![view]);
  assert_eq!(fixture.host.scrolled, vec![(view, 12)]);
}

#[test]
fn declaration_scrolls_once_view_loads() {
  let root = project();
  let file = root.path().join("Main.scala");
  let mut fixture = Fixture::new(root.path());
  fixture.host.slow_loading = true;

  fixture.send(1, symbol_info(&file, None, Some(45)));
  let view = fixture.host.view_for_file(&file).expect("opened view");
  let (_, first_poll) = fixture.host.tasks.pop_front().expect("poll");
  first_poll(&mut fixture.host);
  assert!(fixture.host.scrolled.is_empty());

  fixture.host.loading.clear();
  fixture.host.run_tasks();
  assert_eq!(fixture.host.scrolled, vec![(view, 5)]);
}

#[test]
fn scrolling_is_abandoned_when_view_never_loads() {
  let root = project();
  let file = root.path().join("Main.scala");
  let config = Config::from_toml_str("[scroll]\nattempts = 3\n").expect("config");
  let mut fixture = Fixture::with_config(config, root.path());
  fixture.host.slow_loading = true;

  fixture.send(1, symbol_info(&file, Some(8), None));
  assert_eq!(fixture.host.run_tasks(), 4);
  assert!(fixture.host.scrolled.is_empty());
}

#[test]
fn declaration_without_position_is_reported() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(1, json!({ "typehint": "SymbolInfo", "name": "Main" }));
  assert!(fixture.host.errors[0].contains("Main"));
  assert!(fixture.host.views.is_empty());
}

#[test]
fn documentation_is_browsed_or_stored() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  fixture.host.http_port = Some(8080);
  fixture
    .calls
    .insert(CallId::from(1), CallOptions::browsing());

  fixture.send(1, json!({ "typehint": "StringResponse", "text": "scala/Option.html" }));
  fixture.host.run_tasks();
  assert_eq!(fixture.host.opened_urls, vec![
    "http://127.0.0.1:8080/scala/Option.html".to_string()
  ]);
  assert!(fixture.calls.is_empty());

  let url = "https://docs.oracle.com/javase/8/docs/api/java/util/List.html";
  fixture.send(2, json!({ "typehint": "StringResponse", "text": url }));
  fixture.host.run_tasks();
  assert_eq!(fixture.host.opened_urls.len(), 1);
  assert_eq!(
    fixture
      .dispatcher
      .take_string_response(&CallId::from(2))
      .as_deref(),
    Some(url)
  );
}

#[test]
fn broken_browser_shows_manual_link() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  fixture.host.http_port = Some(8080);
  fixture.host.browser_broken = true;
  fixture
    .calls
    .insert(CallId::from(1), CallOptions::browsing());

  fixture.send(1, json!({ "typehint": "StringResponse", "text": "scala/Option.html" }));
  fixture.host.run_tasks();
  assert!(fixture.host.errors[0].contains("http://127.0.0.1:8080/scala/Option.html"));
}

#[test]
fn type_popup_copies_type_name() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(
    1,
    json!({
      "typehint": "ArrowTypeInfo",
      "name": "(f: => A)List[A]",
      "paramSections": [{ "params": [["f", basic("<byname>[A]")]], "isImplicit": false }],
      "resultType": { "typehint": "BasicTypeInfo", "name": "List[A]" },
    }),
  );
  fixture.host.run_tasks();

  let popup = fixture.host.popups.last().expect("popup");
  assert!(popup.content.contains("(f: =&gt; A) =&gt; List[A]"));
  assert_eq!(popup.max_width, Some(512));

  let href = "(f: =&gt; A) =&gt; List[A]";
  fixture.host.click(href);
  assert_eq!(fixture.host.clipboard.as_deref(), Some("(f: => A) => List[A]"));
  assert!(fixture.host.popups.is_empty());
}

#[test]
fn usages_without_results_show_notice() {
  let root = project();
  let mut fixture = Fixture::new(root.path());

  fixture.send(1, json!({ "typehint": "SourcePositions", "positions": [] }));
  fixture.host.run_tasks();
  assert_eq!(fixture.host.popups[0].content, "No usages found.");
  assert!(fixture.host.selections.is_empty());
}

#[test]
fn usages_jump_to_chosen_location() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let file = root.path().join("src").join("Main.scala");

  fixture.send(
    1,
    json!({
      "typehint": "SourcePositions",
      "positions": [
        {
          "position": { "typehint": "LineSourcePosition", "file": file, "line": 4 },
          "preview": "val x = 1",
        },
        { "position": { "typehint": "LineSourcePosition", "file": file, "line": 0 } },
      ],
    }),
  );
  fixture.host.run_tasks();

  let (items, _) = fixture.host.selections.front().expect("selection");
  assert_eq!(items[0].label, "val x = 1");
  assert_eq!(items[0].detail.as_deref(), Some("src/Main.scala | Line 4"));
  assert_eq!(items[1].label, "no preview available");
  assert_eq!(items[1].detail.as_deref(), Some("src/Main.scala | Line 1"));

  fixture.host.choose(Some(1));
  assert_eq!(fixture.host.jumps, vec![(file, 1)]);
}

#[test]
fn symbol_search_lists_located_results() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let file = root.path().join("A.scala");

  fixture.send(
    1,
    json!({
      "typehint": "SymbolSearchResults",
      "syms": [
        {
          "name": "app.Outer$Inner",
          "pos": { "typehint": "LineSourcePosition", "file": file, "line": 0 },
        },
        { "name": "app.NoPosition" },
        { "name": "app.Empty", "pos": { "typehint": "EmptySourcePosition" } },
      ],
    }),
  );
  fixture.host.run_tasks();

  let (items, _) = fixture.host.selections.front().expect("selection");
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].label, "app.Outer.Inner");
  assert_eq!(items[0].detail.as_deref(), Some("A.scala | Line 1"));

  fixture.host.choose(Some(0));
  assert_eq!(fixture.host.jumps, vec![(file, 1)]);
}

#[test]
fn cancelled_symbol_search_does_not_jump() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let file = root.path().join("A.scala");

  fixture.send(
    1,
    json!({
      "typehint": "SymbolSearchResults",
      "syms": [{
        "name": "app.Main",
        "pos": { "typehint": "LineSourcePosition", "file": file, "line": 3 },
      }],
    }),
  );
  fixture.host.run_tasks();
  fixture.host.choose(None);
  assert!(fixture.host.jumps.is_empty());
}

#[test]
fn implementations_are_labelled_by_kind() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let file = root.path().join("Impl.scala");

  fixture.send(1, json!({ "typehint": "HierarchyInfo", "inheritors": [] }));
  fixture.host.run_tasks();
  assert_eq!(fixture.host.popups[0].content, "No implementations found.");

  fixture.send(
    2,
    json!({
      "typehint": "HierarchyInfo",
      "inheritors": [{
        "scalaName": "app.Impl",
        "fqn": "app.Impl",
        "declAs": { "typehint": "Class" },
        "sourcePosition": { "typehint": "LineSourcePosition", "file": file, "line": 3 },
      }],
    }),
  );
  fixture.host.run_tasks();
  assert_eq!(fixture.host.selection_labels(), ["Class app.Impl"]);
}

#[test]
fn debugger_events_reach_the_editor() {
  let root = project();
  let mut fixture = Fixture::new(root.path());
  let file = root.path().join("Main.scala");

  fixture.send(1, json!({ "typehint": "DebugOutputEvent", "body": "hello\n" }));
  assert_eq!(fixture.host.statuses, vec!["hello".to_string()]);

  fixture.send(
    2,
    json!({
      "typehint": "DebugBreakEvent",
      "threadId": "1",
      "threadName": "main",
      "file": file,
      "line": 7,
    }),
  );
  assert_eq!(fixture.host.jumps, vec![(file, 7)]);
}
