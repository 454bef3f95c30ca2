//! Response handlers, one per message tag.

use std::{
  collections::BTreeSet,
  path::PathBuf,
  sync::Arc,
  time::Duration,
};

use serde::Deserialize;
use serde_json::Value;
use tracing::{
  debug,
  error,
  info,
  warn,
};
use url::Url;

use crate::{
  call_context::ProcedureId,
  dispatch::{
    DispatchTable,
    HandlerContext,
    HandlerError,
  },
  host::{
    Host,
    Popup,
    SelectionItem,
    Task,
  },
  html,
  locations::{
    build_location_list,
    normalize_symbol_name,
  },
  notes::parse_notes_event,
  patch,
  protocol::{
    CallId,
    Tag,
  },
  request::Request,
  scroll::{
    ScrollTarget,
    ScrollWait,
  },
  signature::{
    format_type,
    suggestions_from,
  },
  types::{
    Completion,
    DeclaredAs,
    Location,
    SourcePosition,
    TypeInfo,
  },
};

pub const SUPPORTED_REFACTORINGS: [&str; 4] = ["AddImport", "OrganizeImports", "Rename", "InlineLocal"];

type HandlerResult = Result<(), HandlerError>;

pub(crate) fn register(table: &mut DispatchTable) {
  table.set(Tag::ConnectionInfo, Arc::new(handle_connection_info));
  table.set(Tag::BackgroundMessage, Arc::new(handle_background_message));
  table.set(Tag::SymbolInfo, Arc::new(handle_symbol_info));
  table.set(Tag::IndexerReady, Arc::new(handle_indexer_ready));
  table.set(Tag::AnalyzerReady, Arc::new(handle_analyzer_ready));
  table.set(Tag::ScalaNotes, Arc::new(handle_scala_notes));
  table.set(Tag::JavaNotes, Arc::new(handle_java_notes));
  table.set(Tag::ClearScalaNotes, Arc::new(handle_clear_scala_notes));
  table.set(Tag::BasicTypeInfo, Arc::new(handle_type_info));
  table.set(Tag::ArrowTypeInfo, Arc::new(handle_type_info));
  table.set(Tag::FullTypecheckComplete, Arc::new(handle_typecheck_complete));
  table.set(Tag::StringResponse, Arc::new(handle_string_response));
  table.set(Tag::CompletionInfoList, Arc::new(handle_completion_info_list));
  table.set(Tag::SymbolSearchResults, Arc::new(handle_symbol_search));
  table.set(Tag::DebugOutput, Arc::new(handle_debug_output));
  table.set(Tag::DebugBreak, Arc::new(handle_debug_break));
  table.set(Tag::DebugBacktrace, Arc::new(not_implemented));
  table.set(Tag::DebugVmError, Arc::new(not_implemented));
  table.set(Tag::RefactorDiff, Arc::new(handle_refactor_diff));
  table.set(Tag::ImportSuggestions, Arc::new(handle_import_suggestions));
  table.set(Tag::PackageInfo, Arc::new(not_implemented));
  table.set(Tag::SourcePositions, Arc::new(handle_source_positions));
  table.set(Tag::HierarchyInfo, Arc::new(handle_hierarchy_info));
}

fn decode<T: for<'de> Deserialize<'de>>(body: &Value) -> Result<T, HandlerError> {
  Ok(serde_json::from_value(body.clone())?)
}

/// Runs `task` once the current handler has returned.
fn defer(host: &mut dyn Host, task: Task) {
  host.schedule(Duration::ZERO, task);
}

fn not_implemented(_: &mut HandlerContext<'_>, _: &CallId, _: &Value) -> HandlerResult {
  Err(HandlerError::NotImplemented)
}

#[derive(Debug, Deserialize)]
struct ConnectionInfoPayload {
  version: Option<String>,
}

fn handle_connection_info(
  ctx: &mut HandlerContext<'_>,
  _: &CallId,
  body: &Value,
) -> HandlerResult {
  let payload: ConnectionInfoPayload = decode(body)?;
  if !ctx.session.record_connection(payload.version) {
    debug!("ignoring repeated connection info");
    return Ok(());
  }

  let version = ctx.session.server_version();
  info!(
    version,
    "connected to the server, waiting for the analyzer and indexer to get ready"
  );
  ctx
    .host
    .status_message(&format!("Connected to ENSIME server {version}"));
  Ok(())
}

#[derive(Debug, Deserialize)]
struct BackgroundMessagePayload {
  code:   Option<Value>,
  detail: Option<String>,
}

fn handle_background_message(
  _: &mut HandlerContext<'_>,
  _: &CallId,
  body: &Value,
) -> HandlerResult {
  let payload: BackgroundMessagePayload = decode(body)?;
  let code = payload
    .code
    .map(|code| {
      match code {
        Value::String(code) => code,
        other => other.to_string(),
      }
    })
    .unwrap_or_else(|| "unknown code".into());
  let detail = payload.detail.as_deref().unwrap_or("no detail");
  info!("{code} : {detail}");
  Ok(())
}

fn handle_indexer_ready(ctx: &mut HandlerContext<'_>, _: &CallId, _: &Value) -> HandlerResult {
  if ctx.session.mark_indexer_ready() {
    info!("indexer is ready");
  }
  Ok(())
}

fn handle_analyzer_ready(ctx: &mut HandlerContext<'_>, _: &CallId, _: &Value) -> HandlerResult {
  if ctx.session.mark_analyzer_ready() {
    info!("analyzer is ready");
  }
  let files = ctx.host.open_files();
  if !files.is_empty() {
    ctx.host.send_async(Request::TypecheckFiles { files });
  }
  Ok(())
}

fn handle_scala_notes(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let notes = parse_notes_event(body)?;
  debug!(count = notes.len(), "new scala notes");
  ctx.notes.append(notes);
  Ok(())
}

// Java diagnostics are not shown, see DESIGN.md.
fn handle_java_notes(_: &mut HandlerContext<'_>, _: &CallId, _: &Value) -> HandlerResult {
  debug!("ignoring java notes");
  Ok(())
}

fn handle_clear_scala_notes(ctx: &mut HandlerContext<'_>, _: &CallId, _: &Value) -> HandlerResult {
  ctx.notes.clear();
  Ok(())
}

fn handle_typecheck_complete(
  ctx: &mut HandlerContext<'_>,
  _: &CallId,
  _: &Value,
) -> HandlerResult {
  ctx.host.redraw_highlights(ctx.notes.all());
  info!("full typecheck complete, redrawing highlights");
  Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportSuggestionsPayload {
  #[serde(default)]
  sym_lists: Vec<Vec<SymbolPayload>>,
}

#[derive(Debug, Deserialize)]
struct SymbolPayload {
  name: String,
  #[serde(default)]
  pos:  Option<SourcePosition>,
}

fn handle_import_suggestions(
  ctx: &mut HandlerContext<'_>,
  call_id: &CallId,
  body: &Value,
) -> HandlerResult {
  let payload: ImportSuggestionsPayload = decode(body)?;
  let imports = payload
    .sym_lists
    .into_iter()
    .flatten()
    .map(|symbol| normalize_symbol_name(&symbol.name))
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect::<Vec<_>>();

  if imports.is_empty() {
    ctx.host.error_message("No import suggestions found.");
    return Ok(());
  }

  let items = imports.iter().map(SelectionItem::new).collect();
  let calls = ctx.calls.clone();
  let call_id = call_id.clone();
  defer(
    ctx.host,
    Box::new(move |host: &mut dyn Host| {
      host.show_selection(
        items,
        Box::new(move |host: &mut dyn Host, choice: Option<usize>| {
          // Consumed on cancel too; nothing else will read it.
          let options = calls.take(&call_id);
          let Some(qualified_name) = choice.and_then(|index| imports.get(index)) else {
            return;
          };
          let Some(file) = options.and_then(|options| options.file_name) else {
            warn!(call_id = %call_id, "no file recorded for import request");
            host.error_message("Couldn't find the file to add the import to.");
            return;
          };
          // The reply is a refactoring effect that patches and reloads the file.
          host.send_async(Request::AddImport {
            qualified_name: qualified_name.clone(),
            file,
          });
        }),
      );
    }),
  );
  Ok(())
}

#[derive(Debug, Deserialize)]
struct SymbolSearchPayload {
  #[serde(default)]
  syms: Vec<SymbolPayload>,
}

fn handle_symbol_search(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let payload: SymbolSearchPayload = decode(body)?;
  debug!(count = payload.syms.len(), "symbol search results");

  let (names, locations): (Vec<_>, Vec<_>) = payload
    .syms
    .into_iter()
    .filter_map(|symbol| {
      let location = symbol.pos.as_ref()?.location()?;
      Some((normalize_symbol_name(&symbol.name), location))
    })
    .unzip();
  present_locations(ctx, names, locations);
  Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfoPayload {
  name:     Option<String>,
  decl_pos: Option<SourcePosition>,
}

fn handle_symbol_info(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let payload: SymbolInfoPayload = decode(body)?;
  let Some(decl_pos) = payload.decl_pos else {
    ctx.host.error_message(&format!(
      "Couldn't find the declaration position for symbol.\n{}",
      payload.name.unwrap_or_default()
    ));
    return Ok(());
  };
  let Some(file) = decl_pos.file else {
    ctx
      .host
      .error_message("Couldn't find the file where it's defined.");
    return Ok(());
  };
  let target = ScrollTarget::from_position(decl_pos.line, decl_pos.offset);
  debug!(file = %file.display(), ?target, "jumping to declaration");

  match ctx.host.view_for_file(&file) {
    Some(view) => {
      if let Some(target) = target {
        let line = target.resolve(&*ctx.host, view);
        ctx.host.scroll_to_line(view, line);
      }
      ctx.host.focus_view(view);
    },
    None => {
      let view = ctx.host.open_file(&file);
      match target {
        Some(target) => ScrollWait::new(view, target, ctx.config.retry_policy()).start(ctx.host),
        None => debug!("no offset or line number to scroll to"),
      }
    },
  }
  Ok(())
}

#[derive(Debug, Deserialize)]
struct StringResponsePayload {
  text: String,
}

fn handle_string_response(
  ctx: &mut HandlerContext<'_>,
  call_id: &CallId,
  body: &Value,
) -> HandlerResult {
  let payload: StringResponsePayload = decode(body)?;
  let url = if is_web_url(&payload.text) {
    payload.text
  } else {
    match ctx.host.http_port() {
      Some(port) => ctx.config.doc_url(port, &payload.text),
      None => {
        warn!(text = %payload.text, "documentation port unknown, keeping raw text");
        payload.text
      },
    }
  };

  let browse = ctx
    .calls
    .get(call_id)
    .is_some_and(|options| options.browse);
  if !browse {
    ctx.string_responses.insert(call_id.clone(), url);
    return Ok(());
  }

  ctx.calls.take(call_id);
  let manual_doc = ctx.config.feedback.manual_doc(&url);
  defer(
    ctx.host,
    Box::new(move |host: &mut dyn Host| {
      match host.open_url(&url) {
        Ok(()) => info!(url = %url, "opened documentation"),
        Err(err) => {
          error!(url = %url, error = %err, "failed to open documentation");
          host.error_message(&manual_doc);
        },
      }
    }),
  );
  Ok(())
}

fn is_web_url(text: &str) -> bool {
  Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[derive(Debug, Deserialize)]
struct CompletionInfoListPayload {
  prefix:      Option<String>,
  #[serde(default)]
  completions: Vec<Completion>,
}

fn handle_completion_info_list(
  ctx: &mut HandlerContext<'_>,
  _: &CallId,
  body: &Value,
) -> HandlerResult {
  let payload: CompletionInfoListPayload = decode(body)?;
  let suggestions = suggestions_from(&payload.completions);
  let prefix = payload.prefix;

  let current = ctx.host.current_prefix();
  if current.is_some() && current == prefix {
    debug!(?prefix, "completions for the tracked prefix, refreshing");
    defer(
      ctx.host,
      Box::new(move |host: &mut dyn Host| {
        if host.is_completion_visible() && host.current_prefix() == prefix {
          host.set_suggestions(suggestions);
          host.refresh_completions();
        }
      }),
    );
    return Ok(());
  }

  debug!(?prefix, count = suggestions.len(), "new completions");
  ctx.host.set_current_prefix(prefix);
  ctx.host.set_suggestions(suggestions);
  Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefactorDiffPayload {
  procedure_id:  ProcedureId,
  refactor_type: DeclaredAs,
  diff:          PathBuf,
}

fn handle_refactor_diff(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let payload: RefactorDiffPayload = decode(body)?;
  let kind = payload.refactor_type.keyword();
  if !SUPPORTED_REFACTORINGS.contains(&kind) {
    debug!(kind, "ignoring unsupported refactoring");
    return Ok(());
  }

  let Some(target) = ctx.refactorings.remove(payload.procedure_id) else {
    ctx.host.error_message(&format!(
      "Couldn't find the file for refactoring {}.",
      payload.procedure_id
    ));
    return Ok(());
  };
  debug!(target = %target.display(), diff = %payload.diff.display(), "applying refactoring");

  let result = patch::read_diff(&payload.diff)
    .and_then(|diff| patch::apply_refactor(&diff, &target, ctx.project_root));
  match result {
    Ok(files) => {
      info!(diff = %payload.diff.display(), "refactoring succeeded");
      defer(
        ctx.host,
        Box::new(move |host: &mut dyn Host| {
          for file in &files {
            host.reload_file(file);
          }
        }),
      );
      ctx.host.status_message("Refactoring succeeded");
    },
    Err(err) => {
      error!(diff = %payload.diff.display(), error = %err, "refactoring failed");
      ctx
        .host
        .error_message(&format!("Refactor failed: {}", payload.diff.display()));
    },
  }
  Ok(())
}

fn handle_type_info(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let info: TypeInfo = decode(body)?;
  let tpe = format_type(&info);
  info!(tpe, "found type");

  let content = format!(
    "<body id=show-scope>\n<style>\np {{ margin-top: 0; margin-bottom: 0; }}\na {{ font-family: \
     sans-serif; font-size: .7rem; }}\n</style>\n<p>{}</p>\n<a href=\"{}\">Copy</a>\n</body>",
    html::escape(&tpe, false),
    html::escape(&tpe, true)
  );
  let popup = Popup::html(
    content,
    ctx.config.popup.max_width,
    Box::new(|host: &mut dyn Host, href: &str| {
      host.set_clipboard(&html::unescape(href));
      host.hide_popup();
      host.status_message("Type name copied to clipboard");
    }),
  );
  defer(
    ctx.host,
    Box::new(move |host: &mut dyn Host| host.show_popup(popup)),
  );
  Ok(())
}

#[derive(Debug, Deserialize)]
struct SourcePositionsPayload {
  #[serde(default)]
  positions: Vec<PositionHintPayload>,
}

#[derive(Debug, Deserialize)]
struct PositionHintPayload {
  position: SourcePosition,
  preview:  Option<String>,
}

fn handle_source_positions(
  ctx: &mut HandlerContext<'_>,
  _: &CallId,
  body: &Value,
) -> HandlerResult {
  let payload: SourcePositionsPayload = decode(body)?;
  debug!(count = payload.positions.len(), "source positions");
  if payload.positions.is_empty() {
    show_notice(ctx.host, "No usages found.");
    return Ok(());
  }

  let (previews, locations): (Vec<_>, Vec<_>) = payload
    .positions
    .into_iter()
    .filter_map(|hint| {
      let location = hint.position.location()?;
      let preview = hint
        .preview
        .unwrap_or_else(|| "no preview available".into());
      Some((preview, location))
    })
    .unzip();
  present_locations(ctx, previews, locations);
  Ok(())
}

#[derive(Debug, Deserialize)]
struct HierarchyInfoPayload {
  #[serde(default)]
  inheritors: Vec<ClassInfoPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassInfoPayload {
  scala_name:      Option<String>,
  fqn:             String,
  decl_as:         DeclaredAs,
  source_position: Option<SourcePosition>,
}

fn handle_hierarchy_info(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let payload: HierarchyInfoPayload = decode(body)?;
  debug!(count = payload.inheritors.len(), "hierarchy info");
  if payload.inheritors.is_empty() {
    show_notice(ctx.host, "No implementations found.");
    return Ok(());
  }

  let (labels, locations): (Vec<_>, Vec<_>) = payload
    .inheritors
    .into_iter()
    .filter_map(|class| {
      let location = class.source_position.as_ref()?.location()?;
      let name = class.scala_name.unwrap_or(class.fqn);
      Some((format!("{} {name}", class.decl_as.keyword()), location))
    })
    .unzip();
  present_locations(ctx, labels, locations);
  Ok(())
}

#[derive(Debug, Deserialize)]
struct DebugOutputPayload {
  body: String,
}

fn handle_debug_output(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let payload: DebugOutputPayload = decode(body)?;
  info!(output = %payload.body, "debug output");
  ctx.host.status_message(payload.body.trim_end());
  Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugBreakPayload {
  thread_name: Option<String>,
  file:        PathBuf,
  line:        u32,
}

fn handle_debug_break(ctx: &mut HandlerContext<'_>, _: &CallId, body: &Value) -> HandlerResult {
  let payload: DebugBreakPayload = decode(body)?;
  let location = Location::new(payload.file, payload.line);
  info!(
    thread = payload.thread_name.as_deref().unwrap_or("unknown"),
    file = %location.file.display(),
    line = location.line,
    "debugger stopped"
  );
  ctx
    .host
    .open_and_scroll(&location.file, location.display_line());
  Ok(())
}

fn show_notice(host: &mut dyn Host, text: &'static str) {
  defer(
    host,
    Box::new(move |host: &mut dyn Host| host.show_popup(Popup::notice(text))),
  );
}

/// Shows a picker of `labels`, each paired with the `path | Line N` row of
/// its location. Picking a row jumps to it.
fn present_locations(ctx: &mut HandlerContext<'_>, labels: Vec<String>, locations: Vec<Location>) {
  let entries = build_location_list(locations, ctx.project_root);
  let items = labels
    .into_iter()
    .zip(&entries)
    .map(|(label, entry)| SelectionItem::with_detail(label, entry.label.clone()))
    .collect::<Vec<_>>();
  let targets = entries
    .into_iter()
    .map(|entry| entry.target)
    .collect::<Vec<_>>();

  defer(
    ctx.host,
    Box::new(move |host: &mut dyn Host| {
      host.show_selection(
        items,
        Box::new(move |host: &mut dyn Host, choice: Option<usize>| {
          if let Some(target) = choice.and_then(|index| targets.get(index)) {
            host.open_and_scroll(&target.file, target.display_line());
          }
        }),
      );
    }),
  );
}
