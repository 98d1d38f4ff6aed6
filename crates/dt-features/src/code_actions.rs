//! `textDocument/codeAction` and `codeAction/resolve` (spec.md §4.7 "Code
//! actions"). Every action's edit is computed eagerly when the action is
//! built, so `resolve` is the identity function — it exists only because
//! the advertised capability turns it on, not because any action defers
//! work to it.

use dt_css::{ParseResult, VarCall};
use dt_token::{ByteRange, LineIndex, TokenGraph, TokenType};
use lsp_types::{CodeAction, CodeActionKind, CodeActionOrCommand, Diagnostic, TextEdit, Url, WorkspaceEdit};
use std::collections::HashMap;

/// Every code action available for `var()` calls intersecting `range`.
pub fn code_actions(uri: &str, text: &str, line_index: &LineIndex, parse: &ParseResult, graph: &TokenGraph, range: ByteRange, diagnostics: &[Diagnostic]) -> Vec<CodeActionOrCommand> {
    let Ok(url) = Url::parse(uri) else { return Vec::new() };

    let calls_in_range: Vec<&VarCall> = parse
        .var_calls
        .iter()
        .filter(|c| c.call_range.start < range.end && range.start < c.call_range.end)
        .collect();

    let mut actions = Vec::new();
    for call in &calls_in_range {
        actions.extend(actions_for_call(&url, text, line_index, call, graph, diagnostics));
    }

    if calls_in_range.len() > 1 {
        if let Some(action) = toggle_fallbacks_in_range(&url, text, line_index, &calls_in_range, graph) {
            actions.push(action);
        }
    }

    actions
}

/// `codeAction/resolve`: a no-op, since every action built above already
/// carries its full `edit`.
pub fn resolve(action: CodeAction) -> CodeAction {
    action
}

fn actions_for_call(url: &Url, text: &str, line_index: &LineIndex, call: &VarCall, graph: &TokenGraph, diagnostics: &[Diagnostic]) -> Vec<CodeActionOrCommand> {
    let Some(token) = graph.get(&call.token_name) else { return Vec::new() };
    let mut actions = Vec::new();

    if token.deprecated.deprecated {
        if let Some(replacement_path) = &token.deprecated.replacement {
            if let Some(replacement) = graph.get_by_path(replacement_path) {
                actions.push(simple_action(
                    url,
                    &format!("Replace with `{}`", replacement.css_name),
                    CodeActionKind::QUICKFIX,
                    text,
                    line_index,
                    call.name_range,
                    &replacement.css_name,
                    None,
                ));
            }
        }

        let resolved = graph.resolve_reference(&token.raw_value);
        actions.push(simple_action(
            url,
            "Replace with literal value",
            CodeActionKind::QUICKFIX,
            text,
            line_index,
            call.call_range,
            &resolved,
            None,
        ));
    }

    if let Some(fallback_range) = call.fallback_range {
        let resolved = graph.resolve_reference(&token.raw_value);
        let fallback_text = call.fallback_text.as_deref().unwrap_or_default();
        if !dt_diagnostics::equivalence::values_equivalent(fallback_text, &resolved, token.token_type) {
            let diagnostic = diagnostics.iter().find(|d| matches!(&d.code, Some(lsp_types::NumberOrString::String(code)) if code == dt_diagnostics::codes::INCORRECT_FALLBACK)).cloned();
            let mut action = simple_action(url, "Fix fallback", CodeActionKind::QUICKFIX, text, line_index, fallback_range, &resolved, diagnostic.clone());
            if let CodeActionOrCommand::CodeAction(a) = &mut action {
                a.is_preferred = Some(true);
            }
            actions.push(action);
        }
    } else if matches!(token.token_type, TokenType::Color | TokenType::Dimension) {
        let resolved = graph.resolve_reference(&token.raw_value);
        let insertion = lsp_types::Range::new(
            crate::to_lsp_range(line_index.range(text, call.name_range)).end,
            crate::to_lsp_range(line_index.range(text, call.name_range)).end,
        );
        actions.push(CodeActionOrCommand::CodeAction(CodeAction {
            title: "Add fallback".to_string(),
            kind: Some(CodeActionKind::QUICKFIX),
            edit: Some(WorkspaceEdit {
                changes: Some(HashMap::from([(url.clone(), vec![TextEdit { range: insertion, new_text: format!(", {resolved}") }])])),
                ..Default::default()
            }),
            ..Default::default()
        }));
    }

    actions
}

fn toggle_fallbacks_in_range(url: &Url, text: &str, line_index: &LineIndex, calls: &[&VarCall], graph: &TokenGraph) -> Option<CodeActionOrCommand> {
    let any_missing = calls.iter().any(|c| c.fallback_range.is_none());
    let mut edits = Vec::new();

    for call in calls {
        let Some(token) = graph.get(&call.token_name) else { continue };
        let resolved = graph.resolve_reference(&token.raw_value);
        match (any_missing, call.fallback_range) {
            (true, None) => {
                let end = crate::to_lsp_range(line_index.range(text, call.name_range)).end;
                edits.push(TextEdit { range: lsp_types::Range::new(end, end), new_text: format!(", {resolved}") });
            }
            (false, Some(fallback_range)) => {
                let comma_and_fallback = lsp_types::Range::new(
                    crate::to_lsp_range(line_index.range(text, call.name_range)).end,
                    crate::to_lsp_range(line_index.range(text, fallback_range)).end,
                );
                edits.push(TextEdit { range: comma_and_fallback, new_text: String::new() });
            }
            _ => {}
        }
    }

    if edits.is_empty() {
        return None;
    }

    let title = if any_missing { "Toggle fallbacks in range (add)" } else { "Toggle fallbacks in range (strip)" };
    Some(CodeActionOrCommand::CodeAction(CodeAction {
        title: title.to_string(),
        kind: Some(CodeActionKind::REFACTOR_REWRITE),
        edit: Some(WorkspaceEdit { changes: Some(HashMap::from([(url.clone(), edits)])), ..Default::default() }),
        ..Default::default()
    }))
}

#[allow(clippy::too_many_arguments)]
fn simple_action(url: &Url, title: &str, kind: CodeActionKind, text: &str, line_index: &LineIndex, target: ByteRange, new_text: &str, diagnostic: Option<Diagnostic>) -> CodeActionOrCommand {
    let range = crate::to_lsp_range(line_index.range(text, target));
    CodeActionOrCommand::CodeAction(CodeAction {
        title: title.to_string(),
        kind: Some(kind),
        diagnostics: diagnostic.map(|d| vec![d]),
        edit: Some(WorkspaceEdit { changes: Some(HashMap::from([(url.clone(), vec![TextEdit { range, new_text: new_text.to_string() }])])), ..Default::default() }),
        ..Default::default()
    })
}
