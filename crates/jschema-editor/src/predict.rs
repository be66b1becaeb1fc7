//! Completion at a cursor.
//!
//! Candidates come from two places: the grammar (what may legally follow
//! at the cursor) and the schema (property names and synthesized values).
//! Grammar candidates come first.

use jschema_parse::{Axiom, Parser, ParserState, Span};
use jschema_schema::{SchemaNode, synthesize};
use jschema_tree::{Value, escape_string, parse_tolerant, stringify};
use tracing::debug;

use crate::parser::ParserOptions;

/// A completion request.
#[derive(Debug, Clone, Copy)]
pub struct PredictRequest<'a> {
    /// The document text.
    pub text: &'a str,
    /// Cursor position, a byte offset into `text`.
    pub offset: usize,
}

impl<'a> PredictRequest<'a> {
    /// Complete at byte `offset` of `text`.
    pub fn new(text: &'a str, offset: usize) -> Self {
        PredictRequest { text, offset }
    }
}

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Text to insert.
    pub text: String,
    /// Range to overwrite with `text`; `None` inserts at the cursor.
    pub replace: Option<Span>,
}

/// What completion found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictResult {
    /// False when the request itself was malformed.
    pub success: bool,
    /// Why `success` is false.
    pub error: Option<String>,
    /// Candidates in order, grammar first.
    pub proposals: Vec<Proposal>,
}

impl PredictResult {
    fn failure(error: String) -> Self {
        PredictResult {
            success: false,
            error: Some(error),
            proposals: Vec::new(),
        }
    }
}

pub(crate) fn predict(
    schema: &Value,
    options: &ParserOptions,
    request: &PredictRequest<'_>,
) -> PredictResult {
    let text = request.text;
    let offset = request.offset;
    if offset > text.len() {
        return PredictResult::failure(format!(
            "offset {offset} is past the end of the text ({} bytes)",
            text.len()
        ));
    }
    if !text.is_char_boundary(offset) {
        return PredictResult::failure(format!("offset {offset} is inside a character"));
    }
    let Ok(cursor) = u32::try_from(offset) else {
        return PredictResult::failure(format!("offset {offset} is too large"));
    };

    let ctx = Parser::new(text).context_at(cursor);
    let (replace, prefix) = match ctx.token {
        Some((_, span)) => (Some(span), &text[span.start as usize..offset]),
        None => (None, ""),
    };

    let root = SchemaNode::new(schema);
    let mut candidates = Candidates::default();
    match ctx.state {
        ParserState::ExpectValue | ParserState::InObjectExpectValue => {
            candidates.values(root.at(&ctx.value_path()), options.proposal_depth);
        }
        ParserState::InObjectExpectKeyOrEnd => {
            // After a comma only a key may follow.
            let before = replace.map_or(offset, |span| span.start as usize);
            if !text[..before].trim_end().ends_with(',') {
                candidates.push("}");
            }
            if let Some(object_schema) = root.at(&ctx.path) {
                let document = parse_tolerant(text, Axiom::Value).value;
                let existing = document
                    .as_ref()
                    .and_then(|doc| doc.get_path(&ctx.path))
                    .and_then(Value::as_object);
                for (name, _) in object_schema.properties() {
                    // The key being edited does not count as present.
                    let present = existing
                        .and_then(|obj| obj.entry(name))
                        .is_some_and(|entry| entry.key_span.is_none() || entry.key_span != replace);
                    if !present {
                        candidates.push(format!("\"{}\"", escape_string(name)));
                    }
                }
            }
            candidates.push("\"\"");
        }
        ParserState::InObjectExpectColon => candidates.push(":"),
        ParserState::InObjectExpectCommaOrEnd => {
            candidates.push(",");
            candidates.push("}");
        }
        ParserState::InArrayExpectValueOrEnd => {
            candidates.push("]");
            candidates.values(root.at(&ctx.value_path()), options.proposal_depth);
        }
        ParserState::InArrayExpectCommaOrEnd => {
            candidates.push(",");
            candidates.push("]");
        }
        ParserState::BeforeDocument
        | ParserState::Done
        | ParserState::Error
        | ParserState::AfterDocument => {}
    }

    let proposals: Vec<Proposal> = candidates
        .texts
        .into_iter()
        .filter(|candidate| candidate.starts_with(prefix))
        .map(|text| Proposal { text, replace })
        .collect();
    debug!(
        offset,
        state = ?ctx.state,
        path = ?ctx.path,
        prefix,
        count = proposals.len(),
        "predicted"
    );
    PredictResult {
        success: true,
        error: None,
        proposals,
    }
}

/// Candidate texts, deduplicated, in insertion order.
#[derive(Default)]
struct Candidates {
    texts: Vec<String>,
}

impl Candidates {
    fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.texts.contains(&text) {
            self.texts.push(text);
        }
    }

    fn values(&mut self, node: Option<SchemaNode<'_>>, max_depth: i32) {
        let Some(node) = node else {
            return;
        };
        for value in synthesize(node, max_depth) {
            self.push(stringify(&value));
        }
    }
}
