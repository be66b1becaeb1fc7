//! Building candidate values from a schema.
//!
//! Candidates depend on the schema alone. The node being proposed for is
//! depth 0 and is always built concretely; a descendant at depth `d` is
//! built when `d <= max_depth` and is `null` otherwise, so `max_depth = -1`
//! gives a container whose children are all `null`.

use std::cell::Cell;

use jschema_tree::{JsonPath, Object, Payload, Value};

use crate::result::ValidationResult;
use crate::schema::{SchemaNode, TypeName};

/// Candidate replacement values for the node at `path`.
///
/// Returns nothing when no schema node governs `path`. The value at `path`,
/// if any, plays no part: candidates come from the schema alone.
pub fn propose(result: &ValidationResult<'_>, path: &str, max_depth: i32) -> Vec<Value> {
    let path = JsonPath::parse(path);
    let Some(node) = SchemaNode::new(result.schema).at(path.segments()) else {
        tracing::debug!(%path, "no schema for proposal path");
        return Vec::new();
    };
    let proposals = synthesize(node, max_depth);
    tracing::debug!(%path, max_depth, count = proposals.len(), "proposed values");
    proposals
}

/// Upper bound on the values built for one call. Recursive schemas
/// branch at every level; past this budget descendants become `null`.
const MAX_SYNTHESIZED_NODES: usize = 10_000;

/// Candidate values for a schema node, most specific first.
///
/// `const` wins outright, then `enum` members; otherwise `default` comes
/// first, followed by one candidate per declared type. Never empty: a
/// schema that says nothing proposes `null`.
pub fn synthesize(node: SchemaNode<'_>, max_depth: i32) -> Vec<Value> {
    Synthesizer {
        max_depth: i64::from(max_depth),
        budget: Cell::new(MAX_SYNTHESIZED_NODES),
    }
    .proposals(node, 0)
}

struct Synthesizer {
    max_depth: i64,
    budget: Cell<usize>,
}

impl Synthesizer {
    fn proposals(&self, node: SchemaNode<'_>, depth: i64) -> Vec<Value> {
        let Ok(node) = node.resolve() else {
            return vec![Value::null()];
        };
        if let Some(value) = node.const_value() {
            return vec![value.without_spans()];
        }

        let mut out = Vec::new();
        if let Some(members) = node.enum_values() {
            for member in members {
                push_unique(&mut out, member.without_spans());
            }
            if !out.is_empty() {
                return out;
            }
        }

        if let Some(default) = node.default_value() {
            out.push(default.without_spans());
        }
        for ty in types_of(node) {
            if ty == TypeName::Boolean {
                push_unique(&mut out, Value::bool(false));
                push_unique(&mut out, Value::bool(true));
            } else {
                let value = self.type_default(ty, node, depth);
                push_unique(&mut out, value);
            }
        }
        if out.is_empty() {
            out.push(Value::null());
        }
        out
    }

    /// The first of [`Synthesizer::proposals`], built alone.
    fn first(&self, node: SchemaNode<'_>, depth: i64) -> Value {
        let Ok(node) = node.resolve() else {
            return Value::null();
        };
        if let Some(value) = node.const_value() {
            return value.without_spans();
        }
        if let Some(member) = node.enum_values().and_then(|members| members.first().copied()) {
            return member.without_spans();
        }
        if let Some(default) = node.default_value() {
            return default.without_spans();
        }
        match types_of(node).first() {
            Some(&ty) => self.type_default(ty, node, depth),
            None => Value::null(),
        }
    }

    fn type_default(&self, ty: TypeName, node: SchemaNode<'_>, depth: i64) -> Value {
        match ty {
            TypeName::String => Value::string(""),
            TypeName::Number | TypeName::Integer => Value::number(0i64),
            TypeName::Boolean => Value::bool(false),
            TypeName::Null => Value::null(),
            TypeName::Object => self.object(node, depth),
            TypeName::Array => self.array(node, depth),
        }
    }

    /// A child's first candidate, or `null` past the depth limit or once
    /// the node budget is spent.
    fn child(&self, node: SchemaNode<'_>, depth: i64) -> Value {
        if depth > self.max_depth {
            return Value::null();
        }
        let Some(left) = self.budget.get().checked_sub(1) else {
            return Value::null();
        };
        self.budget.set(left);
        self.first(node, depth)
    }

    fn object(&self, node: SchemaNode<'_>, depth: i64) -> Value {
        let mut object = Object::default();
        for (name, child) in node.properties() {
            object.insert(name, self.child(child, depth + 1));
        }
        Value {
            payload: Payload::Object(object),
            span: None,
        }
    }

    fn array(&self, node: SchemaNode<'_>, depth: i64) -> Value {
        match node.items() {
            Some(items) if depth < self.max_depth => {
                Value::array(vec![self.child(items, depth + 1)])
            }
            _ => Value::array(Vec::new()),
        }
    }
}

/// Declared types, or the type implied by `properties` or `items`.
fn types_of(node: SchemaNode<'_>) -> Vec<TypeName> {
    node.types().unwrap_or_else(|| {
        if node.has_properties() {
            vec![TypeName::Object]
        } else if node.items().is_some() {
            vec![TypeName::Array]
        } else {
            Vec::new()
        }
    })
}

fn push_unique(out: &mut Vec<Value>, value: Value) {
    if !out.contains(&value) {
        out.push(value);
    }
}
