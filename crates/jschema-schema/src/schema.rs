//! Reading a [`Value`] as a JSON Schema.
//!
//! Every accessor is total: a missing or malformed keyword reads as "no
//! constraint", so the schema `{}` accepts anything. Keywords the
//! interpreter does not know stay reachable through [`SchemaNode::keywords`].

use std::fmt;

use jschema_tree::{Number, PathSegment, Value, ValueKind};

/// Upper bound on `$ref` hops, so a reference cycle cannot loop forever.
const MAX_REF_HOPS: usize = 32;

/// A node of a schema document, together with the root it was found in
/// (needed to resolve `$ref`).
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    node: &'a Value,
    root: &'a Value,
}

/// A type name from the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl TypeName {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" => TypeName::String,
            "number" => TypeName::Number,
            "integer" => TypeName::Integer,
            "boolean" => TypeName::Boolean,
            "object" => TypeName::Object,
            "array" => TypeName::Array,
            "null" => TypeName::Null,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Integer => "integer",
            TypeName::Boolean => "boolean",
            TypeName::Object => "object",
            TypeName::Array => "array",
            TypeName::Null => "null",
        }
    }

    /// Whether a value is an instance of this type.
    ///
    /// `integer` accepts any number without a fractional part.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value.kind()) {
            (TypeName::String, ValueKind::String)
            | (TypeName::Number, ValueKind::Number)
            | (TypeName::Boolean, ValueKind::Boolean)
            | (TypeName::Object, ValueKind::Object)
            | (TypeName::Array, ValueKind::Array)
            | (TypeName::Null, ValueKind::Null) => true,
            (TypeName::Integer, ValueKind::Number) => {
                value.as_number().is_some_and(Number::is_integer)
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `additionalProperties` keyword.
#[derive(Debug, Clone, Copy)]
pub enum AdditionalProperties<'a> {
    /// Absent or `true`.
    Allowed,
    /// `false`.
    Forbidden,
    /// A schema every undeclared property must match.
    Schema(SchemaNode<'a>),
}

/// A UI hint attached to a schema node through `renderer`.
///
/// Both `"renderer": "X"` and `"renderer": {"key": "X", ...}` produce a
/// renderer with key `X`; in the object form the other fields are
/// available through [`Renderer::metadata`].
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer<'a> {
    /// The renderer key.
    pub key: &'a str,
    /// The schema node carrying the renderer (the very node, not a copy).
    pub schema_value: &'a Value,
    /// The `renderer` keyword's own value.
    pub declaration: &'a Value,
}

impl<'a> Renderer<'a> {
    /// Fields of the object form other than `key`, in declaration order.
    pub fn metadata(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + use<'a> {
        let declaration: &'a Value = self.declaration;
        declaration
            .as_object()
            .into_iter()
            .flat_map(|obj| obj.iter())
            .filter(|(key, _)| *key != "key")
    }
}

/// A `$ref` that does not lead anywhere in the root schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefError {
    pub reference: String,
}

impl fmt::Display for RefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved schema reference '{}'", self.reference)
    }
}

impl std::error::Error for RefError {}

impl<'a> SchemaNode<'a> {
    /// The root node of a schema document.
    pub fn new(root: &'a Value) -> Self {
        SchemaNode { node: root, root }
    }

    /// The underlying value.
    pub fn value(&self) -> &'a Value {
        self.node
    }

    /// The schema document this node belongs to.
    pub fn root(&self) -> &'a Value {
        self.root
    }

    fn child(&self, node: &'a Value) -> SchemaNode<'a> {
        SchemaNode {
            node,
            root: self.root,
        }
    }

    fn keyword(&self, name: &str) -> Option<&'a Value> {
        self.node.as_object()?.get(name)
    }

    /// Every keyword of this node, interpreted or not.
    pub fn keywords(self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.node.as_object().into_iter().flat_map(|obj| obj.iter())
    }

    /// The `$ref` target, if this node is a reference.
    pub fn reference(&self) -> Option<&'a str> {
        self.keyword("$ref")?.as_str()
    }

    /// Follow `$ref` until reaching a node that is not a reference.
    ///
    /// References are JSON pointers into the root document, such as
    /// `#/definitions/address` or `#/$defs/address`; `#` is the root itself.
    pub fn resolve(self) -> Result<SchemaNode<'a>, RefError> {
        let mut current = self;
        for _ in 0..MAX_REF_HOPS {
            let Some(reference) = current.reference() else {
                return Ok(current);
            };
            let target = resolve_pointer(self.root, reference).ok_or_else(|| RefError {
                reference: reference.to_string(),
            })?;
            tracing::trace!(reference, "followed schema reference");
            current = self.child(target);
        }
        Err(RefError {
            reference: current.reference().unwrap_or_default().to_string(),
        })
    }

    /// The schema governing the node at `path` below this one, references
    /// resolved along the way.
    ///
    /// Keys go through `properties`, then `additionalProperties`; indices
    /// go through `items`.
    pub fn at(self, path: &[PathSegment]) -> Option<SchemaNode<'a>> {
        let mut current = self.resolve().ok()?;
        for segment in path {
            let next = match segment {
                PathSegment::Key(key) => current.property(key).or_else(|| {
                    match current.additional_properties() {
                        AdditionalProperties::Schema(schema) => Some(schema),
                        _ => None,
                    }
                }),
                PathSegment::Index(index) => current
                    .items()
                    .or_else(|| current.property(&index.to_string())),
            }?;
            current = next.resolve().ok()?;
        }
        Some(current)
    }

    /// Declared types, in declaration order. Unknown names are skipped;
    /// `None` means the node does not restrict the type.
    pub fn types(&self) -> Option<Vec<TypeName>> {
        let declared = self.keyword("type")?;
        let types: Vec<TypeName> = match declared.as_str() {
            Some(name) => TypeName::from_name(name).into_iter().collect(),
            None => declared
                .as_array()?
                .iter()
                .filter_map(|v| v.as_str().and_then(TypeName::from_name))
                .collect(),
        };
        if types.is_empty() { None } else { Some(types) }
    }

    /// Whether `properties` is declared (even if empty).
    pub fn has_properties(&self) -> bool {
        self.keyword("properties").is_some_and(|p| p.as_object().is_some())
    }

    /// Declared properties, in declaration order.
    pub fn properties(self) -> impl Iterator<Item = (&'a str, SchemaNode<'a>)> + 'a {
        let this = self;
        self.keyword("properties")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|obj| obj.iter())
            .map(move |(name, schema)| (name, this.child(schema)))
    }

    /// The schema of one declared property.
    pub fn property(&self, name: &str) -> Option<SchemaNode<'a>> {
        let schema = self.keyword("properties")?.as_object()?.get(name)?;
        Some(self.child(schema))
    }

    /// The schema every array element must match.
    pub fn items(&self) -> Option<SchemaNode<'a>> {
        let items = self.keyword("items")?;
        items.as_object().map(|_| self.child(items))
    }

    /// Names listed in `required`.
    pub fn required(&self) -> Vec<&'a str> {
        self.keyword("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// The `format` name, such as `date` or `email`.
    pub fn format(&self) -> Option<&'a str> {
        self.keyword("format")?.as_str()
    }

    /// The `renderer` declaration, given as a key or an object with `key`.
    pub fn renderer(&self) -> Option<Renderer<'a>> {
        let declaration = self.keyword("renderer")?;
        let key = match declaration.as_str() {
            Some(key) => key,
            None => declaration.as_object()?.get("key")?.as_str()?,
        };
        Some(Renderer {
            key,
            schema_value: self.node,
            declaration,
        })
    }

    /// Members of `enum`, in order.
    pub fn enum_values(&self) -> Option<Vec<&'a Value>> {
        Some(self.keyword("enum")?.as_array()?.iter().collect())
    }

    /// The `const` value.
    pub fn const_value(&self) -> Option<&'a Value> {
        self.keyword("const")
    }

    /// The `default` value.
    pub fn default_value(&self) -> Option<&'a Value> {
        self.keyword("default")
    }

    /// How undeclared properties are treated; anything but `false` or a
    /// schema object allows them.
    pub fn additional_properties(&self) -> AdditionalProperties<'a> {
        match self.keyword("additionalProperties") {
            None => AdditionalProperties::Allowed,
            Some(value) => match value.as_bool() {
                Some(true) => AdditionalProperties::Allowed,
                Some(false) => AdditionalProperties::Forbidden,
                None if value.as_object().is_some() => {
                    AdditionalProperties::Schema(self.child(value))
                }
                None => AdditionalProperties::Allowed,
            },
        }
    }

    /// `minLength`, in characters.
    pub fn min_length(&self) -> Option<u64> {
        self.count("minLength")
    }

    /// `maxLength`, in characters.
    pub fn max_length(&self) -> Option<u64> {
        self.count("maxLength")
    }

    /// `minItems`.
    pub fn min_items(&self) -> Option<u64> {
        self.count("minItems")
    }

    /// `maxItems`.
    pub fn max_items(&self) -> Option<u64> {
        self.count("maxItems")
    }

    /// Inclusive `minimum`.
    pub fn minimum(&self) -> Option<&'a Number> {
        self.keyword("minimum")?.as_number()
    }

    /// Inclusive `maximum`.
    pub fn maximum(&self) -> Option<&'a Number> {
        self.keyword("maximum")?.as_number()
    }

    /// The `title` annotation.
    pub fn title(&self) -> Option<&'a str> {
        self.keyword("title")?.as_str()
    }

    /// The `description` annotation.
    pub fn description(&self) -> Option<&'a str> {
        self.keyword("description")?.as_str()
    }

    fn count(&self, name: &str) -> Option<u64> {
        let n = self.keyword(name)?.as_number()?.as_i64()?;
        u64::try_from(n).ok()
    }
}

/// Resolve a `#/a/b` pointer against `root`.
fn resolve_pointer<'a>(root: &'a Value, reference: &str) -> Option<&'a Value> {
    let pointer = reference.strip_prefix('#')?;
    if pointer.is_empty() {
        return Some(root);
    }
    let pointer = pointer.strip_prefix('/')?;
    let mut current = root;
    for token in pointer.split('/') {
        let token = token.replace("~1", "/").replace("~0", "~");
        current = match (current.as_object(), current.as_array()) {
            (Some(obj), _) => obj.get(&token)?,
            (None, Some(arr)) => arr.get(token.parse().ok()?)?,
            (None, None) => return None,
        };
    }
    Some(current)
}
