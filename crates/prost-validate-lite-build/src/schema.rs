//! Compile-time description of the messages to validate.
//!
//! The descriptor ingress builds these from `buf.validate` annotations, and
//! build scripts without a descriptor set can assemble them by hand. Rules
//! keep the order in which they were declared; the emitter preserves it.

use std::fmt;

/// A message to generate a validator for.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    /// Protobuf package, e.g. `example.v1`. Empty for the root package.
    pub package: String,
    /// Name inside the package, dotted for nested types, e.g. `Outer.Inner`.
    pub name: String,
    /// Fields outside any oneof, in declaration order.
    pub fields: Vec<FieldSchema>,
    /// Real (non-synthetic) oneofs, in declaration order.
    pub oneofs: Vec<OneofSchema>,
}

impl MessageSchema {
    #[must_use]
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    /// Fully-qualified protobuf name, e.g. `example.v1.Outer.Inner`.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn oneof(mut self, oneof: OneofSchema) -> Self {
        self.oneofs.push(oneof);
        self
    }
}

/// One field of a message, or one arm of a oneof.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Protobuf field name; used verbatim in violation paths.
    pub name: String,
    /// Element kind. For maps this is the value kind.
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub rules: FieldRules,
}

impl FieldSchema {
    /// A singular field. Message and `Any` fields get explicit presence, as
    /// prost wraps them in `Option`; everything else starts implicit.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let presence = match kind {
            FieldKind::Message(_) | FieldKind::Any => Presence::Explicit,
            _ => Presence::Implicit,
        };
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::Single(presence),
            rules: FieldRules::default(),
        }
    }

    /// Marks a singular field as explicitly present (`optional`, `Option<T>`).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.cardinality = Cardinality::Single(Presence::Explicit);
        self
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Turns the field into a map from `key` to the field's kind.
    #[must_use]
    pub fn map(mut self, key: FieldKind) -> Self {
        self.cardinality = Cardinality::Map { key };
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.rules.push(rule.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.rules.required = true;
        self
    }

    #[must_use]
    pub fn ignore(mut self, ignore: Ignore) -> Self {
        self.rules.ignore = ignore;
        self
    }

    /// Rules for each element of a repeated field.
    #[must_use]
    pub fn items(mut self, rules: FieldRules) -> Self {
        self.rules.items = Some(Box::new(rules));
        self
    }

    /// Rules for each key of a map field.
    #[must_use]
    pub fn keys(mut self, rules: FieldRules) -> Self {
        self.rules.keys = Some(Box::new(rules));
        self
    }

    /// Rules for each value of a map field.
    #[must_use]
    pub fn values(mut self, rules: FieldRules) -> Self {
        self.rules.values = Some(Box::new(rules));
        self
    }
}

/// A oneof group.
#[derive(Debug, Clone, PartialEq)]
pub struct OneofSchema {
    pub name: String,
    /// Report `oneof.required` when no arm is set.
    pub required: bool,
    /// Arms in declaration order; each is a singular field.
    pub arms: Vec<FieldSchema>,
}

impl OneofSchema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            arms: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn arm(mut self, field: FieldSchema) -> Self {
        self.arms.push(field);
        self
    }
}

/// Whether absence of a singular field is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Plain proto3 scalar; "unset" and "default" are the same thing.
    Implicit,
    /// `optional`, proto2 or message field; prost uses `Option<T>`.
    Explicit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cardinality {
    Single(Presence),
    Repeated,
    Map { key: FieldKind },
}

/// Scalar protobuf kinds that map onto a Rust primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Float,
    Double,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
}

impl ScalarKind {
    /// The `buf.validate` rule family, which is also the constraint id prefix.
    #[must_use]
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
        }
    }

    /// The primitive prost uses for this kind.
    #[must_use]
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Int32 | Self::Sint32 | Self::Sfixed32 => "i32",
            Self::Int64 | Self::Sint64 | Self::Sfixed64 => "i64",
            Self::Uint32 | Self::Fixed32 => "u32",
            Self::Uint64 | Self::Fixed64 => "u64",
            Self::Bool => "bool",
        }
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    String,
    Bytes,
    Enum(EnumType),
    /// A message, by fully-qualified name.
    Message(String),
    /// `google.protobuf.Any`.
    Any,
}

impl FieldKind {
    /// The `buf.validate` rule family that applies to a value of this kind.
    #[must_use]
    pub fn rule_name(&self) -> Option<&'static str> {
        match self {
            Self::Scalar(scalar) => Some(scalar.rule_name()),
            Self::String => Some("string"),
            Self::Bytes => Some("bytes"),
            Self::Enum(_) => Some("enum"),
            Self::Any => Some("any"),
            Self::Message(_) => None,
        }
    }
}

/// An enum type together with its defined numbers, for `enum.defined_only`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub full_name: String,
    pub values: Vec<i32>,
}

impl EnumType {
    #[must_use]
    pub fn new(full_name: impl Into<String>, values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            full_name: full_name.into(),
            values: values.into_iter().collect(),
        }
    }
}

/// How a field opts out of validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ignore {
    #[default]
    Unspecified,
    /// Skip every rule when the value is the zero value for its kind.
    IfZeroValue,
    /// Never validate the field.
    Always,
}

/// All rules attached to one field (or one element, key or value).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRules {
    pub required: bool,
    pub ignore: Ignore,
    /// Rules on the value itself, or on the container for repeated and map
    /// fields, in declaration order.
    pub rules: Vec<Rule>,
    pub items: Option<Box<FieldRules>>,
    pub keys: Option<Box<FieldRules>>,
    pub values: Option<Box<FieldRules>>,
}

impl FieldRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn ignore(mut self, ignore: Ignore) -> Self {
        self.ignore = ignore;
        self
    }

    /// Nothing to check and nothing to skip.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.required
            && self.ignore == Ignore::Unspecified
            && self.rules.is_empty()
            && self.items.is_none()
            && self.keys.is_none()
            && self.values.is_none()
    }
}

/// One constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Number(NumberRule),
    Bool(BoolRule),
    String(StringRule),
    Bytes(BytesRule),
    Enum(EnumRule),
    Repeated(RepeatedRule),
    Map(MapRule),
    Any(AnyRule),
    /// A rule this generator cannot enforce. Emitted as a comment.
    Unsupported { rule: String, reason: String },
}

impl Rule {
    pub(crate) fn unsupported(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// The rule family name used in mismatch diagnostics.
    #[must_use]
    pub fn family(&self) -> &'static str {
        match self {
            Self::Number(_) => "numeric",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Repeated(_) => "repeated",
            Self::Map(_) => "map",
            Self::Any(_) => "any",
            Self::Unsupported { .. } => "unsupported",
        }
    }
}

macro_rules! into_rule {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Rule {
                fn from(rule: $ty) -> Self {
                    Self::$variant(rule)
                }
            }
        )*
    };
}

into_rule!(
    Number(NumberRule),
    Bool(BoolRule),
    String(StringRule),
    Bytes(BytesRule),
    Enum(EnumRule),
    Repeated(RepeatedRule),
    Map(MapRule),
    Any(AnyRule),
);

/// A numeric literal as read from the schema, before narrowing to the
/// field's Rust type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumValue {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl fmt::Display for NumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! num_value_from {
    ($variant:ident: $($t:ty),*) => {
        $(
            impl From<$t> for NumValue {
                fn from(v: $t) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

num_value_from!(Int: i32, i64);
num_value_from!(Uint: u32, u64);
num_value_from!(Float: f32, f64);

#[derive(Debug, Clone, PartialEq)]
pub enum NumberRule {
    Const(NumValue),
    Lt(NumValue),
    Lte(NumValue),
    Gt(NumValue),
    Gte(NumValue),
    In(Vec<NumValue>),
    NotIn(Vec<NumValue>),
    /// Floats only.
    Finite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoolRule {
    Const(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringRule {
    Const(String),
    Len(u64),
    MinLen(u64),
    MaxLen(u64),
    LenBytes(u64),
    MinBytes(u64),
    MaxBytes(u64),
    Pattern(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    NotContains(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    Email,
    Hostname,
    Ip,
    Ipv4,
    Ipv6,
    Address,
    Uuid,
    Tuuid,
    HostAndPort,
    Ascii,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BytesRule {
    Const(Vec<u8>),
    Len(u64),
    MinLen(u64),
    MaxLen(u64),
    Prefix(Vec<u8>),
    Suffix(Vec<u8>),
    Contains(Vec<u8>),
    In(Vec<Vec<u8>>),
    NotIn(Vec<Vec<u8>>),
    Ip,
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumRule {
    Const(i32),
    DefinedOnly,
    In(Vec<i32>),
    NotIn(Vec<i32>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepeatedRule {
    MinItems(u64),
    MaxItems(u64),
    Unique,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapRule {
    MinPairs(u64),
    MaxPairs(u64),
    NoSparse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnyRule {
    In(Vec<String>),
    NotIn(Vec<String>),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn message_fields_default_to_explicit_presence() {
        let child = FieldSchema::new("child", FieldKind::Message("a.B".into()));
        assert_eq!(child.cardinality, Cardinality::Single(Presence::Explicit));

        let age = FieldSchema::new("age", FieldKind::Scalar(ScalarKind::Int32));
        assert_eq!(age.cardinality, Cardinality::Single(Presence::Implicit));
        assert_eq!(
            age.optional().cardinality,
            Cardinality::Single(Presence::Explicit)
        );
    }

    #[test]
    fn builders_keep_rule_order() {
        let field = FieldSchema::new("age", FieldKind::Scalar(ScalarKind::Int32))
            .rule(NumberRule::Gte(0.into()))
            .rule(NumberRule::Lte(18.into()));
        assert_eq!(
            field.rules.rules,
            vec![
                Rule::Number(NumberRule::Gte(NumValue::Int(0))),
                Rule::Number(NumberRule::Lte(NumValue::Int(18))),
            ]
        );
    }

    #[test]
    fn full_name_joins_package_and_nesting() {
        assert_eq!(
            MessageSchema::new("example.v1", "Outer.Inner").full_name(),
            "example.v1.Outer.Inner"
        );
        assert_eq!(MessageSchema::new("", "Root").full_name(), "Root");
    }

    #[test]
    fn empty_rules_are_detected() {
        assert!(FieldRules::new().is_empty());
        assert!(!FieldRules::new().required().is_empty());
        assert!(!FieldRules::new().ignore(Ignore::Always).is_empty());
    }
}
