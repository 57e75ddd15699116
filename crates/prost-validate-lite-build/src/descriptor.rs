//! Reads constraint annotations out of a descriptor pool.
//!
//! `buf.validate` extensions are preferred; the legacy `validate` (PGV)
//! extensions are read when a pool only carries those. Both describe rules
//! with the same field names, so one reader serves both.

use prost_reflect::{
    DescriptorPool, DynamicMessage, ExtensionDescriptor, FieldDescriptor, MessageDescriptor,
    OneofDescriptor, ReflectMessage, Value,
};

use crate::config::GeneratorConfig;
use crate::error::CompilationError;
use crate::lookups::{expected_standard_rule, field_kind};
use crate::schema::{
    AnyRule, BoolRule, BytesRule, Cardinality, EnumRule, FieldRules, FieldSchema, Ignore, MapRule,
    MessageSchema, NumValue, NumberRule, OneofSchema, Presence, RepeatedRule, Rule, StringRule,
};

const FIELD_EXTENSIONS: &[&str] = &["buf.validate.field", "validate.rules"];
const ONEOF_EXTENSIONS: &[&str] = &["buf.validate.oneof", "validate.required"];
const MESSAGE_EXTENSIONS: &[&str] = &[
    "buf.validate.message",
    "validate.disabled",
    "validate.ignored",
];

/// Builds a schema for every message in `pool` outside the skipped packages.
pub(crate) fn message_schemas(
    pool: &DescriptorPool,
    config: &GeneratorConfig,
) -> Result<Vec<MessageSchema>, CompilationError> {
    let extensions = Extensions::new(pool);
    if extensions.field.is_empty() {
        tracing::debug!("descriptor pool has no field rule extensions");
    }
    pool.all_messages()
        .filter(|desc| !desc.is_map_entry() && !config.skips(desc.package_name()))
        .map(|desc| extensions.message(&desc))
        .collect()
}

struct Extensions {
    field: Vec<ExtensionDescriptor>,
    oneof: Vec<ExtensionDescriptor>,
    message: Vec<ExtensionDescriptor>,
}

impl Extensions {
    fn new(pool: &DescriptorPool) -> Self {
        let find = |names: &[&str]| -> Vec<ExtensionDescriptor> {
            names
                .iter()
                .filter_map(|name| pool.get_extension_by_name(name))
                .collect()
        };
        Self {
            field: find(FIELD_EXTENSIONS),
            oneof: find(ONEOF_EXTENSIONS),
            message: find(MESSAGE_EXTENSIONS),
        }
    }

    fn message(&self, desc: &MessageDescriptor) -> Result<MessageSchema, CompilationError> {
        let package = desc.package_name();
        let full_name = desc.full_name();
        let name = full_name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(full_name);
        let mut schema = MessageSchema::new(package, name);
        if self.message_disabled(desc) {
            tracing::debug!(name = full_name, "validation disabled for message");
            return Ok(schema);
        }

        for field in desc.fields() {
            if field.containing_oneof().is_some_and(|oneof| !oneof.is_synthetic()) {
                continue;
            }
            schema.fields.push(self.field(&field)?);
        }
        for oneof in desc.oneofs().filter(|oneof| !oneof.is_synthetic()) {
            let mut out = OneofSchema::new(oneof.name());
            out.required = self.oneof_required(&oneof);
            for field in oneof.fields() {
                out.arms.push(self.field(&field)?);
            }
            schema.oneofs.push(out);
        }
        Ok(schema)
    }

    fn message_disabled(&self, desc: &MessageDescriptor) -> bool {
        match extension_value(&desc.options(), &self.message) {
            Some(Value::Bool(disabled)) => disabled,
            Some(Value::Message(rules)) => {
                if has_items(&rules, "cel") || has_items(&rules, "oneof") {
                    tracing::warn!(
                        name = desc.full_name(),
                        "message-level rules are not supported, no check emitted"
                    );
                }
                flag(&rules, "disabled")
            }
            _ => false,
        }
    }

    fn oneof_required(&self, oneof: &OneofDescriptor) -> bool {
        match extension_value(&oneof.options(), &self.oneof) {
            Some(Value::Bool(required)) => required,
            Some(Value::Message(rules)) => flag(&rules, "required"),
            _ => false,
        }
    }

    fn field(&self, field: &FieldDescriptor) -> Result<FieldSchema, CompilationError> {
        let (kind, cardinality) = if field.is_map() {
            let entry = map_entry(field)?;
            let key = field_kind(&entry.map_entry_key_field().kind());
            let value = field_kind(&entry.map_entry_value_field().kind());
            (value, Cardinality::Map { key })
        } else if field.is_list() {
            (field_kind(&field.kind()), Cardinality::Repeated)
        } else {
            let presence = if field.supports_presence() {
                Presence::Explicit
            } else {
                Presence::Implicit
            };
            (field_kind(&field.kind()), Cardinality::Single(presence))
        };
        let rules = match extension_value(&field.options(), &self.field) {
            Some(Value::Message(rules)) => read_rules(&rules, field, false)?,
            _ => FieldRules::default(),
        };
        Ok(FieldSchema {
            name: field.name().to_string(),
            kind,
            cardinality,
            rules,
        })
    }
}

fn extension_value(options: &DynamicMessage, extensions: &[ExtensionDescriptor]) -> Option<Value> {
    extensions
        .iter()
        .find(|ext| options.has_extension(ext))
        .map(|ext| options.get_extension(ext).into_owned())
}

fn map_entry(field: &FieldDescriptor) -> Result<MessageDescriptor, CompilationError> {
    field.kind().as_message().cloned().ok_or_else(|| {
        CompilationError::new(format!("map field `{}` has no entry type", field.full_name()))
    })
}

fn flag(message: &DynamicMessage, name: &str) -> bool {
    message
        .get_field_by_name(name)
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn has_items(message: &DynamicMessage, name: &str) -> bool {
    message
        .get_field_by_name(name)
        .is_some_and(|value| value.as_list().is_some_and(|list| !list.is_empty()))
}

fn message_field(message: &DynamicMessage, name: &str) -> Option<DynamicMessage> {
    let field = message.descriptor().get_field_by_name(name)?;
    if !message.has_field(&field) {
        return None;
    }
    message.get_field(&field).as_message().cloned()
}

/// Fields of `message` that are set, in declaration order.
fn set_fields(message: &DynamicMessage) -> Vec<(FieldDescriptor, Value)> {
    message
        .descriptor()
        .fields()
        .filter(|field| message.has_field(field))
        .map(|field| {
            let value = message.get_field(&field).into_owned();
            (field, value)
        })
        .collect()
}

/// The set member of the `type` oneof, with its rules.
fn active_rule_message(rules: &DynamicMessage) -> Option<(FieldDescriptor, DynamicMessage)> {
    let type_oneof = rules
        .descriptor()
        .oneofs()
        .find(|oneof| oneof.name() == "type")?;
    for field in type_oneof.fields() {
        if !rules.has_field(&field) {
            continue;
        }
        if let Some(message) = rules.get_field(&field).as_message() {
            return Some((field, message.clone()));
        }
    }
    None
}

fn check_rule_type(
    field: &FieldDescriptor,
    actual: &str,
    nested: bool,
) -> Result<(), CompilationError> {
    let expected = if field.is_map() && !nested {
        Some("map")
    } else if field.is_list() && !nested {
        Some("repeated")
    } else {
        expected_standard_rule(&field.kind())
    };
    match expected {
        Some(expected) if expected == actual => Ok(()),
        Some(expected) => Err(CompilationError::new(format!(
            "expected rule `{expected}`, got `{actual}` on field `{}`",
            field.full_name()
        ))),
        None => Err(CompilationError::new(format!(
            "mismatched message rules, `{actual}` is not a valid rule for field `{}`",
            field.full_name()
        ))),
    }
}

/// Reads one `FieldRules` message. `nested` is set for `items`, `keys` and
/// `values`, whose rules apply to a single element of `field`.
fn read_rules(
    rules: &DynamicMessage,
    field: &FieldDescriptor,
    nested: bool,
) -> Result<FieldRules, CompilationError> {
    let mut out = FieldRules::new();
    out.required = flag(rules, "required");
    out.ignore = match rules
        .get_field_by_name("ignore")
        .and_then(|value| value.as_enum_number())
    {
        // IGNORE_IF_ZERO_VALUE, and the older IGNORE_IF_DEFAULT_VALUE.
        Some(1 | 2) => Ignore::IfZeroValue,
        Some(3) => Ignore::Always,
        _ => Ignore::Unspecified,
    };
    if has_items(rules, "cel") {
        out.rules
            .push(Rule::unsupported("cel", "CEL expressions are not evaluated"));
    }
    if let Some(message) = message_field(rules, "message") {
        if flag(&message, "skip") {
            out.ignore = Ignore::Always;
        }
        if flag(&message, "required") {
            out.required = true;
        }
    }

    let Some((type_field, type_rules)) = active_rule_message(rules) else {
        return Ok(out);
    };
    let family = type_field.name();
    check_rule_type(field, family, nested)?;
    if matches!(family, "duration" | "timestamp" | "field_mask") {
        out.rules.push(Rule::unsupported(
            family,
            "well-known type rules are not supported",
        ));
        return Ok(out);
    }
    let reader = RuleReader {
        family,
        field: field.full_name(),
    };
    for (rule_field, value) in set_fields(&type_rules) {
        let name = rule_field.name();
        match name {
            "example" | "strict" => continue,
            "ignore_empty" => {
                if value.as_bool() == Some(true) {
                    out.ignore = Ignore::IfZeroValue;
                }
                continue;
            }
            "required" if family == "any" => {
                out.required |= value.as_bool() == Some(true);
                continue;
            }
            _ => {}
        }
        let rule = match family {
            "float" | "double" | "int32" | "int64" | "uint32" | "uint64" | "sint32"
            | "sint64" | "fixed32" | "fixed64" | "sfixed32" | "sfixed64" => {
                reader.number(name, &value)?
            }
            "bool" => reader.bool(name, &value)?,
            "string" => reader.string(name, &value)?,
            "bytes" => reader.bytes(name, &value)?,
            "enum" => reader.enumeration(name, &value)?,
            "any" => reader.any(name, &value)?,
            "repeated" => match name {
                "items" => {
                    let items = value.as_message().ok_or_else(|| reader.bad(name))?;
                    out.items = Some(Box::new(read_rules(items, field, true)?));
                    None
                }
                _ => reader.repeated(name, &value)?,
            },
            "map" => match name {
                "keys" | "values" => {
                    let nested_rules = value.as_message().ok_or_else(|| reader.bad(name))?;
                    let entry = map_entry(field)?;
                    let entry_field = if name == "keys" {
                        entry.map_entry_key_field()
                    } else {
                        entry.map_entry_value_field()
                    };
                    let parsed = Some(Box::new(read_rules(nested_rules, &entry_field, true)?));
                    if name == "keys" {
                        out.keys = parsed;
                    } else {
                        out.values = parsed;
                    }
                    None
                }
                _ => reader.map(name, &value)?,
            },
            _ => reader.unsupported(name),
        };
        out.rules.extend(rule);
    }
    Ok(out)
}

/// Converts the set fields of one typed rules message.
struct RuleReader<'a> {
    family: &'a str,
    field: &'a str,
}

impl RuleReader<'_> {
    fn bad(&self, name: &str) -> CompilationError {
        CompilationError::new(format!(
            "rule `{}.{name}` on field `{}` has an unexpected value",
            self.family, self.field
        ))
    }

    fn unsupported(&self, name: &str) -> Option<Rule> {
        Some(Rule::unsupported(
            format!("{}.{name}", self.family),
            "not supported by this generator",
        ))
    }

    fn number(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let one = || num(value).ok_or_else(|| self.bad(name));
        let list = || nums(value).ok_or_else(|| self.bad(name));
        let rule = match name {
            "const" => NumberRule::Const(one()?),
            "lt" => NumberRule::Lt(one()?),
            "lte" => NumberRule::Lte(one()?),
            "gt" => NumberRule::Gt(one()?),
            "gte" => NumberRule::Gte(one()?),
            "in" => NumberRule::In(list()?),
            "not_in" => NumberRule::NotIn(list()?),
            "finite" if enabled(value) => NumberRule::Finite,
            "finite" => return Ok(None),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }

    fn bool(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        match name {
            "const" => {
                let expected = value.as_bool().ok_or_else(|| self.bad(name))?;
                Ok(Some(BoolRule::Const(expected).into()))
            }
            _ => Ok(self.unsupported(name)),
        }
    }

    fn string(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let text = || {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| self.bad(name))
        };
        let size = || value.as_u64().ok_or_else(|| self.bad(name));
        let list = || strings(value).ok_or_else(|| self.bad(name));
        let well_known = |rule: StringRule| Ok(enabled(value).then_some(Rule::String(rule)));
        let rule = match name {
            "const" => StringRule::Const(text()?),
            "len" => StringRule::Len(size()?),
            "min_len" => StringRule::MinLen(size()?),
            "max_len" => StringRule::MaxLen(size()?),
            "len_bytes" => StringRule::LenBytes(size()?),
            "min_bytes" => StringRule::MinBytes(size()?),
            "max_bytes" => StringRule::MaxBytes(size()?),
            "pattern" => StringRule::Pattern(text()?),
            "prefix" => StringRule::Prefix(text()?),
            "suffix" => StringRule::Suffix(text()?),
            "contains" => StringRule::Contains(text()?),
            "not_contains" => StringRule::NotContains(text()?),
            "in" => StringRule::In(list()?),
            "not_in" => StringRule::NotIn(list()?),
            "email" => return well_known(StringRule::Email),
            "hostname" => return well_known(StringRule::Hostname),
            "ip" => return well_known(StringRule::Ip),
            "ipv4" => return well_known(StringRule::Ipv4),
            "ipv6" => return well_known(StringRule::Ipv6),
            "address" => return well_known(StringRule::Address),
            "uuid" => return well_known(StringRule::Uuid),
            "tuuid" => return well_known(StringRule::Tuuid),
            "host_and_port" => return well_known(StringRule::HostAndPort),
            "ascii" => return well_known(StringRule::Ascii),
            _ if value.as_bool() == Some(false) => return Ok(None),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }

    fn bytes(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let data = || {
            value
                .as_bytes()
                .map(|bytes| bytes.to_vec())
                .ok_or_else(|| self.bad(name))
        };
        let size = || value.as_u64().ok_or_else(|| self.bad(name));
        let list = || byte_strings(value).ok_or_else(|| self.bad(name));
        let well_known = |rule: BytesRule| Ok(enabled(value).then_some(Rule::Bytes(rule)));
        let rule = match name {
            "const" => BytesRule::Const(data()?),
            "len" => BytesRule::Len(size()?),
            "min_len" => BytesRule::MinLen(size()?),
            "max_len" => BytesRule::MaxLen(size()?),
            "prefix" => BytesRule::Prefix(data()?),
            "suffix" => BytesRule::Suffix(data()?),
            "contains" => BytesRule::Contains(data()?),
            "in" => BytesRule::In(list()?),
            "not_in" => BytesRule::NotIn(list()?),
            "ip" => return well_known(BytesRule::Ip),
            "ipv4" => return well_known(BytesRule::Ipv4),
            "ipv6" => return well_known(BytesRule::Ipv6),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }

    fn enumeration(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let list = || ints(value).ok_or_else(|| self.bad(name));
        let rule = match name {
            "const" => EnumRule::Const(value.as_i32().ok_or_else(|| self.bad(name))?),
            "defined_only" if enabled(value) => EnumRule::DefinedOnly,
            "defined_only" => return Ok(None),
            "in" => EnumRule::In(list()?),
            "not_in" => EnumRule::NotIn(list()?),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }

    fn repeated(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let size = || value.as_u64().ok_or_else(|| self.bad(name));
        let rule = match name {
            "min_items" => RepeatedRule::MinItems(size()?),
            "max_items" => RepeatedRule::MaxItems(size()?),
            "unique" if enabled(value) => RepeatedRule::Unique,
            "unique" => return Ok(None),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }

    fn map(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let size = || value.as_u64().ok_or_else(|| self.bad(name));
        let rule = match name {
            "min_pairs" => MapRule::MinPairs(size()?),
            "max_pairs" => MapRule::MaxPairs(size()?),
            "no_sparse" if enabled(value) => MapRule::NoSparse,
            "no_sparse" => return Ok(None),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }

    fn any(&self, name: &str, value: &Value) -> Result<Option<Rule>, CompilationError> {
        let list = || strings(value).ok_or_else(|| self.bad(name));
        let rule = match name {
            "in" => AnyRule::In(list()?),
            "not_in" => AnyRule::NotIn(list()?),
            _ => return Ok(self.unsupported(name)),
        };
        Ok(Some(rule.into()))
    }
}

fn enabled(value: &Value) -> bool {
    value.as_bool() == Some(true)
}

fn num(value: &Value) -> Option<NumValue> {
    Some(match value {
        Value::I32(v) => (*v).into(),
        Value::I64(v) => (*v).into(),
        Value::U32(v) => (*v).into(),
        Value::U64(v) => (*v).into(),
        Value::F32(v) => (*v).into(),
        Value::F64(v) => (*v).into(),
        _ => return None,
    })
}

fn nums(value: &Value) -> Option<Vec<NumValue>> {
    value.as_list()?.iter().map(num).collect()
}

fn ints(value: &Value) -> Option<Vec<i32>> {
    value.as_list()?.iter().map(Value::as_i32).collect()
}

fn strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_list()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn byte_strings(value: &Value) -> Option<Vec<Vec<u8>>> {
    value
        .as_list()?
        .iter()
        .map(|v| v.as_bytes().map(|bytes| bytes.to_vec()))
        .collect()
}

#[cfg(test)]
pub(crate) mod fixture {
    //! A hand-assembled descriptor set: a cut-down `buf/validate/validate.proto`
    //! plus an annotated `example.proto`. Field options carry extensions, which
    //! `prost-types` cannot represent, so they are spliced in as raw bytes.

    use prost::Message;
    use prost::encoding::{WireType, encode_key, encode_varint};
    use prost_types::field_descriptor_proto::{Label, Type};
    use prost_types::{
        DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
        FileDescriptorProto, MessageOptions, OneofDescriptorProto, descriptor_proto,
    };

    pub(crate) const EXTENSION: u32 = 1159;

    pub(crate) fn ld(tag: u32, bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        encode_key(tag, WireType::LengthDelimited, &mut out);
        encode_varint(bytes.len() as u64, &mut out);
        out.extend_from_slice(bytes);
        out
    }

    pub(crate) fn varint(tag: u32, value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        encode_key(tag, WireType::Varint, &mut out);
        encode_varint(value, &mut out);
        out
    }

    pub(crate) fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.into()),
            json_name: Some(name.into()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(ty as i32),
            ..Default::default()
        }
    }

    pub(crate) fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
        FieldDescriptorProto {
            type_name: Some(type_name.into()),
            ..field(name, number, ty)
        }
    }

    pub(crate) fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
        field.label = Some(Label::Repeated as i32);
        field
    }

    pub(crate) fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
        field.oneof_index = Some(index);
        field
    }

    fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.into()),
            field: fields,
            ..Default::default()
        }
    }

    fn extendable(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.into()),
            extension_range: vec![descriptor_proto::ExtensionRange {
                start: Some(1000),
                end: Some(536_870_912),
                options: None,
            }],
            ..Default::default()
        }
    }

    fn descriptor_proto_file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("google/protobuf/descriptor.proto".into()),
            package: Some("google.protobuf".into()),
            message_type: vec![
                extendable("FieldOptions"),
                extendable("OneofOptions"),
                extendable("MessageOptions"),
            ],
            syntax: Some("proto2".into()),
            ..Default::default()
        }
    }

    fn validate_file() -> FileDescriptorProto {
        let rules = |name: &str| format!(".buf.validate.{name}");
        let mut field_rules = message(
            "FieldRules",
            vec![
                in_oneof(typed("int32", 3, Type::Message, &rules("Int32Rules")), 0),
                in_oneof(typed("string", 14, Type::Message, &rules("StringRules")), 0),
                in_oneof(typed("enum", 16, Type::Message, &rules("EnumRules")), 0),
                in_oneof(typed("repeated", 18, Type::Message, &rules("RepeatedRules")), 0),
                in_oneof(typed("map", 19, Type::Message, &rules("MapRules")), 0),
                field("required", 25, Type::Bool),
                typed("ignore", 27, Type::Enum, &rules("Ignore")),
            ],
        );
        field_rules.oneof_decl = vec![OneofDescriptorProto {
            name: Some("type".into()),
            options: None,
        }];
        let int_list = |name: &str, n: i32| repeated(field(name, n, Type::Int32));
        FileDescriptorProto {
            name: Some("buf/validate/validate.proto".into()),
            package: Some("buf.validate".into()),
            dependency: vec!["google/protobuf/descriptor.proto".into()],
            message_type: vec![
                field_rules,
                message(
                    "Int32Rules",
                    vec![
                        field("const", 1, Type::Int32),
                        field("lt", 2, Type::Int32),
                        field("lte", 3, Type::Int32),
                        field("gt", 4, Type::Int32),
                        field("gte", 5, Type::Int32),
                        int_list("in", 6),
                        int_list("not_in", 7),
                    ],
                ),
                message(
                    "StringRules",
                    vec![
                        field("const", 1, Type::String),
                        field("min_len", 2, Type::Uint64),
                        field("max_len", 3, Type::Uint64),
                        field("prefix", 5, Type::String),
                        field("email", 12, Type::Bool),
                        field("uri", 17, Type::Bool),
                    ],
                ),
                message(
                    "EnumRules",
                    vec![
                        field("const", 1, Type::Int32),
                        field("defined_only", 2, Type::Bool),
                        int_list("in", 3),
                        int_list("not_in", 4),
                    ],
                ),
                message(
                    "RepeatedRules",
                    vec![
                        field("min_items", 1, Type::Uint64),
                        field("max_items", 2, Type::Uint64),
                        field("unique", 3, Type::Bool),
                        typed("items", 4, Type::Message, &rules("FieldRules")),
                    ],
                ),
                message(
                    "MapRules",
                    vec![
                        field("min_pairs", 1, Type::Uint64),
                        field("max_pairs", 2, Type::Uint64),
                        typed("keys", 4, Type::Message, &rules("FieldRules")),
                        typed("values", 5, Type::Message, &rules("FieldRules")),
                    ],
                ),
                message("OneofRules", vec![field("required", 1, Type::Bool)]),
            ],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Ignore".into()),
                value: [("IGNORE_UNSPECIFIED", 0), ("IGNORE_IF_ZERO_VALUE", 1), ("IGNORE_ALWAYS", 3)]
                    .into_iter()
                    .map(|(name, number)| EnumValueDescriptorProto {
                        name: Some(name.into()),
                        number: Some(number),
                        options: None,
                    })
                    .collect(),
                ..Default::default()
            }],
            extension: vec![
                FieldDescriptorProto {
                    extendee: Some(".google.protobuf.FieldOptions".into()),
                    ..typed("field", EXTENSION as i32, Type::Message, &rules("FieldRules"))
                },
                FieldDescriptorProto {
                    extendee: Some(".google.protobuf.OneofOptions".into()),
                    ..typed("oneof", EXTENSION as i32, Type::Message, &rules("OneofRules"))
                },
            ],
            syntax: Some("proto2".into()),
            ..Default::default()
        }
    }

    /// A field annotated with encoded `FieldRules`.
    pub(crate) struct Annotated {
        pub field: FieldDescriptorProto,
        pub rules: Option<Vec<u8>>,
    }

    pub(crate) fn plain(field: FieldDescriptorProto) -> Annotated {
        Annotated { field, rules: None }
    }

    pub(crate) fn with_rules(field: FieldDescriptorProto, rules: Vec<u8>) -> Annotated {
        Annotated {
            field,
            rules: Some(rules),
        }
    }

    /// A message in the example file. Oneofs are `(name, required)`.
    pub(crate) struct Msg {
        pub name: &'static str,
        pub fields: Vec<Annotated>,
        pub oneofs: Vec<(&'static str, bool)>,
        pub nested: Vec<DescriptorProto>,
    }

    fn encode_message(msg: &Msg) -> Vec<u8> {
        let mut out = DescriptorProto {
            name: Some(msg.name.into()),
            nested_type: msg.nested.clone(),
            ..Default::default()
        }
        .encode_to_vec();
        for annotated in &msg.fields {
            let mut field = annotated.field.encode_to_vec();
            if let Some(rules) = &annotated.rules {
                field.extend(ld(8, &ld(EXTENSION, rules)));
            }
            out.extend(ld(2, &field));
        }
        for (name, required) in &msg.oneofs {
            let mut oneof = OneofDescriptorProto {
                name: Some((*name).into()),
                options: None,
            }
            .encode_to_vec();
            if *required {
                oneof.extend(ld(2, &ld(EXTENSION, &varint(1, 1))));
            }
            out.extend(ld(8, &oneof));
        }
        out
    }

    /// Map entry type `name` from `key` to `value`.
    pub(crate) fn map_entry(name: &str, key: FieldDescriptorProto, value: FieldDescriptorProto) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.into()),
            field: vec![key, value],
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// An encoded `FileDescriptorSet` holding `messages` in package
    /// `example.v1`, plus the enum `example.v1.Color`.
    pub(crate) fn descriptor_set(messages: &[Msg]) -> Vec<u8> {
        let mut example = FileDescriptorProto {
            name: Some("example.proto".into()),
            package: Some("example.v1".into()),
            dependency: vec!["buf/validate/validate.proto".into()],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Color".into()),
                value: [("COLOR_UNSPECIFIED", 0), ("COLOR_RED", 1), ("COLOR_BLUE", 2)]
                    .into_iter()
                    .map(|(name, number)| EnumValueDescriptorProto {
                        name: Some(name.into()),
                        number: Some(number),
                        options: None,
                    })
                    .collect(),
                ..Default::default()
            }],
            syntax: Some("proto3".into()),
            ..Default::default()
        }
        .encode_to_vec();
        for msg in messages {
            example.extend(ld(4, &encode_message(msg)));
        }

        let mut set = Vec::new();
        set.extend(ld(1, &descriptor_proto_file().encode_to_vec()));
        set.extend(ld(1, &validate_file().encode_to_vec()));
        set.extend(ld(1, &example));
        set
    }
}
