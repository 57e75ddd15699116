use prost_reflect::Kind;

use crate::schema::{EnumType, FieldKind, ScalarKind};

/// Maps a proto field kind to the expected oneof variant name in `FieldRules.type`.
pub(crate) fn expected_standard_rule(kind: &Kind) -> Option<&'static str> {
    match kind {
        Kind::Message(message) => {
            let name = message.full_name();
            wrapper_kind(name)
                .and_then(|kind| kind.rule_name())
                .or_else(|| expected_wkt_rule(name))
        }
        other => field_kind(other).rule_name(),
    }
}

/// Maps a well-known type full name to the expected oneof variant name in `FieldRules.type`.
pub(crate) fn expected_wkt_rule(full_name: &str) -> Option<&'static str> {
    match full_name {
        "google.protobuf.Any" => Some("any"),
        "google.protobuf.Duration" => Some("duration"),
        "google.protobuf.Timestamp" => Some("timestamp"),
        "google.protobuf.FieldMask" => Some("field_mask"),
        _ => None,
    }
}

/// Maps a wrapper type to the kind prost unwraps it to.
///
/// prost represents `google.protobuf.Int32Value` and friends as
/// `Option<i32>` etc., so a wrapper field validates like an optional scalar.
pub(crate) fn wrapper_kind(full_name: &str) -> Option<FieldKind> {
    let kind = match full_name {
        "google.protobuf.BoolValue" => FieldKind::Scalar(ScalarKind::Bool),
        "google.protobuf.BytesValue" => FieldKind::Bytes,
        "google.protobuf.DoubleValue" => FieldKind::Scalar(ScalarKind::Double),
        "google.protobuf.FloatValue" => FieldKind::Scalar(ScalarKind::Float),
        "google.protobuf.Int32Value" => FieldKind::Scalar(ScalarKind::Int32),
        "google.protobuf.Int64Value" => FieldKind::Scalar(ScalarKind::Int64),
        "google.protobuf.StringValue" => FieldKind::String,
        "google.protobuf.UInt32Value" => FieldKind::Scalar(ScalarKind::Uint32),
        "google.protobuf.UInt64Value" => FieldKind::Scalar(ScalarKind::Uint64),
        _ => return None,
    };
    Some(kind)
}

/// The schema kind of a value of `kind`, as prost represents it.
pub(crate) fn field_kind(kind: &Kind) -> FieldKind {
    let scalar = match kind {
        Kind::Float => ScalarKind::Float,
        Kind::Double => ScalarKind::Double,
        Kind::Int32 => ScalarKind::Int32,
        Kind::Int64 => ScalarKind::Int64,
        Kind::Uint32 => ScalarKind::Uint32,
        Kind::Uint64 => ScalarKind::Uint64,
        Kind::Sint32 => ScalarKind::Sint32,
        Kind::Sint64 => ScalarKind::Sint64,
        Kind::Fixed32 => ScalarKind::Fixed32,
        Kind::Fixed64 => ScalarKind::Fixed64,
        Kind::Sfixed32 => ScalarKind::Sfixed32,
        Kind::Sfixed64 => ScalarKind::Sfixed64,
        Kind::Bool => ScalarKind::Bool,
        Kind::String => return FieldKind::String,
        Kind::Bytes => return FieldKind::Bytes,
        Kind::Enum(desc) => {
            return FieldKind::Enum(EnumType::new(
                desc.full_name(),
                desc.values().map(|value| value.number()),
            ));
        }
        Kind::Message(desc) => {
            let name = desc.full_name();
            if name == "google.protobuf.Any" {
                return FieldKind::Any;
            }
            return wrapper_kind(name).unwrap_or_else(|| FieldKind::Message(name.to_string()));
        }
    };
    FieldKind::Scalar(scalar)
}
