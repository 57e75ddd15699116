//! One rule in, one runtime call out.
//!
//! Every supported rule becomes a single call into
//! `prost_validate_lite::rules` with its parameters baked in as literals. The
//! value under test is always bound to `value`, the repeated container to
//! `items` and the map container to `map`.

use crate::error::CompilationError;
use crate::schema::{
    AnyRule, BoolRule, BytesRule, EnumRule, EnumType, FieldKind, MapRule, NumValue, NumberRule,
    RepeatedRule, Rule, ScalarKind, StringRule,
};

/// What the emitter writes for one rule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Check {
    /// `if !condition { ctx.report(id, message)?; }`, preceded by `prelude`
    /// in its own block when the condition needs a `static`.
    Test {
        condition: String,
        id: String,
        message: String,
        prelude: Option<String>,
    },
    /// No code; the comment says why.
    Skip(String),
}

fn test(condition: String, id: String, message: impl Into<String>) -> Check {
    Check::Test {
        condition,
        id,
        message: message.into(),
        prelude: None,
    }
}

pub(crate) struct RuleMapper<'a> {
    pub rt: &'a str,
    pub patterns: bool,
}

impl RuleMapper<'_> {
    /// Maps a rule on a singular value of `kind`. `field` names the field in
    /// diagnostics.
    pub(crate) fn value_check(
        &self,
        rule: &Rule,
        kind: &FieldKind,
        field: &str,
    ) -> Result<Check, CompilationError> {
        match (rule, kind) {
            (Rule::Number(rule), FieldKind::Scalar(scalar)) if *scalar != ScalarKind::Bool => {
                self.number_check(rule, *scalar, field)
            }
            (Rule::Bool(BoolRule::Const(expected)), FieldKind::Scalar(ScalarKind::Bool)) => Ok(test(
                format!("{}::rules::bool::const_eq(value, {expected})", self.rt),
                "bool.const".into(),
                format!("value must equal {expected}"),
            )),
            (Rule::String(rule), FieldKind::String) => self.string_check(rule, field),
            (Rule::Bytes(rule), FieldKind::Bytes) => Ok(self.bytes_check(rule)),
            (Rule::Enum(rule), FieldKind::Enum(ty)) => Ok(self.enum_check(rule, ty)),
            (Rule::Any(rule), FieldKind::Any) => Ok(self.any_check(rule)),
            (Rule::Unsupported { rule, reason }, _) => Ok(unsupported(field, rule, reason)),
            (rule, kind) => Err(mismatch(rule, kind, field)),
        }
    }

    /// Maps a rule on a repeated (`map == false`) or map container.
    pub(crate) fn container_check(
        &self,
        rule: &Rule,
        map: bool,
        field: &str,
    ) -> Result<Check, CompilationError> {
        match (rule, map) {
            (Rule::Repeated(rule), false) => Ok(self.repeated_check(rule)),
            (Rule::Map(rule), true) => Ok(self.map_check(rule)),
            (Rule::Unsupported { rule, reason }, _) => Ok(unsupported(field, rule, reason)),
            (rule, map) => Err(CompilationError::new(format!(
                "expected rule `{}`, got `{}` on field `{field}`",
                if map { "map" } else { "repeated" },
                rule.family()
            ))),
        }
    }

    fn repeated_check(&self, rule: &RepeatedRule) -> Check {
        let rt = self.rt;
        match rule {
            RepeatedRule::MinItems(n) => test(
                format!("{rt}::rules::repeated::min_items(items, {n})"),
                "repeated.min_items".into(),
                format!("value must contain at least {n} item(s)"),
            ),
            RepeatedRule::MaxItems(n) => test(
                format!("{rt}::rules::repeated::max_items(items, {n})"),
                "repeated.max_items".into(),
                format!("value must contain no more than {n} item(s)"),
            ),
            RepeatedRule::Unique => test(
                format!("{rt}::rules::repeated::unique(items)"),
                "repeated.unique".into(),
                "repeated value must contain unique items",
            ),
        }
    }

    fn map_check(&self, rule: &MapRule) -> Check {
        let rt = self.rt;
        match rule {
            MapRule::MinPairs(n) => test(
                format!("{rt}::rules::map::min_pairs(map.len(), {n})"),
                "map.min_pairs".into(),
                format!("map must be at least {n} entries"),
            ),
            MapRule::MaxPairs(n) => test(
                format!("{rt}::rules::map::max_pairs(map.len(), {n})"),
                "map.max_pairs".into(),
                format!("map must be at most {n} entries"),
            ),
            MapRule::NoSparse => test(
                format!("{rt}::rules::map::no_sparse(map.values())"),
                "map.no_sparse".into(),
                "map values must not be unset",
            ),
        }
    }

    fn number_check(
        &self,
        rule: &NumberRule,
        kind: ScalarKind,
        field: &str,
    ) -> Result<Check, CompilationError> {
        let rt = self.rt;
        let prefix = kind.rule_name();
        let lit = |v: &NumValue| num_literal(*v, kind, field);
        let list = |vs: &[NumValue]| -> Result<(String, String), CompilationError> {
            let lits = vs.iter().map(lit).collect::<Result<Vec<_>, _>>()?;
            let shown = vs.iter().map(ToString::to_string).collect::<Vec<_>>();
            Ok((lits.join(", "), shown.join(", ")))
        };
        let check = match rule {
            NumberRule::Const(v) => test(
                format!("{rt}::rules::number::const_eq(value, {})", lit(v)?),
                format!("{prefix}.const"),
                format!("value must equal {v}"),
            ),
            NumberRule::Lt(v) => test(
                format!("{rt}::rules::number::lt(value, {})", lit(v)?),
                format!("{prefix}.lt"),
                format!("value must be less than {v}"),
            ),
            NumberRule::Lte(v) => test(
                format!("{rt}::rules::number::lte(value, {})", lit(v)?),
                format!("{prefix}.lte"),
                format!("value must be less than or equal to {v}"),
            ),
            NumberRule::Gt(v) => test(
                format!("{rt}::rules::number::gt(value, {})", lit(v)?),
                format!("{prefix}.gt"),
                format!("value must be greater than {v}"),
            ),
            NumberRule::Gte(v) => test(
                format!("{rt}::rules::number::gte(value, {})", lit(v)?),
                format!("{prefix}.gte"),
                format!("value must be greater than or equal to {v}"),
            ),
            NumberRule::In(vs) => {
                let (lits, shown) = list(vs)?;
                test(
                    format!("{rt}::rules::number::in_set(value, &[{lits}])"),
                    format!("{prefix}.in"),
                    format!("value must be in list [{shown}]"),
                )
            }
            NumberRule::NotIn(vs) => {
                let (lits, shown) = list(vs)?;
                test(
                    format!("{rt}::rules::number::not_in_set(value, &[{lits}])"),
                    format!("{prefix}.not_in"),
                    format!("value must not be in list [{shown}]"),
                )
            }
            NumberRule::Finite if kind.is_float() => test(
                format!("{rt}::rules::number::finite(value)"),
                format!("{prefix}.finite"),
                "value must be finite",
            ),
            NumberRule::Finite => {
                return Err(CompilationError::new(format!(
                    "`finite` only applies to float and double, not `{prefix}` on field `{field}`"
                )));
            }
        };
        Ok(check)
    }

    fn string_check(&self, rule: &StringRule, field: &str) -> Result<Check, CompilationError> {
        let rt = self.rt;
        let call = |f: &str, arg: &str| format!("{rt}::rules::string::{f}(value{arg})");
        let id = |name: &str| format!("string.{name}");
        let check = match rule {
            StringRule::Const(s) => test(
                call("const_eq", &format!(", {}", str_literal(s))),
                id("const"),
                format!("value must equal `{s}`"),
            ),
            StringRule::Len(n) => test(
                call("len", &format!(", {n}")),
                id("len"),
                format!("value length must be {n} bytes"),
            ),
            StringRule::MinLen(n) => test(
                call("min_len", &format!(", {n}")),
                id("min_len"),
                format!("value length must be at least {n} bytes"),
            ),
            StringRule::MaxLen(n) => test(
                call("max_len", &format!(", {n}")),
                id("max_len"),
                format!("value length must be at most {n} bytes"),
            ),
            StringRule::LenBytes(n) => test(
                call("len", &format!(", {n}")),
                id("len_bytes"),
                format!("value length must be {n} bytes"),
            ),
            StringRule::MinBytes(n) => test(
                call("min_len", &format!(", {n}")),
                id("min_bytes"),
                format!("value length must be at least {n} bytes"),
            ),
            StringRule::MaxBytes(n) => test(
                call("max_len", &format!(", {n}")),
                id("max_bytes"),
                format!("value length must be at most {n} bytes"),
            ),
            StringRule::Pattern(pattern) => return self.pattern_check(pattern, field),
            StringRule::Prefix(s) => test(
                call("prefix", &format!(", {}", str_literal(s))),
                id("prefix"),
                format!("value does not have prefix `{s}`"),
            ),
            StringRule::Suffix(s) => test(
                call("suffix", &format!(", {}", str_literal(s))),
                id("suffix"),
                format!("value does not have suffix `{s}`"),
            ),
            StringRule::Contains(s) => test(
                call("contains", &format!(", {}", str_literal(s))),
                id("contains"),
                format!("value does not contain substring `{s}`"),
            ),
            StringRule::NotContains(s) => test(
                call("not_contains", &format!(", {}", str_literal(s))),
                id("not_contains"),
                format!("value contains substring `{s}`"),
            ),
            StringRule::In(set) => test(
                call("in_set", &format!(", &[{}]", str_list(set))),
                id("in"),
                format!("value must be in list {set:?}"),
            ),
            StringRule::NotIn(set) => test(
                call("not_in_set", &format!(", &[{}]", str_list(set))),
                id("not_in"),
                format!("value must not be in list {set:?}"),
            ),
            StringRule::Email => test(
                call("email", ""),
                id("email"),
                "value must be a valid email address",
            ),
            StringRule::Hostname => test(
                call("hostname", ""),
                id("hostname"),
                "value must be a valid hostname",
            ),
            StringRule::Ip => test(call("ip", ""), id("ip"), "value must be a valid IP address"),
            StringRule::Ipv4 => test(
                call("ipv4", ""),
                id("ipv4"),
                "value must be a valid IPv4 address",
            ),
            StringRule::Ipv6 => test(
                call("ipv6", ""),
                id("ipv6"),
                "value must be a valid IPv6 address",
            ),
            StringRule::Address => test(
                call("address", ""),
                id("address"),
                "value must be a valid hostname, or ip address",
            ),
            StringRule::Uuid => test(call("uuid", ""), id("uuid"), "value must be a valid UUID"),
            StringRule::Tuuid => test(
                call("tuuid", ""),
                id("tuuid"),
                "value must be a valid trimmed UUID",
            ),
            StringRule::HostAndPort => test(
                call("host_and_port", ""),
                id("host_and_port"),
                "value must be a valid host (hostname or IP address) and port pair",
            ),
            StringRule::Ascii => test(
                call("ascii", ""),
                id("ascii"),
                "value must contain only ASCII characters",
            ),
        };
        Ok(check)
    }

    fn pattern_check(&self, pattern: &str, field: &str) -> Result<Check, CompilationError> {
        if !self.patterns {
            return Ok(unsupported(
                field,
                "string.pattern",
                "pattern support is off; enable `GeneratorOption::Patterns` and the runtime `pattern` feature",
            ));
        }
        regex::Regex::new(pattern).map_err(|err| {
            CompilationError::new(format!(
                "invalid `string.pattern` on field `{field}`: {err}"
            ))
        })?;
        let rt = self.rt;
        Ok(Check::Test {
            condition: format!("{rt}::rules::pattern::matches(value, &PATTERN)"),
            id: "string.pattern".into(),
            message: format!("value does not match regex pattern `{pattern}`"),
            prelude: Some(format!(
                "static PATTERN: {rt}::rules::pattern::Pattern = {rt}::rules::pattern::Pattern::new({});",
                str_literal(pattern)
            )),
        })
    }

    fn bytes_check(&self, rule: &BytesRule) -> Check {
        let rt = self.rt;
        let call = |f: &str, arg: &str| format!("{rt}::rules::bytes::{f}(value{arg})");
        let id = |name: &str| format!("bytes.{name}");
        match rule {
            BytesRule::Const(b) => test(
                call("const_eq", &format!(", {}", bytes_literal(b))),
                id("const"),
                format!("value must be {}", hex(b)),
            ),
            BytesRule::Len(n) => test(
                call("len", &format!(", {n}")),
                id("len"),
                format!("value length must be {n} bytes"),
            ),
            BytesRule::MinLen(n) => test(
                call("min_len", &format!(", {n}")),
                id("min_len"),
                format!("value length must be at least {n} bytes"),
            ),
            BytesRule::MaxLen(n) => test(
                call("max_len", &format!(", {n}")),
                id("max_len"),
                format!("value must be at most {n} bytes"),
            ),
            BytesRule::Prefix(b) => test(
                call("prefix", &format!(", {}", bytes_literal(b))),
                id("prefix"),
                format!("value does not have prefix {}", hex(b)),
            ),
            BytesRule::Suffix(b) => test(
                call("suffix", &format!(", {}", bytes_literal(b))),
                id("suffix"),
                format!("value does not have suffix {}", hex(b)),
            ),
            BytesRule::Contains(b) => test(
                call("contains", &format!(", {}", bytes_literal(b))),
                id("contains"),
                format!("value does not contain {}", hex(b)),
            ),
            BytesRule::In(set) => test(
                call("in_set", &format!(", &[{}]", bytes_list(set))),
                id("in"),
                "value must be in the allowed list",
            ),
            BytesRule::NotIn(set) => test(
                call("not_in_set", &format!(", &[{}]", bytes_list(set))),
                id("not_in"),
                "value must not be in the disallowed list",
            ),
            BytesRule::Ip => test(
                call("ip", ""),
                id("ip"),
                "value must be a valid IP address",
            ),
            BytesRule::Ipv4 => test(
                call("ipv4", ""),
                id("ipv4"),
                "value must be a valid IPv4 address",
            ),
            BytesRule::Ipv6 => test(
                call("ipv6", ""),
                id("ipv6"),
                "value must be a valid IPv6 address",
            ),
        }
    }

    fn enum_check(&self, rule: &EnumRule, ty: &EnumType) -> Check {
        let rt = self.rt;
        let ints = |vs: &[i32]| vs.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        match rule {
            EnumRule::Const(v) => test(
                format!("{rt}::rules::enum_rules::const_eq(value, {v})"),
                "enum.const".into(),
                format!("value must equal {v}"),
            ),
            EnumRule::DefinedOnly if ty.values.is_empty() => Check::Skip(format!(
                "enum.defined_only: `{}` defines no values, every number is accepted",
                ty.full_name
            )),
            EnumRule::DefinedOnly => test(
                format!(
                    "{rt}::rules::enum_rules::defined_only(value, &[{}])",
                    ints(&ty.values)
                ),
                "enum.defined_only".into(),
                "value must be one of the defined enum values",
            ),
            EnumRule::In(vs) => test(
                format!("{rt}::rules::enum_rules::in_set(value, &[{}])", ints(vs)),
                "enum.in".into(),
                format!("value must be in list [{}]", ints(vs)),
            ),
            EnumRule::NotIn(vs) => test(
                format!("{rt}::rules::enum_rules::not_in_set(value, &[{}])", ints(vs)),
                "enum.not_in".into(),
                format!("value must not be in list [{}]", ints(vs)),
            ),
        }
    }

    fn any_check(&self, rule: &AnyRule) -> Check {
        let rt = self.rt;
        match rule {
            AnyRule::In(urls) => test(
                format!(
                    "{rt}::rules::any::in_set(value.type_url.as_str(), &[{}])",
                    str_list(urls)
                ),
                "any.in".into(),
                "type URL must be in the allow list",
            ),
            AnyRule::NotIn(urls) => test(
                format!(
                    "{rt}::rules::any::not_in_set(value.type_url.as_str(), &[{}])",
                    str_list(urls)
                ),
                "any.not_in".into(),
                "type URL must not be in the block list",
            ),
        }
    }
}

fn unsupported(field: &str, rule: &str, reason: &str) -> Check {
    tracing::warn!(field, rule, reason, "unsupported rule, no check emitted");
    Check::Skip(format!("unsupported: {rule} ({reason})"))
}

fn mismatch(rule: &Rule, kind: &FieldKind, field: &str) -> CompilationError {
    let expected = kind.rule_name().unwrap_or("message");
    CompilationError::new(format!(
        "expected rule `{expected}`, got `{}` on field `{field}`",
        rule.family()
    ))
}

/// A Rust string literal for `s`.
pub(crate) fn str_literal(s: &str) -> String {
    format!("{s:?}")
}

fn str_list(set: &[String]) -> String {
    set.iter()
        .map(|s| str_literal(s))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A `&[u8]` expression for `bytes`: `&b"..."[..]`.
pub(crate) fn bytes_literal(bytes: &[u8]) -> String {
    let mut out = String::from("&b\"");
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push_str("\"[..]");
    out
}

fn bytes_list(set: &[Vec<u8>]) -> String {
    set.iter()
        .map(|b| bytes_literal(b))
        .collect::<Vec<_>>()
        .join(", ")
}

fn hex(bytes: &[u8]) -> String {
    let digits: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("0x{digits}")
}

/// Narrows a schema literal to the Rust type prost uses for `kind`.
pub(crate) fn num_literal(
    value: NumValue,
    kind: ScalarKind,
    field: &str,
) -> Result<String, CompilationError> {
    let out_of_range = || {
        CompilationError::new(format!(
            "literal {value} does not fit `{}` on field `{field}`",
            kind.rule_name()
        ))
    };
    let ty = kind.rust_type();
    if kind.is_float() {
        let wide = match value {
            NumValue::Float(f) => f,
            NumValue::Int(i) => i as f64,
            NumValue::Uint(u) => u as f64,
        };
        return Ok(if ty == "f32" {
            float_literal(f64::from(wide as f32), "f32")
        } else {
            float_literal(wide, "f64")
        });
    }
    let n: i128 = match value {
        NumValue::Int(i) => i.into(),
        NumValue::Uint(u) => u.into(),
        NumValue::Float(_) => return Err(out_of_range()),
    };
    let (min, max): (i128, i128) = match ty {
        "i32" => (i32::MIN.into(), i32::MAX.into()),
        "i64" => (i64::MIN.into(), i64::MAX.into()),
        "u32" => (0, u32::MAX.into()),
        _ => (0, u64::MAX.into()),
    };
    if n < min || n > max {
        return Err(out_of_range());
    }
    if n == min && min < 0 {
        return Ok(format!("{ty}::MIN"));
    }
    Ok(format!("{n}_{ty}"))
}

fn float_literal(f: f64, ty: &str) -> String {
    if f.is_nan() {
        format!("{ty}::NAN")
    } else if f == f64::INFINITY {
        format!("{ty}::INFINITY")
    } else if f == f64::NEG_INFINITY {
        format!("{ty}::NEG_INFINITY")
    } else if ty == "f32" {
        let narrow = f as f32;
        format!("{narrow:?}_f32")
    } else {
        format!("{f:?}_f64")
    }
}
