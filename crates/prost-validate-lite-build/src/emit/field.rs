//! The body of one `Validate` impl: every field, then every oneof.
//!
//! Each emitted slot binds the value under test to `value` and evaluates the
//! slot's checks in declaration order. Paths are pushed on entry and popped on
//! the way out; a `?` on any push or report unwinds the whole walk.

use std::collections::HashSet;

use super::rules::{Check, RuleMapper, str_literal};
use super::writer::CodeWriter;
use crate::error::CompilationError;
use crate::ident::{field_ident, oneof_path, type_ident};
use crate::schema::{
    Cardinality, FieldKind, FieldRules, FieldSchema, Ignore, MessageSchema, OneofSchema, Presence,
    ScalarKind,
};

const REPORT_REQUIRED: &str = "ctx.report(\"required\", \"value is required\")?;";

/// What to do with one bound value.
struct Slot {
    /// Report `required` when this holds, and check nothing else.
    required_if: Option<String>,
    /// Only check while this holds (`ignore = IGNORE_IF_ZERO_VALUE`).
    guard: Option<String>,
    checks: Vec<Check>,
    recurse: bool,
}

impl Slot {
    fn ignored(full: &str) -> Self {
        Self {
            required_if: None,
            guard: None,
            checks: vec![Check::Skip(format!("{full}: ignored"))],
            recurse: false,
        }
    }

    fn has_body(&self) -> bool {
        self.recurse || self.checks.iter().any(|c| matches!(c, Check::Test { .. }))
    }

    fn is_live(&self) -> bool {
        self.required_if.is_some() || self.has_body()
    }
}

/// Emits the checks of one message.
pub(crate) struct MessageEmitter<'a> {
    pub rules: RuleMapper<'a>,
    /// Messages that have a `Validate` impl and can be recursed into.
    pub known: &'a HashSet<String>,
    pub message: &'a MessageSchema,
}

impl MessageEmitter<'_> {
    /// Writes the statements of `validate_in`. Returns whether any of them
    /// touches `ctx`.
    pub(crate) fn emit_body(&self, w: &mut CodeWriter) -> Result<bool, CompilationError> {
        let mut live = false;
        for field in &self.message.fields {
            live |= self.field(w, field)?;
        }
        for oneof in &self.message.oneofs {
            live |= self.oneof(w, oneof)?;
        }
        Ok(live)
    }

    fn full(&self, name: &str) -> String {
        format!("{}.{name}", self.message.full_name())
    }

    fn recurses(&self, kind: &FieldKind) -> bool {
        matches!(kind, FieldKind::Message(name) if self.known.contains(name))
    }

    fn plan(
        &self,
        kind: &FieldKind,
        rules: &FieldRules,
        zero_is_missing: bool,
        full: &str,
    ) -> Result<Slot, CompilationError> {
        if rules.ignore == Ignore::Always {
            return Ok(Slot::ignored(full));
        }
        if rules.items.is_some() || rules.keys.is_some() || rules.values.is_some() {
            return Err(CompilationError::new(format!(
                "element rules only apply to repeated and map fields, not `{full}`"
            )));
        }
        let checks = rules
            .rules
            .iter()
            .map(|rule| self.rules.value_check(rule, kind, full))
            .collect::<Result<Vec<_>, _>>()?;
        let required_if = if rules.required && zero_is_missing {
            zero_condition(kind)
        } else {
            None
        };
        let mut slot = Slot {
            required_if,
            guard: None,
            checks,
            recurse: self.recurses(kind),
        };
        if rules.ignore == Ignore::IfZeroValue && slot.required_if.is_none() && slot.has_body() {
            slot.guard = nonzero_condition(kind);
        }
        Ok(slot)
    }

    /// Writes a planned slot. `value` must already be bound.
    fn write_slot(&self, w: &mut CodeWriter, slot: &Slot) {
        if let Some(zero) = &slot.required_if {
            w.open(format!("if {zero} {{"));
            w.line(REPORT_REQUIRED);
            if slot.has_body() {
                w.reopen("} else {");
                self.write_checks(w, slot);
            }
            w.close("}");
            if !slot.has_body() {
                write_skips(w, &slot.checks);
            }
        } else if let Some(guard) = &slot.guard {
            w.open(format!("if {guard} {{"));
            self.write_checks(w, slot);
            w.close("}");
        } else {
            self.write_checks(w, slot);
        }
    }

    fn write_checks(&self, w: &mut CodeWriter, slot: &Slot) {
        for check in &slot.checks {
            write_check(w, check);
        }
        if slot.recurse {
            w.line(format!("{}::Validate::validate_in(value, ctx)?;", self.rules.rt));
        }
    }

    fn field(&self, w: &mut CodeWriter, field: &FieldSchema) -> Result<bool, CompilationError> {
        let full = self.full(&field.name);
        if field.rules.ignore == Ignore::Always {
            w.line(format!("// {}: ignored", field.name));
            return Ok(false);
        }
        match &field.cardinality {
            Cardinality::Single(presence) => self.single(w, field, *presence, &full),
            Cardinality::Repeated => self.repeated(w, field, &full),
            Cardinality::Map { key } => self.map(w, field, key, &full),
        }
    }

    fn single(
        &self,
        w: &mut CodeWriter,
        field: &FieldSchema,
        presence: Presence,
        full: &str,
    ) -> Result<bool, CompilationError> {
        let ident = field_ident(&field.name);
        let path = str_literal(&field.name);
        match presence {
            Presence::Implicit => {
                let binding = implicit_binding(&field.kind, &ident).ok_or_else(|| {
                    CompilationError::new(format!("message field `{full}` must have explicit presence"))
                })?;
                let slot = self.plan(&field.kind, &field.rules, true, full)?;
                if !slot.is_live() {
                    write_skips(w, &slot.checks);
                    return Ok(false);
                }
                w.open("{");
                w.line(format!("ctx.push_field({path})?;"));
                w.line(binding);
                self.write_slot(w, &slot);
                w.line("ctx.pop();");
                w.close("}");
            }
            Presence::Explicit => {
                let slot = self.plan(&field.kind, &field.rules, false, full)?;
                let required = field.rules.required;
                if !slot.is_live() && !required {
                    write_skips(w, &slot.checks);
                    return Ok(false);
                }
                w.line(format!("ctx.push_field({path})?;"));
                if slot.is_live() {
                    w.open(format!(
                        "if let ::core::option::Option::Some(value) = {} {{",
                        explicit_source(&field.kind, &ident)
                    ));
                    self.write_slot(w, &slot);
                    if required {
                        w.reopen("} else {");
                        w.line(REPORT_REQUIRED);
                    }
                    w.close("}");
                } else {
                    w.open(format!("if self.{ident}.is_none() {{"));
                    w.line(REPORT_REQUIRED);
                    w.close("}");
                    write_skips(w, &slot.checks);
                }
                w.line("ctx.pop();");
            }
        }
        Ok(true)
    }

    fn container(
        &self,
        field: &FieldSchema,
        map: bool,
        full: &str,
    ) -> Result<Vec<Check>, CompilationError> {
        field
            .rules
            .rules
            .iter()
            .map(|rule| self.rules.container_check(rule, map, full))
            .collect()
    }

    /// Opens the block around a container bound to `var`, handling
    /// `required` and `ignore`. Returns how many blocks to close.
    fn open_container(&self, w: &mut CodeWriter, rules: &FieldRules, var: &str) -> usize {
        if rules.required {
            w.open(format!("if {var}.is_empty() {{"));
            w.line(REPORT_REQUIRED);
            w.reopen("} else {");
            1
        } else if rules.ignore == Ignore::IfZeroValue {
            w.open(format!("if !{var}.is_empty() {{"));
            1
        } else {
            0
        }
    }

    fn repeated(
        &self,
        w: &mut CodeWriter,
        field: &FieldSchema,
        full: &str,
    ) -> Result<bool, CompilationError> {
        if field.rules.keys.is_some() || field.rules.values.is_some() {
            return Err(CompilationError::new(format!(
                "map rules on repeated field `{full}`"
            )));
        }
        let container = self.container(field, false, full)?;
        let no_rules = FieldRules::default();
        let item_rules = field.rules.items.as_deref().unwrap_or(&no_rules);
        let item = self.plan(&field.kind, item_rules, true, &format!("{full}[]"))?;
        let container_live = container.iter().any(|c| matches!(c, Check::Test { .. }));
        if !field.rules.required && !container_live && !item.is_live() {
            write_skips(w, &container);
            write_skips(w, &item.checks);
            return Ok(false);
        }

        let ident = field_ident(&field.name);
        w.open("{");
        w.line(format!("ctx.push_field({})?;", str_literal(&field.name)));
        w.line(format!("let items = self.{ident}.as_slice();"));
        let depth = self.open_container(w, &field.rules, "items");
        for check in &container {
            write_check(w, check);
        }
        if item.is_live() {
            w.open("for (index, item) in items.iter().enumerate() {");
            w.line("ctx.push_index(index)?;");
            w.line(item_binding(&field.kind, "item"));
            self.write_slot(w, &item);
            w.line("ctx.pop();");
            w.close("}");
        } else {
            write_skips(w, &item.checks);
        }
        for _ in 0..depth {
            w.close("}");
        }
        w.line("ctx.pop();");
        w.close("}");
        Ok(true)
    }

    fn map(
        &self,
        w: &mut CodeWriter,
        field: &FieldSchema,
        key_kind: &FieldKind,
        full: &str,
    ) -> Result<bool, CompilationError> {
        if field.rules.items.is_some() {
            return Err(CompilationError::new(format!(
                "repeated rules on map field `{full}`"
            )));
        }
        let container = self.container(field, true, full)?;
        let no_rules = FieldRules::default();
        let key_rules = field.rules.keys.as_deref().unwrap_or(&no_rules);
        let value_rules = field.rules.values.as_deref().unwrap_or(&no_rules);
        let key = self.plan(key_kind, key_rules, true, &format!("{full}[key]"))?;
        let value = self.plan(&field.kind, value_rules, true, &format!("{full}[value]"))?;
        let container_live = container.iter().any(|c| matches!(c, Check::Test { .. }));
        if !field.rules.required && !container_live && !key.is_live() && !value.is_live() {
            write_skips(w, &container);
            write_skips(w, &key.checks);
            write_skips(w, &value.checks);
            return Ok(false);
        }

        let ident = field_ident(&field.name);
        w.open("{");
        w.line(format!("ctx.push_field({})?;", str_literal(&field.name)));
        w.line(format!("let map = &self.{ident};"));
        let depth = self.open_container(w, &field.rules, "map");
        for check in &container {
            write_check(w, check);
        }
        if key.is_live() || value.is_live() {
            let entry = if value.is_live() { "entry" } else { "_" };
            w.open(format!("for (key, {entry}) in map.iter() {{"));
            w.line("ctx.push_key(key)?;");
            for (slot, kind, var) in [(&key, key_kind, "key"), (&value, &field.kind, "entry")] {
                if slot.is_live() {
                    w.open("{");
                    w.line(item_binding(kind, var));
                    self.write_slot(w, slot);
                    w.close("}");
                } else {
                    write_skips(w, &slot.checks);
                }
            }
            w.line("ctx.pop();");
            w.close("}");
        } else {
            write_skips(w, &key.checks);
            write_skips(w, &value.checks);
        }
        for _ in 0..depth {
            w.close("}");
        }
        w.line("ctx.pop();");
        w.close("}");
        Ok(true)
    }

    fn oneof(&self, w: &mut CodeWriter, oneof: &OneofSchema) -> Result<bool, CompilationError> {
        let enum_path = oneof_path(&self.message.name, &oneof.name);
        let mut arms = Vec::with_capacity(oneof.arms.len());
        for arm in &oneof.arms {
            let full = self.full(&arm.name);
            if !matches!(arm.cardinality, Cardinality::Single(_)) {
                return Err(CompilationError::new(format!(
                    "oneof member `{full}` cannot be repeated or a map"
                )));
            }
            // A selected arm is present even when it holds its zero value.
            arms.push((arm, self.plan(&arm.kind, &arm.rules, false, &full)?));
        }
        let live_arms = arms.iter().filter(|(_, slot)| slot.is_live()).count();
        if live_arms == 0 && !oneof.required {
            for (_, slot) in &arms {
                write_skips(w, &slot.checks);
            }
            return Ok(false);
        }

        w.open(format!("match &self.{} {{", field_ident(&oneof.name)));
        for (arm, slot) in &arms {
            if !slot.is_live() {
                write_skips(w, &slot.checks);
                continue;
            }
            w.open(format!(
                "::core::option::Option::Some({enum_path}::{}(item)) => {{",
                type_ident(&arm.name)
            ));
            w.line(format!("ctx.push_field({})?;", str_literal(&arm.name)));
            w.line(item_binding(&arm.kind, "item"));
            self.write_slot(w, slot);
            w.line("ctx.pop();");
            w.close("}");
        }
        if oneof.required {
            w.open("::core::option::Option::None => {");
            w.line(format!("ctx.push_field({})?;", str_literal(&oneof.name)));
            w.line("ctx.report(\"oneof.required\", \"exactly one field is required in oneof\")?;");
            w.line("ctx.pop();");
            w.close("}");
        }
        if !oneof.required || live_arms < arms.len() {
            w.line("_ => {}");
        }
        w.close("}");
        Ok(true)
    }
}

fn write_check(w: &mut CodeWriter, check: &Check) {
    match check {
        Check::Skip(note) => w.line(format!("// {note}")),
        Check::Test {
            condition,
            id,
            message,
            prelude,
        } => {
            if let Some(prelude) = prelude {
                w.open("{");
                w.line(prelude);
            }
            w.open(format!("if !{condition} {{"));
            w.line(format!(
                "ctx.report({}, {})?;",
                str_literal(id),
                str_literal(message)
            ));
            w.close("}");
            if prelude.is_some() {
                w.close("}");
            }
        }
    }
}

fn write_skips(w: &mut CodeWriter, checks: &[Check]) {
    for check in checks {
        if let Check::Skip(note) = check {
            w.line(format!("// {note}"));
        }
    }
}

/// `let value = ...;` for a proto3 field without presence.
fn implicit_binding(kind: &FieldKind, ident: &str) -> Option<String> {
    Some(match kind {
        FieldKind::Scalar(_) | FieldKind::Enum(_) => format!("let value = self.{ident};"),
        FieldKind::String => format!("let value = self.{ident}.as_str();"),
        FieldKind::Bytes => format!("let value: &[u8] = &self.{ident}[..];"),
        FieldKind::Message(_) | FieldKind::Any => return None,
    })
}

/// The `Option` expression for a field with presence.
fn explicit_source(kind: &FieldKind, ident: &str) -> String {
    match kind {
        FieldKind::Scalar(_) | FieldKind::Enum(_) => format!("self.{ident}"),
        FieldKind::String | FieldKind::Bytes => format!("self.{ident}.as_deref()"),
        FieldKind::Message(_) | FieldKind::Any => format!("self.{ident}.as_ref()"),
    }
}

/// `let value = ...;` from a reference `var` yielded by an iterator or a
/// oneof match.
fn item_binding(kind: &FieldKind, var: &str) -> String {
    match kind {
        FieldKind::Scalar(_) | FieldKind::Enum(_) => format!("let value = *{var};"),
        FieldKind::String => format!("let value = {var}.as_str();"),
        FieldKind::Bytes => format!("let value: &[u8] = &{var}[..];"),
        FieldKind::Message(_) | FieldKind::Any => format!("let value = {var};"),
    }
}

/// Holds when `value` is the zero value of its kind. Messages have none.
fn zero_condition(kind: &FieldKind) -> Option<String> {
    Some(
        match kind {
            FieldKind::Scalar(ScalarKind::Bool) => "!value",
            FieldKind::Scalar(s) if s.is_float() => "value == 0.0",
            FieldKind::Scalar(_) | FieldKind::Enum(_) => "value == 0",
            FieldKind::String | FieldKind::Bytes => "value.is_empty()",
            FieldKind::Message(_) | FieldKind::Any => return None,
        }
        .to_string(),
    )
}

fn nonzero_condition(kind: &FieldKind) -> Option<String> {
    Some(
        match kind {
            FieldKind::Scalar(ScalarKind::Bool) => "value",
            FieldKind::Scalar(s) if s.is_float() => "value != 0.0",
            FieldKind::Scalar(_) | FieldKind::Enum(_) => "value != 0",
            FieldKind::String | FieldKind::Bytes => "!value.is_empty()",
            FieldKind::Message(_) | FieldKind::Any => return None,
        }
        .to_string(),
    )
}
