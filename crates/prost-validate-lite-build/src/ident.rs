//! Rust identifiers for protobuf names, following the layout prost generates.

/// Splits an identifier into words at `_`, at lower-to-upper transitions and
/// before the last capital of an acronym (`HTTPServer` → `HTTP`, `Server`).
fn words(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for segment in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let chars: Vec<char> = segment.chars().collect();
        let mut current = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = c.is_ascii_uppercase()
                && prev.is_some_and(|p| {
                    p.is_ascii_lowercase()
                        || p.is_ascii_digit()
                        || (p.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase()))
                });
            if boundary && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            out.push(current);
        }
    }
    out
}

/// `lowerCamel` / `UpperCamel` / `snake_case` → `snake_case`.
#[must_use]
pub fn to_snake(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `snake_case` / `HTTPServer` → `UpperCamel` (`HttpServer`).
#[must_use]
pub fn to_upper_camel(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| {
            let lower = w.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Escapes a keyword the way prost does: `r#type`, but `self_` for the
/// keywords that cannot be raw identifiers.
fn escape(ident: String) -> String {
    match ident.as_str() {
        "crate" | "self" | "super" | "Self" => ident + "_",
        s if KEYWORDS.contains(&s) => format!("r#{ident}"),
        _ => ident,
    }
}

/// Struct field name for a protobuf field.
#[must_use]
pub fn field_ident(name: &str) -> String {
    escape(to_snake(name))
}

/// Type name for a message, enum or oneof.
#[must_use]
pub fn type_ident(name: &str) -> String {
    escape(to_upper_camel(name))
}

/// Module name prost emits for a message's nested types.
#[must_use]
pub fn module_ident(name: &str) -> String {
    escape(to_snake(name))
}

/// Path of a message type relative to its package module.
/// `Outer.Inner` → `outer::Inner`.
#[must_use]
pub fn message_path(name: &str) -> String {
    let mut parts: Vec<&str> = name.split('.').collect();
    let last = parts.pop().unwrap_or_default();
    parts
        .into_iter()
        .map(module_ident)
        .chain(std::iter::once(type_ident(last)))
        .collect::<Vec<_>>()
        .join("::")
}

/// Path of the enum prost emits for a oneof of the message `name`.
/// (`Outer.Inner`, `choice`) → `outer::inner::Choice`.
#[must_use]
pub fn oneof_path(message: &str, oneof: &str) -> String {
    message
        .split('.')
        .map(module_ident)
        .chain(std::iter::once(type_ident(oneof)))
        .collect::<Vec<_>>()
        .join("::")
}

/// Entry point name for a message: `example.v1.Person` →
/// `validate_example_v1_Person`.
#[must_use]
pub fn entry_fn(full_name: &str) -> String {
    format!("validate_{}", full_name.replace('.', "_"))
}

/// Output file name for a package, matching prost's `<package>.rs` with `_`
/// for the root package.
#[must_use]
pub fn unit_file_name(package: &str) -> String {
    if package.is_empty() {
        "_.validate.rs".to_string()
    } else {
        format!("{package}.validate.rs")
    }
}
