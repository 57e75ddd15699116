//! Build-time generator for [`prost-validate-lite`](https://crates.io/crates/prost-validate-lite)
//! validators.
//!
//! Reads [`buf.validate`](https://github.com/bufbuild/protovalidate) rules from
//! a compiled descriptor set (or from hand-built [`MessageSchema`]s) and emits
//! one Rust source file per protobuf package. Each file holds a `Validate`
//! impl per message plus a `validate_<package>_<Message>` entry point; none of
//! it allocates or evaluates anything at runtime beyond the checks themselves.
//!
//! # Usage
//!
//! In `build.rs`, after `prost-build` has written the message types:
//!
//! ```rust,ignore
//! let descriptor_set = std::fs::read(out_dir.join("descriptor.bin"))?;
//! prost_validate_lite_build::Generator::new().compile_into_out_dir(&descriptor_set)?;
//! ```
//!
//! Then include both files in the same module:
//!
//! ```rust,ignore
//! include!(concat!(env!("OUT_DIR"), "/example.v1.rs"));
//! include!(concat!(env!("OUT_DIR"), "/example.v1.validate.rs"));
//! ```
//!
//! # Unsupported rules
//!
//! CEL expressions, message-level rules and the `duration`, `timestamp` and
//! `field_mask` families have no allocation-free form. They are emitted as
//! `// unsupported:` comments and logged through `tracing` at `warn`.
//!
//! # Errors
//!
//! A rule that does not fit its field, or a literal that does not fit the
//! field's type, fails generation with a [`CompilationError`].

mod config;
mod descriptor;
mod emit;
mod error;
pub mod ident;
mod lookups;
mod schema;

pub use config::GeneratorOption;
pub use emit::{GeneratedUnit, Generator};
pub use error::{CompilationError, Error};
pub use schema::{
    AnyRule, BoolRule, BytesRule, Cardinality, EnumRule, EnumType, FieldKind, FieldRules,
    FieldSchema, Ignore, MapRule, MessageSchema, NumValue, NumberRule, OneofSchema, Presence,
    RepeatedRule, Rule, ScalarKind, StringRule,
};
