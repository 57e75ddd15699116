mod field;
mod rules;
mod writer;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use prost_reflect::DescriptorPool;

use crate::config::{GeneratorConfig, GeneratorOption};
use crate::descriptor;
use crate::error::{CompilationError, Error};
use crate::ident::{entry_fn, message_path, unit_file_name};
use crate::schema::MessageSchema;

use field::MessageEmitter;
use rules::RuleMapper;
use writer::CodeWriter;

/// Turns message schemas into Rust validator sources.
///
/// One [`GeneratedUnit`] is produced per protobuf package. Include it next to
/// the prost output for the same package:
///
/// ```rust,ignore
/// pub mod v1 {
///     include!(concat!(env!("OUT_DIR"), "/example.v1.rs"));
///     include!(concat!(env!("OUT_DIR"), "/example.v1.validate.rs"));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

/// Generated validators for one protobuf package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub package: String,
    /// `<package>.validate.rs`, or `_.validate.rs` for the root package.
    pub file_name: String,
    pub source: String,
}

impl GeneratedUnit {
    /// Writes the unit into `dir` and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, Error> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.source)?;
        tracing::debug!(path = %path.display(), "wrote validators");
        Ok(path)
    }
}

impl Generator {
    /// A generator with default options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
        }
    }

    /// A generator with the given options.
    #[must_use]
    pub fn with_options(options: &[GeneratorOption]) -> Self {
        Self {
            config: GeneratorConfig::from_options(options),
        }
    }

    /// Generates validators for `messages`, grouped by package.
    ///
    /// Messages of skipped packages are dropped. Message-typed fields are
    /// recursed into when their type is generated in this run or listed in
    /// [`GeneratorOption::ExternMessages`].
    ///
    /// # Errors
    ///
    /// Returns a [`CompilationError`] if a rule does not fit its field or a
    /// literal does not fit the field's type.
    pub fn generate(&self, messages: &[MessageSchema]) -> Result<Vec<GeneratedUnit>, Error> {
        let mut packages: BTreeMap<&str, Vec<&MessageSchema>> = BTreeMap::new();
        let mut seen = HashSet::new();
        for message in messages {
            if self.config.skips(&message.package) {
                tracing::debug!(name = %message.full_name(), "skipping message");
                continue;
            }
            let full_name = message.full_name();
            if !seen.insert(full_name.clone()) {
                return Err(CompilationError::new(format!(
                    "message `{full_name}` is listed more than once"
                ))
                .into());
            }
            packages.entry(&message.package).or_default().push(message);
        }
        let known: HashSet<String> = seen
            .into_iter()
            .chain(self.config.extern_messages.iter().cloned())
            .collect();

        packages
            .into_iter()
            .map(|(package, messages)| self.generate_unit(package, &messages, &known))
            .collect()
    }

    /// Generates validators for every message in `pool` outside the skipped
    /// packages.
    ///
    /// # Errors
    ///
    /// Returns a [`CompilationError`] if an annotation cannot be read or does
    /// not fit its field.
    pub fn generate_from_pool(&self, pool: &DescriptorPool) -> Result<Vec<GeneratedUnit>, Error> {
        let messages = descriptor::message_schemas(pool, &self.config)?;
        self.generate(&messages)
    }

    /// Like [`Generator::generate_from_pool`], from an encoded
    /// `FileDescriptorSet` such as `protoc --include_imports -o` writes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`] if the bytes are not a valid descriptor
    /// set, or any error of [`Generator::generate_from_pool`].
    pub fn generate_from_descriptor_set(&self, bytes: &[u8]) -> Result<Vec<GeneratedUnit>, Error> {
        let pool = DescriptorPool::decode(bytes)?;
        self.generate_from_pool(&pool)
    }

    /// Generates from a descriptor set and writes every unit to `$OUT_DIR`.
    /// Meant to be called from a build script.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `OUT_DIR` is unset or a file cannot be
    /// written, or any error of [`Generator::generate_from_descriptor_set`].
    pub fn compile_into_out_dir(&self, descriptor_set: &[u8]) -> Result<Vec<PathBuf>, Error> {
        let units = self.generate_from_descriptor_set(descriptor_set)?;
        write_units(&out_dir()?, &units)
    }

    /// Generates from hand-built schemas and writes every unit to `$OUT_DIR`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `OUT_DIR` is unset or a file cannot be
    /// written, or any error of [`Generator::generate`].
    pub fn write_to_out_dir(&self, messages: &[MessageSchema]) -> Result<Vec<PathBuf>, Error> {
        let units = self.generate(messages)?;
        write_units(&out_dir()?, &units)
    }

    fn generate_unit(
        &self,
        package: &str,
        messages: &[&MessageSchema],
        known: &HashSet<String>,
    ) -> Result<GeneratedUnit, Error> {
        let mut w = CodeWriter::new();
        w.line("// @generated by prost-validate-lite-build. Do not edit.");
        if package.is_empty() {
            w.line("// Validators for the root package.");
        } else {
            w.line(format!("// Validators for package `{package}`."));
        }
        for message in messages {
            w.blank();
            self.write_message(&mut w, message, known)?;
        }
        tracing::debug!(package, messages = messages.len(), "generated validators");
        Ok(GeneratedUnit {
            package: package.to_string(),
            file_name: unit_file_name(package),
            source: w.finish(),
        })
    }

    fn write_message(
        &self,
        w: &mut CodeWriter,
        message: &MessageSchema,
        known: &HashSet<String>,
    ) -> Result<(), CompilationError> {
        let rt = self.config.runtime.as_str();
        let ty = message_path(&message.name);
        let full_name = message.full_name();

        let emitter = MessageEmitter {
            rules: RuleMapper {
                rt,
                patterns: self.config.patterns,
            },
            known,
            message,
        };
        let mut body = CodeWriter::at_depth(2);
        let live = emitter.emit_body(&mut body)?;
        let ctx = if live { "ctx" } else { "_ctx" };

        w.open(format!("impl {rt}::Validate for {ty} {{"));
        w.open("fn validate_in<const P: usize>(");
        w.line("&self,");
        w.line(format!("{ctx}: &mut {rt}::PathContext<'_, P>,"));
        w.reopen(format!(") -> ::core::result::Result<(), {rt}::Halt> {{"));
        w.splice(body);
        w.line("::core::result::Result::Ok(())");
        w.close("}");
        w.close("}");
        w.blank();

        let config = if self.config.early_exit {
            "fail_fast"
        } else {
            "collect_all"
        };
        w.line(format!(
            "/// Validates a `{full_name}`. Returns `true` iff the message is present"
        ));
        w.line("/// and satisfies every rule; violations are appended to `violations`.");
        w.line("#[allow(non_snake_case)]");
        w.open(format!("pub fn {}(", entry_fn(&full_name)));
        w.line(format!("msg: ::core::option::Option<&{ty}>,"));
        w.line(format!(
            "violations: ::core::option::Option<&mut dyn {rt}::ViolationSink>,"
        ));
        w.reopen(") -> bool {");
        w.line(format!(
            "{rt}::verdict(msg, violations, {rt}::ValidationConfig::{config}())"
        ));
        w.close("}");
        Ok(())
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

fn out_dir() -> Result<PathBuf, Error> {
    std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| std::io::Error::other("OUT_DIR is not set; call this from a build script").into())
}

fn write_units(dir: &Path, units: &[GeneratedUnit]) -> Result<Vec<PathBuf>, Error> {
    units.iter().map(|unit| unit.write_to_dir(dir)).collect()
}
