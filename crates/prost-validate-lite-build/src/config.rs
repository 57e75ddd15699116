/// Options for configuring a [`Generator`](crate::Generator).
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GeneratorOption {
    /// Whether generated entry points stop at the first violation.
    /// Defaults to `true`.
    EarlyExit(bool),

    /// Path the generated code uses to reach the runtime crate.
    /// Defaults to `::prost_validate_lite`.
    RuntimeCrate(String),

    /// Emit `string.pattern` checks. The consuming crate must enable the
    /// runtime's `pattern` feature. Defaults to `false`, in which case
    /// patterns are reported as unsupported.
    Patterns(bool),

    /// Protobuf packages to leave alone, e.g. vendored dependencies.
    /// `google.protobuf` and `buf.validate` are always skipped.
    SkipPackages(Vec<String>),

    /// Messages validated by another generator run. Fields of these types are
    /// recursed into even though this run emits nothing for them.
    ExternMessages(Vec<String>),
}

pub(crate) const DEFAULT_RUNTIME_CRATE: &str = "::prost_validate_lite";

pub(crate) const ALWAYS_SKIPPED: &[&str] = &["google.protobuf", "buf.validate", "validate"];

/// Resolved generator settings.
#[derive(Debug, Clone)]
pub(crate) struct GeneratorConfig {
    pub early_exit: bool,
    pub runtime: String,
    pub patterns: bool,
    pub skip_packages: Vec<String>,
    pub extern_messages: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            early_exit: true,
            runtime: DEFAULT_RUNTIME_CRATE.to_string(),
            patterns: false,
            skip_packages: Vec::new(),
            extern_messages: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    pub(crate) fn from_options(options: &[GeneratorOption]) -> Self {
        let mut config = Self::default();
        for opt in options {
            match opt {
                GeneratorOption::EarlyExit(on) => config.early_exit = *on,
                GeneratorOption::RuntimeCrate(path) => config.runtime.clone_from(path),
                GeneratorOption::Patterns(on) => config.patterns = *on,
                GeneratorOption::SkipPackages(packages) => {
                    config.skip_packages.extend(packages.iter().cloned());
                }
                GeneratorOption::ExternMessages(names) => {
                    config.extern_messages.extend(names.iter().cloned());
                }
            }
        }
        config
    }

    /// Whether messages of `package` are left out.
    pub(crate) fn skips(&self, package: &str) -> bool {
        ALWAYS_SKIPPED
            .iter()
            .copied()
            .chain(self.skip_packages.iter().map(String::as_str))
            .any(|skip| package == skip || package.starts_with(&format!("{skip}.")))
    }
}
