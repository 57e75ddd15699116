/// Top-level error type returned by the generator.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A constraint annotation could not be turned into a validator.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// The descriptor set could not be decoded.
    #[error(transparent)]
    Descriptor(#[from] prost_reflect::DescriptorError),

    /// Writing generated sources failed.
    #[error("failed to write generated validators: {0}")]
    Io(#[from] std::io::Error),
}

/// Returned when a validation rule cannot be compiled from its descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("compilation error: {cause}")]
pub struct CompilationError {
    /// Description of why the rule failed to compile.
    pub cause: String,
}

impl CompilationError {
    pub(crate) fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}
