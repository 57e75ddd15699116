/// Default number of violations a [`ViolationBuffer`](crate::ViolationBuffer) holds.
pub const DEFAULT_CAPACITY: usize = 16;

/// Default size in bytes of a field path, both in the running context and in
/// each recorded violation.
pub const DEFAULT_PATH_CAPACITY: usize = 128;

/// Runtime configuration for a single validation call.
///
/// Generated `validate_*` entry points bake in the early-exit flag chosen at
/// generation time; the convenience functions in this crate take it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Stop at the first violation instead of collecting up to capacity.
    pub early_exit: bool,
}

impl ValidationConfig {
    /// Stop at the first violation.
    #[must_use]
    pub const fn fail_fast() -> Self {
        Self { early_exit: true }
    }

    /// Evaluate every rule, recording violations until the buffer is full.
    #[must_use]
    pub const fn collect_all() -> Self {
        Self { early_exit: false }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::fail_fast()
    }
}
