//! Sample `prost` messages with generated `prost-validate-lite` validators.
//!
//! The build script compiles `proto/` with `prost-build`, then feeds the
//! resulting descriptor set to `prost-validate-lite-build`. Each package
//! module includes the message types and their validators side by side, the
//! way a consumer would. The end-to-end tests live in `tests/`.

/// Package `example.v1`. Validators stop at the first violation.
pub mod v1 {
    include!(concat!(env!("OUT_DIR"), "/example.v1.rs"));
    include!(concat!(env!("OUT_DIR"), "/example.v1.validate.rs"));
}

/// Package `example.audit.v1`. Validators collect every violation.
pub mod audit {
    pub mod v1 {
        include!(concat!(env!("OUT_DIR"), "/example.audit.v1.rs"));
        include!(concat!(env!("OUT_DIR"), "/example.audit.v1.validate.rs"));
    }
}
