use std::env;
use std::path::PathBuf;

use prost_validate_lite_build::{Generator, GeneratorOption};

const PROTO_DIR: &str = "proto";
const FILES: &[&str] = &["example/v1/example.proto", "example/audit/v1/audit.proto"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for f in FILES {
        println!("cargo:rerun-if-changed={PROTO_DIR}/{f}");
    }
    println!("cargo:rerun-if-changed={PROTO_DIR}/buf/validate/validate.proto");

    #[allow(clippy::unwrap_used)]
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let descriptor_path = out_dir.join("file_descriptor_set.bin");

    let protos: Vec<String> = FILES.iter().map(|f| format!("{PROTO_DIR}/{f}")).collect();
    prost_build::Config::new()
        .file_descriptor_set_path(&descriptor_path)
        .btree_map(["."])
        .compile_protos(protos.as_slice(), &[PROTO_DIR])?;

    let descriptor_set = std::fs::read(&descriptor_path)?;

    // `example.v1` stops at the first violation; `example.audit.v1` collects
    // every violation.
    Generator::with_options(&[
        GeneratorOption::EarlyExit(true),
        GeneratorOption::SkipPackages(vec!["example.audit".into()]),
    ])
    .compile_into_out_dir(&descriptor_set)?;
    Generator::with_options(&[
        GeneratorOption::EarlyExit(false),
        GeneratorOption::SkipPackages(vec!["example.v1".into()]),
    ])
    .compile_into_out_dir(&descriptor_set)?;

    Ok(())
}
