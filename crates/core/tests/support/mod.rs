//! Shared helpers for integration tests.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use typegen_core::SyntaxCheck;

/// Runs the TypeScript compiler over emitted code.
///
/// The binary is taken from `$TSC`, falling back to `tsc` on the PATH.
#[derive(Debug)]
pub struct Tsc {
    program: PathBuf,
}

impl Tsc {
    /// `None` when no compiler is installed.
    pub fn find() -> Option<Self> {
        let program = std::env::var_os("TSC").map_or_else(|| PathBuf::from("tsc"), PathBuf::from);
        let available = Command::new(&program)
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success());
        available.then_some(Self { program })
    }
}

impl SyntaxCheck for Tsc {
    fn check(&self, code: &str) -> Result<(), String> {
        let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
        let file = dir.path().join("types.ts");
        fs::write(&file, code).map_err(|err| err.to_string())?;

        let output = Command::new(&self.program)
            .args(["--noEmit", "--strict", "--target", "es2020"])
            .arg(&file)
            .output()
            .map_err(|err| err.to_string())?;
        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stdout).into_owned())
        }
    }
}
