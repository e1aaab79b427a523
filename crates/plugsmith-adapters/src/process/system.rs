//! Runs real programs with `std::process::Command`.

use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, instrument};

use plugsmith_core::{
    application::{
        ApplicationError,
        ports::{Invocation, ProcessOutput, ProcessRunner},
    },
    error::PlugsmithResult,
};

/// Production process runner. Output is captured, stdin is closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

/// `npm` is a batch script on Windows and cannot be spawned by bare name.
fn program_name(program: &str) -> String {
    if cfg!(windows) && program == "npm" {
        "npm.cmd".to_string()
    } else {
        program.to_string()
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(command = %invocation.command_line()))]
    fn run(&self, invocation: &Invocation) -> PlugsmithResult<ProcessOutput> {
        let started = Instant::now();
        let output = Command::new(program_name(&invocation.program))
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ApplicationError::ProcessSpawn {
                command: invocation.command_line(),
                reason: e.to_string(),
            })?;

        let result = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            exit_code = ?result.exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "process finished"
        );
        Ok(result)
    }
}
