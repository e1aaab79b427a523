//! A process runner that answers from a script instead of spawning anything.

use std::sync::{Arc, Mutex};

use plugsmith_core::{
    application::{
        ApplicationError,
        ports::{Invocation, ProcessOutput, ProcessRunner},
    },
    error::PlugsmithResult,
};

type Responder = Box<dyn Fn(&Invocation) -> ProcessOutput + Send + Sync>;

struct Rule {
    program: String,
    args_prefix: Vec<String>,
    respond: Responder,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        invocation.program == self.program && invocation.args.starts_with(&self.args_prefix)
    }
}

#[derive(Default)]
struct Script {
    rules: Vec<Rule>,
    calls: Vec<Invocation>,
}

/// Test double for [`ProcessRunner`].
///
/// Rules are checked in the order they were added; the first whose program
/// matches and whose argument prefix matches answers. An invocation no rule
/// matches fails like a program that is not installed. Every invocation is
/// recorded, matched or not.
#[derive(Clone, Default)]
pub struct ScriptedProcessRunner {
    script: Arc<Mutex<Script>>,
}

impl ScriptedProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer with a computed output. The closure may also act on the world,
    /// e.g. write the files `npm install` would have written.
    pub fn respond_with<F>(self, program: &str, args_prefix: &[&str], respond: F) -> Self
    where
        F: Fn(&Invocation) -> ProcessOutput + Send + Sync + 'static,
    {
        if let Ok(mut script) = self.script.lock() {
            script.rules.push(Rule {
                program: program.to_string(),
                args_prefix: args_prefix.iter().map(|a| a.to_string()).collect(),
                respond: Box::new(respond),
            });
        }
        self
    }

    pub fn succeed(self, program: &str, args_prefix: &[&str], stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.respond_with(program, args_prefix, move |_| ProcessOutput {
            exit_code: Some(0),
            stdout: stdout.clone(),
            stderr: String::new(),
        })
    }

    pub fn fail(self, program: &str, args_prefix: &[&str], exit_code: i32, stderr: &str) -> Self {
        let stderr = stderr.to_string();
        self.respond_with(program, args_prefix, move |_| ProcessOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.clone(),
        })
    }

    /// Answer `node --version` and `npm --version`.
    pub fn with_tool_versions(self, node: &str, npm: &str) -> Self {
        self.succeed("node", &["--version"], &format!("v{node}\n"))
            .succeed("npm", &["--version"], &format!("{npm}\n"))
    }

    /// Every invocation seen so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.script
            .lock()
            .map(|s| s.calls.clone())
            .unwrap_or_default()
    }

    /// `program args...` of every invocation, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }
}

impl ProcessRunner for ScriptedProcessRunner {
    fn run(&self, invocation: &Invocation) -> PlugsmithResult<ProcessOutput> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        script.calls.push(invocation.clone());
        match script.rules.iter().find(|r| r.matches(invocation)) {
            Some(rule) => Ok((rule.respond)(invocation)),
            None => Err(ApplicationError::ProcessSpawn {
                command: invocation.command_line(),
                reason: "no scripted response".into(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_answers() {
        let runner = ScriptedProcessRunner::new()
            .fail("git", &["clone", "-b"], 128, "no such branch")
            .succeed("git", &["clone"], "");

        let branch = Invocation::new("git", "/ws").args(["clone", "-b", "x", "url"]);
        let plain = Invocation::new("git", "/ws").args(["clone", "url"]);
        assert_eq!(runner.run(&branch).unwrap().exit_code, Some(128));
        assert!(runner.run(&plain).unwrap().success());
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn unscripted_invocation_fails_to_spawn() {
        let runner = ScriptedProcessRunner::new();
        let inv = Invocation::new("npm", "/ws").arg("install");
        assert!(runner.run(&inv).is_err());
        assert_eq!(runner.command_lines(), vec!["npm install"]);
    }
}
