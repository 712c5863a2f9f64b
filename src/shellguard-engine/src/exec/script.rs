//! Temp-script materialization for the sandboxed interpreter.
//!
//! Command text is always written verbatim into a uniquely named script file
//! and the interpreter is pointed at that file; it is never smuggled through
//! shell-escaped argument strings.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Prefix for temp script file names.
const SCRIPT_PREFIX: &str = "shellguard-";

/// Which interpreter runs the script, and how it is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpreter {
    /// PowerShell Core, invoked non-interactively with no profile and the
    /// execution policy bypassed for the single invocation.
    #[default]
    #[serde(rename = "powershell")]
    PowerShell,
    /// POSIX `sh`, no wrapper. Lets the execution machinery run anywhere;
    /// also what the concurrency tests use.
    Posix,
}

impl Interpreter {
    /// Default binary name.
    pub fn default_binary(self) -> &'static str {
        match self {
            Interpreter::PowerShell => "pwsh",
            Interpreter::Posix => "sh",
        }
    }

    /// Extension for the temp script file.
    pub fn script_extension(self) -> &'static str {
        match self {
            Interpreter::PowerShell => "ps1",
            Interpreter::Posix => "sh",
        }
    }

    /// Arguments placed before the script path.
    pub fn invocation_args(self) -> &'static [&'static str] {
        match self {
            Interpreter::PowerShell => &[
                "-NoProfile",
                "-NonInteractive",
                "-NoLogo",
                "-ExecutionPolicy",
                "Bypass",
                "-File",
            ],
            Interpreter::Posix => &[],
        }
    }

    /// Wrap the raw command text into a script body.
    ///
    /// The PowerShell wrapper forces UTF-8 output, keeps going on
    /// non-terminating errors, and re-emits terminating exceptions on stderr
    /// instead of letting the child die silently.
    pub fn wrap_command(self, command: &str) -> String {
        match self {
            Interpreter::PowerShell => format!(
                "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8\n\
                 $OutputEncoding = [System.Text.Encoding]::UTF8\n\
                 $ErrorActionPreference = 'Continue'\n\
                 try {{\n\
                 {command}\n\
                 }}\n\
                 catch {{\n\
                 Write-Error -ErrorRecord $_\n\
                 }}\n"
            ),
            Interpreter::Posix => format!("{command}\n"),
        }
    }
}

/// Write the wrapped command into a uniquely named temp script.
///
/// The returned guard deletes the file on drop, which covers every exit
/// path: normal completion, timeout kill, and spawn failure.
pub(crate) fn materialize(
    interpreter: Interpreter,
    command: &str,
) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(SCRIPT_PREFIX)
        .suffix(&format!(".{}", interpreter.script_extension()))
        .tempfile()?;
    file.write_all(interpreter.wrap_command(command).as_bytes())?;
    file.flush()?;
    Ok(file)
}
