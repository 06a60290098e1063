//! Device transport: the session that runs show commands and pushes
//! configuration batches.
//!
//! The engine only sees the [`Transport`] trait. [`ShellTransport`] drives
//! a device through operator-supplied shell commands (an `ssh` invocation,
//! an expect wrapper, a lab simulator), so session setup and credentials
//! stay outside this crate.
//!
//! # Example
//!
//! ```ignore
//! use ios_cfgmgr_common::transport::{ShellTransport, Transport};
//!
//! let transport = ShellTransport::new("ssh -T admin@10.0.0.1", "ssh -T admin@10.0.0.1");
//! let running = transport.exec("show running-config").await?;
//! transport.configure(&["vlan 10".to_string(), "name Eng".to_string()]).await?;
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::error::{CfgMgrError, CfgMgrResult};

/// Line that enters global configuration mode.
pub const CONFIGURE_TERMINAL: &str = "configure terminal";

/// Line that leaves configuration mode.
pub const END: &str = "end";

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// IOS reports rejected input inline and keeps the session alive, so these
/// markers count as failures even when the wrapper exits 0.
static DEVICE_ERROR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*% ?(Invalid input|Incomplete command|Ambiguous command)")
        .expect("Invalid regex pattern")
});

/// Runs commands against one device session.
///
/// Implementations own timeouts and session lifecycle. At most one
/// reconcile cycle uses a transport at a time.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Runs one read-only command and returns its raw output.
    async fn exec(&self, command: &str) -> CfgMgrResult<String>;

    /// Applies an ordered batch of configuration-mode lines.
    async fn configure(&self, lines: &[String]) -> CfgMgrResult<()>;
}

/// Quotes a string for safe use in shell commands.
///
/// Wraps the string in double quotes and escapes `$`, backtick, `"`, `\`
/// and newline.
///
/// ```
/// use ios_cfgmgr_common::transport::shellquote;
///
/// assert_eq!(shellquote("show vlan"), "\"show vlan\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command exited 0 and the device reported no
    /// rejected input.
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !DEVICE_ERROR_RE.is_match(&self.stdout)
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// [`Transport`] backed by `/bin/sh -c`.
///
/// - `exec(cmd)` runs `<exec_command> "<cmd>"` and returns stdout.
/// - `configure(lines)` runs `<configure_command>` and writes
///   `configure terminal`, the lines, then `end` to its stdin.
#[derive(Debug, Clone)]
pub struct ShellTransport {
    exec_command: String,
    configure_command: String,
}

impl ShellTransport {
    pub fn new(exec_command: impl Into<String>, configure_command: impl Into<String>) -> Self {
        Self {
            exec_command: exec_command.into(),
            configure_command: configure_command.into(),
        }
    }

    async fn run(&self, cmd: &str, stdin: Option<&str>) -> CfgMgrResult<ExecResult> {
        debug!(command = %cmd, "Executing shell command");

        let spawn_err = |e| CfgMgrError::TransportExec {
            command: cmd.to_string(),
            source: e,
        };

        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(cmd)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        // stdin is fed while stdout drains; a session echoing a large batch
        // would otherwise fill its pipe and stall
        let input = child.stdin.take().zip(stdin);
        let write = async move {
            if let Some((mut pipe, input)) = input {
                pipe.write_all(input.as_bytes()).await?;
                // dropping the pipe closes stdin so the session sees EOF
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(spawn_err)?;

        if let Err(e) = written {
            // a session that exits early closes its stdin; the exit status
            // reports why
            if e.kind() != ErrorKind::BrokenPipe || output.status.success() {
                return Err(spawn_err(e));
            }
            debug!(command = %cmd, "Session closed stdin before the batch was written");
        }

        let result = ExecResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };

        if result.success() {
            trace!(command = %cmd, exit_code = result.exit_code, "Command succeeded");
        } else {
            warn!(
                command = %cmd,
                exit_code = result.exit_code,
                output = %result.combined_output(),
                "Command failed"
            );
        }

        Ok(result)
    }
}

#[async_trait]
impl Transport for ShellTransport {
    async fn exec(&self, command: &str) -> CfgMgrResult<String> {
        let cmd = format!("{} {}", self.exec_command, shellquote(command));
        let result = self.run(&cmd, None).await?;
        if result.success() {
            Ok(result.stdout)
        } else {
            Err(CfgMgrError::transport(
                "exec",
                format!(
                    "'{}' (exit code {}): {}",
                    command,
                    result.exit_code,
                    result.combined_output()
                ),
            ))
        }
    }

    async fn configure(&self, lines: &[String]) -> CfgMgrResult<()> {
        let mut batch = String::with_capacity(64 + lines.iter().map(|l| l.len() + 1).sum::<usize>());
        batch.push_str(CONFIGURE_TERMINAL);
        batch.push('\n');
        for line in lines {
            batch.push_str(line);
            batch.push('\n');
        }
        batch.push_str(END);
        batch.push('\n');

        let result = self.run(&self.configure_command, Some(&batch)).await?;
        if result.success() {
            Ok(())
        } else {
            Err(CfgMgrError::transport(
                "configure",
                format!(
                    "{} lines (exit code {}): {}",
                    lines.len(),
                    result.exit_code,
                    result.combined_output()
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shellquote_simple() {
        assert_eq!(shellquote("show running-config"), "\"show running-config\"");
        assert_eq!(shellquote(""), "\"\"");
    }

    #[test]
    fn test_shellquote_special_chars() {
        assert_eq!(shellquote("$HOME"), "\"\\$HOME\"");
        assert_eq!(shellquote("`whoami`"), "\"\\`whoami\\`\"");
        assert_eq!(shellquote("say \"hello\""), "\"say \\\"hello\\\"\"");
        assert_eq!(shellquote("path\\to"), "\"path\\\\to\"");
        assert_eq!(shellquote("line1\nline2"), "\"line1\\\nline2\"");
    }

    #[test]
    fn test_exec_result_device_errors() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "sw1(config)#vlan abc\n% Invalid input detected at '^' marker.".to_string(),
            stderr: String::new(),
        };
        assert!(!result.success());

        let result = ExecResult {
            exit_code: 0,
            stdout: "sw1(config)#vlan 10".to_string(),
            stderr: String::new(),
        };
        assert!(result.success());
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[tokio::test]
    async fn test_shell_exec_passes_quoted_command() {
        let transport = ShellTransport::new("echo", "cat >/dev/null");
        let output = transport.exec("show running-config").await.unwrap();
        assert_eq!(output, "show running-config");
    }

    #[tokio::test]
    async fn test_shell_exec_failure() {
        let transport = ShellTransport::new("exit 3;", "cat >/dev/null");
        let err = transport.exec("show version").await.unwrap_err();
        match err {
            CfgMgrError::Transport { operation, message } => {
                assert_eq!(operation, "exec");
                assert!(message.contains("exit code 3"));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shell_configure_writes_batch_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.txt");
        let transport = ShellTransport::new("echo", format!("cat > {}", path.display()));

        transport
            .configure(&["vlan 10".to_string(), "name Eng".to_string()])
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "configure terminal\nvlan 10\nname Eng\nend\n");
    }

    #[tokio::test]
    async fn test_shell_configure_large_batch_with_echoing_session() {
        // the session echoes every line back, more than a pipe buffer holds
        let transport = ShellTransport::new("echo", "cat");
        let lines: Vec<String> = (0..20_000)
            .map(|i| format!("description line {:08}", i))
            .collect();

        transport.configure(&lines).await.unwrap();
    }

    #[tokio::test]
    async fn test_shell_configure_session_exits_early() {
        let transport = ShellTransport::new("echo", "exit 4");
        let lines: Vec<String> = (0..20_000).map(|i| format!("vlan {}", i)).collect();

        let err = transport.configure(&lines).await.unwrap_err();
        match err {
            CfgMgrError::Transport { operation, message } => {
                assert_eq!(operation, "configure");
                assert!(message.contains("exit code 4"));
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shell_configure_rejected_input() {
        let transport = ShellTransport::new(
            "echo",
            "cat >/dev/null; echo '% Invalid input detected at marker.'",
        );
        let err = transport
            .configure(&["vlan abc".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CfgMgrError::Transport { .. }));
        assert!(err.is_device_side());
    }
}
