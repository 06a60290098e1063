//! Scripted [`Transport`] for driving reconcile cycles without a device.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Transport};

/// One call observed by the mock, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Exec(String),
    Configure(Vec<String>),
}

/// Replays queued show output and records every call.
///
/// Each `exec` pops the next scripted output; running out of output is a
/// transport error, which makes unexpected reads visible in tests.
#[derive(Debug, Default)]
pub struct MockTransport {
    reads: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<TransportCall>>,
    exec_failure: Mutex<Option<String>>,
    configure_failure: Mutex<Option<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers successive reads with `reads`.
    pub fn with_reads<I, S>(reads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for read in reads {
            mock.push_read(read);
        }
        mock
    }

    /// Queues one more show output.
    pub fn push_read(&self, output: impl Into<String>) {
        lock(&self.reads).push_back(output.into());
    }

    /// Makes every following `exec` fail with `message`.
    pub fn fail_exec(self, message: impl Into<String>) -> Self {
        *lock(&self.exec_failure) = Some(message.into());
        self
    }

    /// Makes every following `configure` fail with `message`.
    pub fn fail_configure(self, message: impl Into<String>) -> Self {
        *lock(&self.configure_failure) = Some(message.into());
        self
    }

    /// All calls in the order they were made.
    pub fn calls(&self) -> Vec<TransportCall> {
        lock(&self.calls).clone()
    }

    /// Commands passed to `exec`.
    pub fn execs(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                TransportCall::Exec(cmd) => Some(cmd.clone()),
                TransportCall::Configure(_) => None,
            })
            .collect()
    }

    /// Batches passed to `configure`, including failed ones.
    pub fn batches(&self) -> Vec<Vec<String>> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                TransportCall::Configure(lines) => Some(lines.clone()),
                TransportCall::Exec(_) => None,
            })
            .collect()
    }

    /// Number of show outputs still queued.
    pub fn pending_reads(&self) -> usize {
        lock(&self.reads).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn exec(&self, command: &str) -> CfgMgrResult<String> {
        lock(&self.calls).push(TransportCall::Exec(command.to_string()));
        if let Some(message) = lock(&self.exec_failure).clone() {
            return Err(CfgMgrError::transport("exec", message));
        }
        let output = lock(&self.reads).pop_front();
        debug!(command, scripted = output.is_some(), "Mock exec");
        output.ok_or_else(|| CfgMgrError::transport("exec", "no scripted output left"))
    }

    async fn configure(&self, lines: &[String]) -> CfgMgrResult<()> {
        lock(&self.calls).push(TransportCall::Configure(lines.to_vec()));
        debug!(lines = lines.len(), "Mock configure");
        match lock(&self.configure_failure).clone() {
            Some(message) => Err(CfgMgrError::transport("configure", message)),
            None => Ok(()),
        }
    }
}
