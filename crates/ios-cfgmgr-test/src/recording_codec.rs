//! [`ConfigCodec`] wrapper that records which operation produced a batch.

use std::sync::{Mutex, PoisonError};

use ios_config_codec::{CodecResult, ConfigCodec, ConfigEntity, IosCodec, RunningConfig};

/// One codec call, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecCall {
    Unmarshal,
    Marshal(ConfigEntity),
    Diff(ConfigEntity, ConfigEntity),
}

/// Delegates to [`IosCodec`] and records every call.
#[derive(Debug, Default)]
pub struct RecordingCodec {
    inner: IosCodec,
    calls: Mutex<Vec<CodecCall>>,
}

impl RecordingCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<CodecCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn marshal_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CodecCall::Marshal(_)))
            .count()
    }

    pub fn diff_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, CodecCall::Diff(..)))
            .count()
    }

    fn record(&self, call: CodecCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl ConfigCodec for RecordingCodec {
    fn unmarshal(&self, text: &str) -> CodecResult<RunningConfig> {
        self.record(CodecCall::Unmarshal);
        self.inner.unmarshal(text)
    }

    fn marshal(&self, new: &ConfigEntity) -> CodecResult<String> {
        self.record(CodecCall::Marshal(new.clone()));
        self.inner.marshal(new)
    }

    fn diff(&self, old: &ConfigEntity, new: &ConfigEntity) -> CodecResult<String> {
        self.record(CodecCall::Diff(old.clone(), new.clone()));
        self.inner.diff(old, new)
    }
}
