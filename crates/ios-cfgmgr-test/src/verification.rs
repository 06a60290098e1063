//! Verification helpers for testing configuration managers
//!
//! Assertions over what a reconcile cycle did to the device: how many
//! reads, which batches, and whether the codec marshalled or diffed.

use thiserror::Error;

use crate::{MockTransport, RecordingCodec};

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected {expected} reads, found {actual}")]
    ReadCountMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} batches, found {actual}")]
    BatchCountMismatch { expected: usize, actual: usize },

    #[error("Batch {index} mismatch: expected {expected:?}, got {actual:?}")]
    BatchMismatch {
        index: usize,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Expected {expected} codec {operation} calls, found {actual}")]
    CodecCallMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Transport-side verification helper
pub struct TransportVerifier<'a> {
    transport: &'a MockTransport,
}

impl<'a> TransportVerifier<'a> {
    pub fn new(transport: &'a MockTransport) -> Self {
        Self { transport }
    }

    /// Verify the number of show commands issued
    pub fn assert_reads(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.transport.execs().len();
        if actual != expected {
            return Err(VerificationError::ReadCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Verify that no configuration batch was submitted
    pub fn assert_no_batches(&self) -> VerifyResult<()> {
        self.assert_batch_count(0)
    }

    /// Verify the number of configuration batches submitted
    pub fn assert_batch_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.transport.batches().len();
        if actual != expected {
            return Err(VerificationError::BatchCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Verify that exactly one batch was submitted, with these lines
    pub fn assert_single_batch(&self, expected: &[&str]) -> VerifyResult<()> {
        self.assert_batch_count(1)?;
        self.assert_batch(0, expected)
    }

    /// Verify the lines of the batch at `index`
    pub fn assert_batch(&self, index: usize, expected: &[&str]) -> VerifyResult<()> {
        let batches = self.transport.batches();
        let actual = batches.get(index).cloned().unwrap_or_default();
        let expected: Vec<String> = expected.iter().map(|l| l.to_string()).collect();
        if actual != expected {
            return Err(VerificationError::BatchMismatch {
                index,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Verify how many times the codec marshalled and diffed
pub fn assert_codec_calls(
    codec: &RecordingCodec,
    marshal: usize,
    diff: usize,
) -> VerifyResult<()> {
    let actual = codec.marshal_count();
    if actual != marshal {
        return Err(VerificationError::CodecCallMismatch {
            operation: "marshal",
            expected: marshal,
            actual,
        });
    }
    let actual = codec.diff_count();
    if actual != diff {
        return Err(VerificationError::CodecCallMismatch {
            operation: "diff",
            expected: diff,
            actual,
        });
    }
    Ok(())
}
