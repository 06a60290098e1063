//! Test infrastructure for the IOS configuration managers
//!
//! Provides:
//! - [`MockTransport`]: scripted show output, recorded batches, injectable
//!   failures
//! - [`RecordingCodec`]: the IOS codec with a log of marshal / diff calls
//! - Running-config text fixtures
//! - Batch and call verification helpers

pub mod fixtures;
mod mock_transport;
mod recording_codec;
mod verification;

pub use fixtures::*;
pub use mock_transport::{MockTransport, TransportCall};
pub use recording_codec::{CodecCall, RecordingCodec};
pub use verification::*;
