//! The codec seam consumed by the reconciliation engine.

use tracing::debug;

use crate::error::CodecResult;
use crate::model::{ConfigEntity, RunningConfig};
use crate::parse::parse_running_config;
use crate::render::{diff_entities, render_entity};

/// Converts between device configuration text and the structured model.
///
/// All three operations are pure. `marshal` and `diff` return newline-joined
/// configuration-mode lines that may include indentation and `!`
/// separators; callers filter them before submission.
pub trait ConfigCodec: Send + Sync {
    /// Parses full running-configuration text.
    fn unmarshal(&self, text: &str) -> CodecResult<RunningConfig>;

    /// Renders the lines that create `new` on a device without it.
    fn marshal(&self, new: &ConfigEntity) -> CodecResult<String>;

    /// Renders the lines that transition `old` into `new`. Equal inputs
    /// produce an empty string.
    fn diff(&self, old: &ConfigEntity, new: &ConfigEntity) -> CodecResult<String>;
}

/// [`ConfigCodec`] for Cisco IOS running-config text.
#[derive(Debug, Clone, Copy, Default)]
pub struct IosCodec;

impl IosCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ConfigCodec for IosCodec {
    fn unmarshal(&self, text: &str) -> CodecResult<RunningConfig> {
        let config = parse_running_config(text)?;
        debug!(
            vlans = config.vlans.len(),
            interfaces = config.interfaces.len(),
            static_routes = config.static_routes.len(),
            eigrp = config.eigrp.len(),
            "Parsed running config"
        );
        Ok(config)
    }

    fn marshal(&self, new: &ConfigEntity) -> CodecResult<String> {
        Ok(render_entity(new))
    }

    fn diff(&self, old: &ConfigEntity, new: &ConfigEntity) -> CodecResult<String> {
        diff_entities(old, new)
    }
}
