//! Structured model and text codec for Cisco IOS running configuration.
//!
//! - [`RunningConfig`]: the parsed snapshot (VLANs, interfaces, static
//!   routes, EIGRP processes) in device order
//! - [`ConfigCodec`]: `unmarshal` / `marshal` / `diff`, the only way the
//!   reconciliation engine touches configuration text
//! - [`IosCodec`]: the IOS implementation
//!
//! # Example
//!
//! ```
//! use ios_config_codec::{ConfigCodec, IosCodec};
//!
//! let codec = IosCodec::new();
//! let config = codec.unmarshal("vlan 10\n name Eng\n!\n").unwrap();
//! let old = config.vlans[0].clone();
//! let mut new = old.clone();
//! new.name = "Ops".to_string();
//!
//! let lines = codec.diff(&old.into(), &new.into()).unwrap();
//! assert_eq!(lines, "vlan 10\n name Ops\n!\n");
//! ```

pub mod codec;
pub mod error;
pub mod model;
mod parse;
mod render;

pub use codec::{ConfigCodec, IosCodec};
pub use error::{CodecError, CodecResult};
pub use model::{
    BpduGuard, ConfigEntity, EigrpNetwork, EigrpProcess, Interface, InterfaceIp, RunningConfig,
    StaticRoute, SwitchportMode, Vlan,
};
