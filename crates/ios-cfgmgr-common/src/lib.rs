//! Reconciliation engine shared by the IOS configuration managers.
//!
//! - [`Reconciler`]: the read, locate, diff-or-create, apply, re-read cycle
//! - [`Resource`]: per-kind Attribute Codec, Entity Locator and teardown
//! - [`Transport`] / [`ShellTransport`]: the device session
//! - [`Tristate`]: unset / null / value attributes for desired state
//! - [`filter_commands`]: the Command Filter applied to every batch
//! - [`error`]: error kinds of a reconcile cycle
//!
//! # Example
//!
//! ```ignore
//! use ios_cfgmgr_common::{Reconciler, ShellTransport};
//! use ios_config_codec::IosCodec;
//!
//! let transport = ShellTransport::new("ssh -T admin@sw1", "ssh -T admin@sw1");
//! let reconciler = Reconciler::new(transport, IosCodec::new());
//! let vlan = reconciler.apply::<VlanResource>(&desired).await?;
//! ```

pub mod error;
pub mod filter;
pub mod reconciler;
pub mod resource;
pub mod transport;
pub mod tristate;

pub use error::{CfgMgrError, CfgMgrResult};
pub use filter::filter_commands;
pub use reconciler::{Reconciler, DEFAULT_SHOW_COMMAND};
pub use resource::{locate, Resource};
pub use transport::{shellquote, ShellTransport, Transport};
pub use tristate::Tristate;
