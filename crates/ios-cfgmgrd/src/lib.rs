//! iosmgrd - desired-state configuration manager for Cisco IOS devices.
//!
//! Each managed entity kind implements [`Resource`](ios_cfgmgr_common::Resource):
//!
//! - [`vlan::VlanResource`]: `vlan <id>` blocks
//! - [`route::StaticRouteResource`]: global `ip route` statements
//! - [`eigrp::EigrpResource`]: `router eigrp <asn>` network statements
//! - [`ethernet_intf::EthernetInterfaceResource`]: routed interfaces
//! - [`switch_intf::SwitchInterfaceResource`]: access and trunk switchports
//!
//! A [`DesiredDocument`] lists entities of every kind and is applied in
//! dependency order by [`apply_document`].
//!
//! # Example
//!
//! ```no_run
//! use ios_cfgmgr_common::{Reconciler, ShellTransport};
//! use ios_cfgmgrd::vlan::{VlanDesired, VlanResource};
//! use ios_config_codec::IosCodec;
//! use ios_types::VlanId;
//!
//! # async fn run() -> ios_cfgmgr_common::CfgMgrResult<()> {
//! let transport = ShellTransport::new("ssh -T sw1", "ssh -T sw1");
//! let reconciler = Reconciler::new(transport, IosCodec::new());
//!
//! let desired = VlanDesired::new(VlanId::new(10)?).with_name("Engineering");
//! let converged = reconciler.apply::<VlanResource>(&desired).await?;
//! assert_eq!(converged, Some(desired));
//! # Ok(())
//! # }
//! ```

mod address;
pub mod dispatch;
pub mod document;
pub mod eigrp;
pub mod ethernet_intf;
pub mod logging;
pub mod route;
pub mod settings;
pub mod switch_intf;
pub mod vlan;

pub use dispatch::{delete_entity, list_entities, read_entity, EntityKind};
pub use document::{apply_document, AppliedEntity, ApplyReport, DesiredDocument};
pub use settings::{DeviceSettings, LoggingSettings, Settings, DEFAULT_SETTINGS_PATH};
