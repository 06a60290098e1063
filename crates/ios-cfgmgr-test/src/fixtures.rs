//! Running-config text fixtures
//!
//! [`RunningConfigText`] assembles `show running-config` output block by
//! block, so each test states only the entities it cares about.

/// Builder for running-config text as a device prints it.
#[derive(Debug, Clone, Default)]
pub struct RunningConfigText {
    blocks: Vec<String>,
}

impl RunningConfigText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `vlan <id>` block; an empty name emits no `name` line.
    pub fn vlan(mut self, id: u16, name: &str) -> Self {
        let mut block = format!("vlan {}\n", id);
        if !name.is_empty() {
            block.push_str(&format!(" name {}\n", name));
        }
        self.blocks.push(block);
        self
    }

    /// Adds an `interface <name>` block with the given sub-mode lines.
    pub fn interface<I, S>(mut self, name: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blocks.push(sub_block(&format!("interface {}", name), lines));
        self
    }

    /// Adds a global `ip route` statement.
    pub fn route(mut self, prefix: &str, mask: &str, next_hop: &str) -> Self {
        self.blocks
            .push(format!("ip route {} {} {}\n", prefix, mask, next_hop));
        self
    }

    /// Adds a `router eigrp <asn>` block with `network <addr> <wildcard>` lines.
    pub fn eigrp(mut self, asn: u32, networks: &[(&str, &str)]) -> Self {
        let lines = networks
            .iter()
            .map(|(address, wildcard)| format!("network {} {}", address, wildcard));
        self.blocks
            .push(sub_block(&format!("router eigrp {}", asn), lines));
        self
    }

    /// Renders the full output, with the banner and trailer a device prints.
    pub fn build(&self) -> String {
        let mut out = String::from("Building configuration...\n\nCurrent configuration : 1024 bytes\n!\nhostname sw1\n!\n");
        for block in &self.blocks {
            out.push_str(block);
            out.push_str("!\n");
        }
        out.push_str("end\n");
        out
    }
}

fn sub_block<I, S>(header: &str, lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut block = format!("{}\n", header);
    for line in lines {
        block.push(' ');
        block.push_str(line.as_ref());
        block.push('\n');
    }
    block
}

/// Common running-config fixtures
pub mod device_fixtures {
    use super::RunningConfigText;

    /// Access-layer switch: two VLANs, an access port, a trunk uplink and a
    /// routed port.
    pub fn access_switch() -> String {
        RunningConfigText::new()
            .vlan(10, "Engineering")
            .vlan(20, "Voice")
            .interface(
                "GigabitEthernet0/1",
                [
                    "description uplink",
                    "switchport trunk encapsulation dot1q",
                    "switchport trunk allowed vlan 10,20",
                    "switchport mode trunk",
                ],
            )
            .interface(
                "GigabitEthernet0/2",
                [
                    "switchport access vlan 10",
                    "switchport mode access",
                    "spanning-tree portfast",
                    "spanning-tree bpduguard enable",
                ],
            )
            .interface(
                "GigabitEthernet0/3",
                [
                    "no switchport",
                    "ip address 10.0.12.1 255.255.255.252",
                ],
            )
            .build()
    }

    /// Branch router: routed interfaces, EIGRP and a default route.
    pub fn branch_router() -> String {
        RunningConfigText::new()
            .interface(
                "GigabitEthernet0/0",
                [
                    "description WAN",
                    "ip address 192.0.2.2 255.255.255.252",
                ],
            )
            .interface(
                "GigabitEthernet0/1",
                [
                    "description LAN",
                    "ip address 10.10.0.1 255.255.255.0",
                    "ip helper-address 10.0.0.53",
                ],
            )
            .eigrp(100, &[("10.10.0.0", "0.0.0.255"), ("192.0.2.0", "0.0.0.3")])
            .route("0.0.0.0", "0.0.0.0", "192.0.2.1")
            .build()
    }

    /// A device with nothing the managers model.
    pub fn empty_device() -> String {
        RunningConfigText::new().build()
    }
}
