//! Command Filter: turns codec output into the batch sent to the device.

/// Comment / block separator in IOS configuration text.
pub const SEPARATOR: char = '!';

/// Splits command text into lines, trims each one and drops blank lines
/// and `!` comment lines. Order is preserved.
///
/// ```
/// use ios_cfgmgr_common::filter_commands;
///
/// assert_eq!(
///     filter_commands("  vlan 10 \n!\n name Eng\n"),
///     vec!["vlan 10".to_string(), "name Eng".to_string()]
/// );
/// ```
pub fn filter_commands(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(SEPARATOR))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_separator_dropped_and_trimmed() {
        assert_eq!(
            filter_commands("  vlan 10 \n!\n name Eng\n"),
            vec!["vlan 10", "name Eng"]
        );
    }

    #[test]
    fn test_blank_lines_dropped() {
        assert_eq!(
            filter_commands("interface Gi0/1\n\n   \n no shutdown\r\n!\n"),
            vec!["interface Gi0/1", "no shutdown"]
        );
    }

    #[test]
    fn test_comment_lines_dropped() {
        assert_eq!(
            filter_commands("! generated\nrouter eigrp 1\n !\n network 10.0.0.0 0.255.255.255"),
            vec!["router eigrp 1", "network 10.0.0.0 0.255.255.255"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_commands("").is_empty());
        assert!(filter_commands("!\n!\n").is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let text = "no ip route 10.0.0.0 255.0.0.0 1.1.1.1\nip route 10.0.0.0 255.0.0.0 2.2.2.2\n";
        assert_eq!(
            filter_commands(text),
            vec![
                "no ip route 10.0.0.0 255.0.0.0 1.1.1.1",
                "ip route 10.0.0.0 255.0.0.0 2.2.2.2"
            ]
        );
    }
}
