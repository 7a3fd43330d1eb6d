use alloy_primitives::{
    utils::{format_ether, parse_ether},
    Address, U256,
};

/// `0x1234...abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// `0x1234...`, used where only a hint of the holder is needed.
pub fn address_prefix(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...", &full[..6])
}

/// Wei as ether with trailing zeros dropped, always keeping one decimal.
pub fn ether(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => format!("{formatted}.0"),
    }
}

/// Parses an operator typed ether amount into wei.
pub fn parse_ether_input(input: &str) -> Option<U256> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    parse_ether(input).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn addresses_are_shortened() {
        let a = address!("0x1234567890123456789012345678901234567890");
        assert_eq!(short_address(&a), "0x1234...7890");
        assert_eq!(address_prefix(&a), "0x1234...");
    }

    #[test]
    fn ether_drops_trailing_zeros() {
        assert_eq!(ether(U256::from(10_000_000_000_000_000u64)), "0.01");
        assert_eq!(ether(U256::from(2_000_000_000_000_000_000u64)), "2.0");
        assert_eq!(ether(U256::ZERO), "0.0");
    }

    #[test]
    fn ether_input_round_trips_to_wei() {
        assert_eq!(
            parse_ether_input(" 0.05 "),
            Some(U256::from(50_000_000_000_000_000u64))
        );
        assert_eq!(parse_ether_input(""), None);
        assert_eq!(parse_ether_input("abc"), None);
    }
}
