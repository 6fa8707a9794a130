//! Small formatting and identifier helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use time::OffsetDateTime;

/// Stacks principal: `S` + network version char + c32check body.
static STACKS_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^S[PMTN][0-9A-HJKMNP-TV-Z]{38,39}$").expect("valid regex"));

/// Check whether `address` looks like a standard Stacks principal.
pub fn is_stacks_address(address: &str) -> bool {
    STACKS_ADDRESS.is_match(address)
}

/// Shorten an address for display: first 6 chars, `...`, last 4.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Format a volume figure the way market cards show it ($1.2M, $45K, $900).
pub fn format_volume(volume: Decimal) -> String {
    let million = Decimal::new(1_000_000, 0);
    let thousand = Decimal::new(1_000, 0);

    if volume >= million {
        let v = (volume / million).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("${:.1}M", v)
    } else if volume >= thousand {
        let v = (volume / thousand).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("${}K", v)
    } else {
        format!("${}", volume.normalize())
    }
}

/// Current Unix time in milliseconds.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Opaque timestamp-derived identifier, e.g. `tx-1718000000000`.
pub fn timestamp_id(prefix: &str) -> String {
    format!("{}-{}", prefix, now_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn short_address_keeps_head_and_tail() {
        assert_eq!(
            short_address("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7"),
            "SP2J6Z...9EJ7"
        );
        assert_eq!(short_address("SP12"), "SP12");
    }

    #[test]
    fn short_address_counts_characters_not_bytes() {
        assert_eq!(short_address("aéééééé-creator"), "aééééé...ator");
        assert_eq!(short_address("aßßßatoshi-Nakamoto"), "aßßßat...moto");
        // Ten characters but more than ten bytes stays whole.
        assert_eq!(short_address("ééééééééé!"), "ééééééééé!");
    }

    #[test]
    fn format_volume_buckets() {
        assert_eq!(format_volume(dec!(2_450_000)), "$2.5M");
        assert_eq!(format_volume(dec!(125_400)), "$125K");
        assert_eq!(format_volume(dec!(999)), "$999");
        assert_eq!(format_volume(dec!(12.50)), "$12.5");
    }

    #[test]
    fn stacks_address_validation() {
        assert!(is_stacks_address("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7"));
        assert!(is_stacks_address("SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE"));
        // I, L, O and U are not in the c32 alphabet.
        assert!(!is_stacks_address("SP1A2B3C4D5E6F7G8H9I0J1K2L3M4N5O6P7Q8R9S"));
        assert!(!is_stacks_address("0xMOCK000000000000000000000000000000000001"));
        assert!(!is_stacks_address(""));
    }

    #[test]
    fn timestamp_id_has_prefix() {
        let id = timestamp_id("tx");
        assert!(id.starts_with("tx-"));
        assert!(id["tx-".len()..].parse::<i64>().is_ok());
    }
}
