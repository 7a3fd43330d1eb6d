//! Request bodies as the dashboard and scripts send them.
//!
//! Fields arrive as loosely typed JSON: ids and scores may be numbers or
//! strings. A field that is absent, `null`, `false`, `0` or `""` counts as
//! missing.

use chain::{Address, U256};
use serde::Deserialize;
use serde_json::Value;

pub fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Non-negative integer given as a JSON number, a decimal string or a
/// `0x` prefixed hex string.
pub fn parse_uint(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16).ok(),
                None => U256::from_str_radix(s, 10).ok(),
            }
        }
        _ => None,
    }
}

pub fn parse_tournament_id(value: &Value) -> Option<u64> {
    parse_uint(value).and_then(|id| u64::try_from(id).ok())
}

pub fn parse_address(value: &Value) -> Option<Address> {
    value.as_str()?.trim().parse().ok()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreBody {
    pub tournament_id: Option<Value>,
    pub player: Option<Value>,
    pub score: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentIdBody {
    pub tournament_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateGameBody {
    pub tournament_id: Option<Value>,
    pub players: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerScore {
    pub address: Value,
    pub score: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values_are_missing() {
        for v in [json!(null), json!(0), json!(""), json!(false)] {
            assert!(!is_present(&Some(v)));
        }
        assert!(!is_present(&None));
        assert!(is_present(&Some(json!("0"))));
        assert!(is_present(&Some(json!(3))));
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        assert_eq!(parse_tournament_id(&json!(4)), Some(4));
        assert_eq!(parse_tournament_id(&json!("4")), Some(4));
        assert_eq!(parse_tournament_id(&json!("0x10")), Some(16));
        assert_eq!(parse_tournament_id(&json!(-1)), None);
        assert_eq!(parse_tournament_id(&json!(1.5)), None);
        assert_eq!(parse_tournament_id(&json!("abc")), None);
    }

    #[test]
    fn scores_may_exceed_u64() {
        let big = "340282366920938463463374607431768211456";
        assert_eq!(parse_uint(&json!(big)), Some(U256::from(1u8) << 128));
    }

    #[test]
    fn addresses_must_be_hex_strings() {
        assert!(parse_address(&json!("0x00000000000000000000000000000000000000a1")).is_some());
        assert!(parse_address(&json!("alice")).is_none());
        assert!(parse_address(&json!(12)).is_none());
    }
}
