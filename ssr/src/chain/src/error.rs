use alloy_primitives::TxHash;
use alloy_sol_types::{Revert, SolError};

/// EIP-1193 code a wallet returns when its holder declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

const REVERT_PREFIX: &str = "execution reverted";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("user rejected the request")]
    Rejected,
    #[error("transaction reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted { reason: Option<String> },
    #[error("{0}")]
    Network(String),
    #[error("timed out waiting for transaction {0}")]
    Timeout(TxHash),
    #[error("unexpected contract response: {0}")]
    Decode(String),
    #[error("no wallet account available")]
    NoAccount,
}

impl ChainError {
    /// Classifies a JSON-RPC style failure.
    ///
    /// Both the local-key RPC transport and the browser wallet surface errors
    /// as a `(code, message, data)` triple, so they share this mapping.
    pub fn from_rpc_parts(code: Option<i64>, message: &str, revert_data: Option<&[u8]>) -> Self {
        if code == Some(USER_REJECTED_CODE) {
            return Self::Rejected;
        }
        if let Some(data) = revert_data {
            return Self::Reverted {
                reason: Revert::abi_decode(data).ok().map(|r| r.reason),
            };
        }
        if let Some(reason) = revert_reason_from_message(message) {
            return Self::Reverted { reason };
        }
        Self::Network(message.to_string())
    }

    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Reverted { .. })
    }

    /// The contract supplied revert reason, if there is one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Reverted { reason } => reason.as_deref(),
            _ => None,
        }
    }

    /// Reason when the contract gave one, the display message otherwise.
    pub fn reason_or_message(&self) -> String {
        self.reason()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

/// `Some(reason)` when the message describes a revert.
///
/// Nodes phrase reverts as `execution reverted` optionally followed by
/// `: <reason>`, sometimes nested inside a longer wallet message.
fn revert_reason_from_message(message: &str) -> Option<Option<String>> {
    let idx = message.find(REVERT_PREFIX)?;
    let rest = message[idx + REVERT_PREFIX.len()..].trim_start();
    let reason = rest
        .strip_prefix(':')
        .map(|r| r.trim().trim_matches('"').to_string())
        .filter(|r| !r.is_empty());
    Some(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_rejection_code_wins() {
        let err = ChainError::from_rpc_parts(Some(4001), "User denied transaction signature", None);
        assert_eq!(err, ChainError::Rejected);
    }

    #[test]
    fn reason_is_extracted_from_node_message() {
        let err = ChainError::from_rpc_parts(
            Some(-32000),
            "execution reverted: Tournament not ready",
            None,
        );
        assert_eq!(err.reason(), Some("Tournament not ready"));
        assert!(err.is_revert());
    }

    #[test]
    fn bare_revert_has_no_reason() {
        let err = ChainError::from_rpc_parts(Some(3), "execution reverted", None);
        assert_eq!(err, ChainError::Reverted { reason: None });
        assert_eq!(err.to_string(), "transaction reverted: no reason given");
    }

    #[test]
    fn revert_data_is_decoded() {
        let data = Revert {
            reason: "Already canceled".into(),
        }
        .abi_encode();
        let err = ChainError::from_rpc_parts(Some(3), "execution reverted", Some(&data));
        assert_eq!(err.reason(), Some("Already canceled"));
    }

    #[test]
    fn other_failures_are_network_errors() {
        let err = ChainError::from_rpc_parts(None, "connection refused", None);
        assert_eq!(err, ChainError::Network("connection refused".into()));
        assert_eq!(err.reason_or_message(), "connection refused");
    }
}
