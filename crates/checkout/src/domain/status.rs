/// The externally visible phase of a purchase attempt.
///
/// Transitions are strictly forward except into [`PurchaseStatus::Error`],
/// which is terminal for the attempt and reachable from any non-terminal
/// state. A new attempt requires a reset back to [`PurchaseStatus::Idle`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PurchaseStatus {
    #[default]
    Idle,
    /// Resolving the token descriptor or requesting order preparation.
    Preparing,
    /// Reading the current ERC-20 allowance from chain.
    CheckingAllowance,
    /// The wallet is showing the approval request to the user.
    AwaitingApproval,
    /// Waiting for the approval transaction to confirm.
    ConfirmingApproval,
    /// The wallet is showing the settlement transaction to the user.
    AwaitingSignature,
    /// Waiting for the settlement transaction to confirm.
    Confirming,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_snake_case() {
        assert_eq!(PurchaseStatus::CheckingAllowance.to_string(), "checking_allowance");
        assert_eq!(PurchaseStatus::AwaitingApproval.to_string(), "awaiting_approval");
        assert_eq!(PurchaseStatus::Idle.to_string(), "idle");
    }
}
