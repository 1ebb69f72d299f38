use std::str::FromStr;

use crate::model::leave_application::LeaveStatus;

/// Whether `setStatus` checks the approval chain.
///
/// `Permissive` accepts any target status, which is what deployed clients rely
/// on (an HOD can approve a leave the advisor never saw). `Strict` only
/// accepts edges in [`TRANSITIONS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transition policy `{0}` (expected `strict` or `permissive`)")]
pub struct UnknownPolicy(pub String);

impl FromStr for TransitionPolicy {
    type Err = UnknownPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(TransitionPolicy::Permissive),
            "strict" => Ok(TransitionPolicy::Strict),
            _ => Err(UnknownPolicy(value.to_string())),
        }
    }
}

/// Legal edges of the approval chain. Nothing leads back to `Pending`, and
/// `HOD Approved` / `Rejected` are terminal.
pub const TRANSITIONS: [(LeaveStatus, LeaveStatus); 4] = [
    (LeaveStatus::Pending, LeaveStatus::AdvisorApproved),
    (LeaveStatus::Pending, LeaveStatus::Rejected),
    (LeaveStatus::AdvisorApproved, LeaveStatus::HodApproved),
    (LeaveStatus::AdvisorApproved, LeaveStatus::Rejected),
];

pub fn is_legal(from: LeaveStatus, to: LeaveStatus) -> bool {
    TRANSITIONS.contains(&(from, to))
}

impl TransitionPolicy {
    pub fn allows(self, from: LeaveStatus, to: LeaveStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => is_legal(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for status in LeaveStatus::ALL {
            let outgoing = TRANSITIONS.iter().filter(|(from, _)| *from == status).count();
            assert_eq!(status.is_terminal(), outgoing == 0, "{status}");
        }
    }

    #[test]
    fn nothing_returns_to_pending() {
        for status in LeaveStatus::ALL {
            assert!(!is_legal(status, LeaveStatus::Pending));
        }
    }

    #[test]
    fn strict_follows_the_table_and_permissive_allows_everything() {
        assert!(TransitionPolicy::Strict.allows(LeaveStatus::Pending, LeaveStatus::AdvisorApproved));
        assert!(!TransitionPolicy::Strict.allows(LeaveStatus::Pending, LeaveStatus::HodApproved));
        assert!(!TransitionPolicy::Strict.allows(LeaveStatus::Rejected, LeaveStatus::AdvisorApproved));
        assert!(TransitionPolicy::Permissive.allows(LeaveStatus::Pending, LeaveStatus::HodApproved));
        assert!(TransitionPolicy::Permissive.allows(LeaveStatus::HodApproved, LeaveStatus::Pending));
    }

    #[test]
    fn policy_parses_from_config_values() {
        assert_eq!("STRICT".parse(), Ok(TransitionPolicy::Strict));
        assert_eq!("permissive".parse(), Ok(TransitionPolicy::Permissive));
        assert!("lenient".parse::<TransitionPolicy>().is_err());
    }
}
