//! Registration status values.

use serde::{Deserialize, Serialize};

/// Processing status of a citizen's registration.
///
/// Stored as lower-case text in `registrations.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Submitted, awaiting review.
    #[default]
    Pending,
    /// Reviewed and accepted.
    Approved,
    /// Reviewed and declined.
    Rejected,
    /// Fee collected and registration finalised.
    Completed,
}

impl RegistrationStatus {
    /// All statuses in workflow order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Completed,
    ];

    /// Human-readable label for templates.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid registration status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in RegistrationStatus::ALL {
            assert_eq!(status.to_string().parse::<RegistrationStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(RegistrationStatus::default(), RegistrationStatus::Pending);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("Pending".parse::<RegistrationStatus>().is_err());
        assert!("".parse::<RegistrationStatus>().is_err());
    }
}
