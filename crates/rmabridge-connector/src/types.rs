//! System ends and synchronization directions.

use serde::{Deserialize, Serialize};

/// Which of the two external systems a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemEnd {
    /// System A (the CRM-style ticket source).
    A,
    /// System B (the board-style work tracker).
    B,
}

impl SystemEnd {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemEnd::A => "a",
            SystemEnd::B => "b",
        }
    }

    /// The opposite end.
    #[must_use]
    pub fn opposite(&self) -> SystemEnd {
        match self {
            SystemEnd::A => SystemEnd::B,
            SystemEnd::B => SystemEnd::A,
        }
    }

    /// Human label for log lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SystemEnd::A => "System A",
            SystemEnd::B => "System B",
        }
    }
}

impl std::fmt::Display for SystemEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SystemEnd {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "system_a" => Ok(SystemEnd::A),
            "b" | "system_b" => Ok(SystemEnd::B),
            _ => Err(format!("Unknown system end: {s}")),
        }
    }
}

/// Direction of one reconciliation pass.
///
/// A full cycle runs [`SyncDirection::AToB`] followed by
/// [`SyncDirection::BToA`], each over freshly fetched record sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// System A to System B.
    AToB,
    /// System B to System A.
    BToA,
}

impl SyncDirection {
    /// The system whose records drive this pass.
    #[must_use]
    pub fn origin(&self) -> SystemEnd {
        match self {
            SyncDirection::AToB => SystemEnd::A,
            SyncDirection::BToA => SystemEnd::B,
        }
    }

    /// The system written to during this pass.
    #[must_use]
    pub fn target(&self) -> SystemEnd {
        self.origin().opposite()
    }

    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::AToB => "a_to_b",
            SyncDirection::BToA => "b_to_a",
        }
    }

    /// Human label for audit lines.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SyncDirection::AToB => "System A → System B",
            SyncDirection::BToA => "System B → System A",
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SyncDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a_to_b" => Ok(SyncDirection::AToB),
            "b_to_a" => Ok(SyncDirection::BToA),
            _ => Err(format!("Unknown sync direction: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_endpoints() {
        assert_eq!(SyncDirection::AToB.origin(), SystemEnd::A);
        assert_eq!(SyncDirection::AToB.target(), SystemEnd::B);
        assert_eq!(SyncDirection::BToA.origin(), SystemEnd::B);
        assert_eq!(SyncDirection::BToA.target(), SystemEnd::A);
    }

    #[test]
    fn test_round_trip() {
        for dir in [SyncDirection::AToB, SyncDirection::BToA] {
            assert_eq!(dir.as_str().parse::<SyncDirection>().unwrap(), dir);
        }
        for end in [SystemEnd::A, SystemEnd::B] {
            assert_eq!(end.as_str().parse::<SystemEnd>().unwrap(), end);
        }
    }

    #[test]
    fn test_opposite() {
        assert_eq!(SystemEnd::A.opposite(), SystemEnd::B);
        assert_eq!(SystemEnd::B.opposite(), SystemEnd::A);
    }
}
