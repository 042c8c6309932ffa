use serde::{Deserialize, Serialize};

/// Processing path of a routed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Local tier only
    Local,
    /// Local tier plus remote verification
    Hybrid,
    /// Full remote consultation
    Remote,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Local => "local",
            Tier::Hybrid => "hybrid",
            Tier::Remote => "remote",
        }
    }

    /// Whether this tier needs the remote side.
    pub fn needs_remote(&self) -> bool {
        !matches!(self, Tier::Local)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Tier::Hybrid).unwrap(), r#""hybrid""#);
        assert!(Tier::Remote.needs_remote());
        assert!(!Tier::Local.needs_remote());
    }
}
