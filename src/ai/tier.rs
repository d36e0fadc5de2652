use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Skill tier requested by the caller, weakest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Beginner,
        Tier::Easy,
        Tier::Medium,
        Tier::Hard,
        Tier::Expert,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tier::Beginner => "beginner",
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
            Tier::Expert => "expert",
        }
    }

    /// Built-in search settings for this tier.
    pub fn default_config(self) -> TierConfig {
        let (depth, blunder_rate, opening_book, strategic, safety_check) = match self {
            Tier::Beginner => (1, 0.35, false, false, false),
            Tier::Easy => (3, 0.15, false, false, true),
            Tier::Medium => (5, 0.0, false, false, true),
            Tier::Hard => (7, 0.0, true, false, true),
            Tier::Expert => (8, 0.0, true, true, true),
        };
        TierConfig {
            depth,
            blunder_rate,
            opening_book,
            strategic,
            safety_check,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownTier(s.to_string()))
    }
}

/// Search settings for one tier.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TierConfig {
    /// Iterative deepening limit in plies
    pub depth: usize,
    /// Probability of replacing the search with a random legal move
    pub blunder_rate: f64,
    /// Consult the opening book in the first few plies
    pub opening_book: bool,
    /// Use the parity threat rules at the leaves and threat-aware root order
    pub strategic: bool,
    /// Avoid moves that let the opponent win on top of them
    pub safety_check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_get_stronger() {
        let configs: Vec<TierConfig> = Tier::ALL.iter().map(|t| t.default_config()).collect();
        for pair in configs.windows(2) {
            assert!(pair[0].depth < pair[1].depth);
            assert!(pair[0].blunder_rate >= pair[1].blunder_rate);
        }
        assert!(Tier::Beginner < Tier::Expert);
    }

    #[test]
    fn only_weak_tiers_blunder() {
        for tier in Tier::ALL {
            let config = tier.default_config();
            let weak = matches!(tier, Tier::Beginner | Tier::Easy);
            assert_eq!(config.blunder_rate > 0.0, weak, "{tier}");
        }
        assert!(Tier::Expert.default_config().strategic);
        assert!(!Tier::Hard.default_config().strategic);
        assert!(Tier::Hard.default_config().opening_book);
        assert!(!Tier::Beginner.default_config().safety_check);
    }

    #[test]
    fn parse_tier_names() {
        assert_eq!("expert".parse::<Tier>().unwrap(), Tier::Expert);
        assert_eq!(" Medium ".parse::<Tier>().unwrap(), Tier::Medium);
        assert!(matches!(
            "grandmaster".parse::<Tier>(),
            Err(ConfigError::UnknownTier(name)) if name == "grandmaster"
        ));
        for tier in Tier::ALL {
            assert_eq!(tier.to_string().parse::<Tier>().unwrap(), tier);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Tier::Hard).unwrap(), "\"hard\"");
        let tier: Tier = serde_json::from_str("\"beginner\"").unwrap();
        assert_eq!(tier, Tier::Beginner);
    }
}
