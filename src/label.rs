use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacroLabel {
    Farm,
    Stack,
    Gank,
    Push,
    Defend,
    Teamfight,
    TakeRoshan,
    ContestRoshan,
    Siege,
}

impl MacroLabel {
    pub const DEFAULT: MacroLabel = MacroLabel::Farm;

    pub const ALL: [MacroLabel; 9] = [
        MacroLabel::Farm,
        MacroLabel::Stack,
        MacroLabel::Gank,
        MacroLabel::Push,
        MacroLabel::Defend,
        MacroLabel::Teamfight,
        MacroLabel::TakeRoshan,
        MacroLabel::ContestRoshan,
        MacroLabel::Siege,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroLabel::Farm => "FARM",
            MacroLabel::Stack => "STACK",
            MacroLabel::Gank => "GANK",
            MacroLabel::Push => "PUSH",
            MacroLabel::Defend => "DEFEND",
            MacroLabel::Teamfight => "TEAMFIGHT",
            MacroLabel::TakeRoshan => "TAKE_ROSHAN",
            MacroLabel::ContestRoshan => "CONTEST_ROSHAN",
            MacroLabel::Siege => "SIEGE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        MacroLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == normalized)
    }

    pub fn hint_text(&self) -> &'static str {
        match self {
            MacroLabel::Farm => "💰 Farm",
            MacroLabel::Stack => "📦 Stack",
            MacroLabel::Gank => "🗡️ Gank",
            MacroLabel::Push => "⚔️ Push",
            MacroLabel::Defend => "🛡️ Defend",
            MacroLabel::Teamfight => "💥 Teamfight",
            MacroLabel::TakeRoshan => "🐉 Take Roshan",
            MacroLabel::ContestRoshan => "👀 Contest Roshan",
            MacroLabel::Siege => "🏰 Siege",
        }
    }
}

impl Default for MacroLabel {
    fn default() -> Self {
        MacroLabel::DEFAULT
    }
}

impl fmt::Display for MacroLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
