use std::fmt;
use std::str::FromStr;

/// Bullet syntax recognised as a renumberable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Grammar {
    /// `  - [` bullets, numbered (`[TS 1.02]`) or bare (`[TS]`).
    #[default]
    General,
    /// `  - [[TS ` bullets that already carry a number.
    DoubleBracket,
}

impl Grammar {
    pub const ALL: &'static [Grammar] = &[Grammar::General, Grammar::DoubleBracket];

    pub fn bullet_prefix(self) -> &'static str {
        match self {
            Grammar::General => "  - [",
            Grammar::DoubleBracket => "  - [[TS ",
        }
    }

    /// Placeholder that marks a bullet without a number yet, if the grammar has one.
    pub fn bare_prefix(self) -> Option<&'static str> {
        match self {
            Grammar::General => Some("  - [TS]"),
            Grammar::DoubleBracket => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grammar::General => "general",
            Grammar::DoubleBracket => "double-bracket",
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grammar {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "general" => Ok(Grammar::General),
            "double-bracket" => Ok(Grammar::DoubleBracket),
            _ => Err(()),
        }
    }
}
