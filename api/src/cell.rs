use std::fmt;

/// Upper bound accepted by a goals input.
pub const MAX_GOALS: i64 = 999;

/// One goals input, interpreted from whatever was typed into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCell {
    /// Untouched or cleared.
    Blank,
    /// Any integer, including out-of-range ones; the validator decides.
    Goals(i64),
    /// Present but not an integer.
    Malformed,
}

impl ScoreCell {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return ScoreCell::Blank;
        }
        raw.parse::<i64>()
            .map(ScoreCell::Goals)
            .unwrap_or(ScoreCell::Malformed)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ScoreCell::Blank)
    }

    pub fn is_present(&self) -> bool {
        !self.is_blank()
    }

    /// The recordable value, if the cell holds one in `0..=MAX_GOALS`.
    pub fn goals(&self) -> Option<u16> {
        match *self {
            ScoreCell::Goals(n) if (0..=MAX_GOALS).contains(&n) => u16::try_from(n).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ScoreCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreCell::Goals(n) => write!(f, "{n}"),
            ScoreCell::Blank | ScoreCell::Malformed => f.write_str("-"),
        }
    }
}

/// Initial text of an input for a stored value. Zero is a real score.
pub fn score_string(goals: Option<u16>) -> String {
    goals.map(|g| g.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_blank_zero_and_junk() {
        assert_eq!(ScoreCell::parse(""), ScoreCell::Blank);
        assert_eq!(ScoreCell::parse("   "), ScoreCell::Blank);
        assert_eq!(ScoreCell::parse("0"), ScoreCell::Goals(0));
        assert_eq!(ScoreCell::parse(" 12 "), ScoreCell::Goals(12));
        assert_eq!(ScoreCell::parse("-1"), ScoreCell::Goals(-1));
        assert_eq!(ScoreCell::parse("2.5"), ScoreCell::Malformed);
        assert_eq!(ScoreCell::parse("two"), ScoreCell::Malformed);
    }

    #[test]
    fn goals_only_for_recordable_values() {
        assert_eq!(ScoreCell::Goals(0).goals(), Some(0));
        assert_eq!(ScoreCell::Goals(999).goals(), Some(999));
        assert_eq!(ScoreCell::Goals(1000).goals(), None);
        assert_eq!(ScoreCell::Goals(-3).goals(), None);
        assert_eq!(ScoreCell::Blank.goals(), None);
    }

    #[test]
    fn zero_renders_as_zero_not_empty() {
        assert_eq!(score_string(Some(0)), "0");
        assert_eq!(score_string(None), "");
        assert_eq!(ScoreCell::Goals(0).to_string(), "0");
        assert_eq!(ScoreCell::Blank.to_string(), "-");
        assert_eq!(ScoreCell::Malformed.to_string(), "-");
    }
}
