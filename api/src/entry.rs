use crate::cell::{ScoreCell, score_string};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which leg an input belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Home,
    Away,
    Neutral,
}

impl Role {
    fn prefix(self) -> &'static str {
        match self {
            Role::Home => "home",
            Role::Away => "away",
            Role::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    For,
    Against,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::For => Side::Against,
            Side::Against => Side::For,
        }
    }
}

/// Identifies one goals input. `index` is the fixture slot (knockout) or the
/// opponent's roster index (league).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub role: Role,
    pub side: Side,
    pub index: usize,
}

impl FieldKey {
    pub fn new(role: Role, side: Side, index: usize) -> Self {
        Self { role, side, index }
    }

    pub fn goals_for(role: Role, index: usize) -> Self {
        Self::new(role, Side::For, index)
    }

    pub fn goals_against(role: Role, index: usize) -> Self {
        Self::new(role, Side::Against, index)
    }

    /// The other half of the same leg.
    pub fn counterpart(self) -> Self {
        Self { side: self.side.opposite(), ..self }
    }
}

/// Legacy form-field id, e.g. `homeGoalsFor3`.
impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::For => "For",
            Side::Against => "Against",
        };
        write!(f, "{}Goals{side}{}", self.role.prefix(), self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFieldKeyError(pub String);

impl fmt::Display for ParseFieldKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a score field id: {:?}", self.0)
    }
}

impl std::error::Error for ParseFieldKeyError {}

impl FromStr for FieldKey {
    type Err = ParseFieldKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFieldKeyError(s.to_owned());

        let (role, rest) = [Role::Home, Role::Away, Role::Neutral]
            .into_iter()
            .find_map(|role| s.strip_prefix(role.prefix()).map(|rest| (role, rest)))
            .ok_or_else(err)?;
        let rest = rest.strip_prefix("Goals").ok_or_else(err)?;
        let (side, digits) = if let Some(digits) = rest.strip_prefix("For") {
            (Side::For, digits)
        } else if let Some(digits) = rest.strip_prefix("Against") {
            (Side::Against, digits)
        } else {
            return Err(err());
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let index = digits.parse().map_err(|_| err())?;
        Ok(FieldKey { role, side, index })
    }
}

/// Raw text of every input in an open entry view. Lives only as long as the
/// view; nothing here is ever persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEntry {
    fields: BTreeMap<FieldKey, String>,
}

impl PendingEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both inputs of a leg with their stored values.
    pub fn seed_leg(
        &mut self,
        role: Role,
        index: usize,
        goals_for: Option<u16>,
        goals_against: Option<u16>,
    ) {
        self.fields
            .insert(FieldKey::goals_for(role, index), score_string(goals_for));
        self.fields
            .insert(FieldKey::goals_against(role, index), score_string(goals_against));
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn set(&mut self, key: FieldKey, raw: impl Into<String>) {
        self.fields.insert(key, raw.into());
    }

    /// Missing fields read as empty, the same as an untouched input.
    pub fn raw(&self, key: FieldKey) -> &str {
        self.fields.get(&key).map(String::as_str).unwrap_or_default()
    }

    pub fn cell(&self, key: FieldKey) -> ScoreCell {
        ScoreCell::parse(self.raw(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
