use crate::cell::{MAX_GOALS, ScoreCell};
use crate::entry::{FieldKey, PendingEntry, Role};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Negative,
    Malformed,
    TooLarge,
    /// One side of a leg entered, the other blank. The blank side is at fault.
    Incomplete,
}

impl ViolationKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ViolationKind::Negative => "score cannot be negative",
            ViolationKind::Malformed => "score must be a whole number",
            ViolationKind::TooLarge => "score is out of range",
            ViolationKind::Incomplete => "both scores of a match are required",
        }
    }
}

/// A rejected input and the cell to flag for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub field: FieldKey,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind.describe())
    }
}

impl std::error::Error for Violation {}

fn own_fault(value: ScoreCell) -> Option<ViolationKind> {
    match value {
        ScoreCell::Goals(n) if n < 0 => Some(ViolationKind::Negative),
        ScoreCell::Goals(n) if n > MAX_GOALS => Some(ViolationKind::TooLarge),
        ScoreCell::Malformed => Some(ViolationKind::Malformed),
        ScoreCell::Goals(_) | ScoreCell::Blank => None,
    }
}

/// `true` when `value` cannot be submitted next to `opposing`.
///
/// A blank value is never invalid by itself: a fully blank leg just means
/// "no result yet".
pub fn is_invalid(value: ScoreCell, opposing: ScoreCell) -> bool {
    own_fault(value).is_some() || (value.is_present() && opposing.is_blank())
}

/// Check one input against its counterpart. The returned violation names the
/// cell to flag, which is the counterpart for an incomplete leg.
pub fn check_field(entry: &PendingEntry, key: FieldKey) -> Result<(), Violation> {
    let value = entry.cell(key);
    if let Some(kind) = own_fault(value) {
        return Err(Violation { field: key, kind });
    }
    let counterpart = key.counterpart();
    if value.is_present() && entry.cell(counterpart).is_blank() {
        return Err(Violation { field: counterpart, kind: ViolationKind::Incomplete });
    }
    Ok(())
}

/// Goals-for first, then goals-against; stops at the first violation.
pub fn check_leg(entry: &PendingEntry, role: Role, index: usize) -> Result<(), Violation> {
    check_field(entry, FieldKey::goals_for(role, index))?;
    check_field(entry, FieldKey::goals_against(role, index))
}
