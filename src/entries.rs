//! Reading raw score inputs and rosters from the command line and files.

use anyhow::{Context, Result, anyhow, bail};
use fixture_api::Team;
use fixture_api::entry::FieldKey;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// `homeGoalsFor0=2`. The value is kept verbatim, blank included.
pub fn parse_assignment(arg: &str) -> Result<(FieldKey, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got {arg:?}"))?;
    let key = key.trim().parse::<FieldKey>()?;
    Ok((key, value.to_owned()))
}

/// A JSON object of field id to raw text. Numbers and nulls are accepted
/// as a convenience; null means blank.
pub fn parse_entries(json: &str) -> Result<Vec<(FieldKey, String)>> {
    let raw: BTreeMap<String, Value> =
        serde_json::from_str(json).context("entries must be a JSON object of field ids")?;
    raw.into_iter()
        .map(|(key, value)| {
            let field = key.parse::<FieldKey>()?;
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Null => String::new(),
                other => bail!("{key}: expected text, got {other}"),
            };
            Ok((field, text))
        })
        .collect()
}

pub fn load_entries(path: &Path) -> Result<Vec<(FieldKey, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read entries from {}", path.display()))?;
    parse_entries(&content).with_context(|| format!("in {}", path.display()))
}

/// A JSON array of `{ "teamName": .., "playerName": .. }`.
pub fn load_roster(path: &Path) -> Result<Vec<Team>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read roster from {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid roster in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_api::entry::Role;

    #[test]
    fn assignment_keeps_value_verbatim() {
        assert_eq!(
            parse_assignment("awayGoalsAgainst2= 3").unwrap(),
            (FieldKey::goals_against(Role::Away, 2), " 3".to_owned())
        );
        assert_eq!(
            parse_assignment("homeGoalsFor0=").unwrap(),
            (FieldKey::goals_for(Role::Home, 0), String::new())
        );
        assert!(parse_assignment("homeGoalsFor0").is_err());
        assert!(parse_assignment("goals=1").is_err());
    }

    #[test]
    fn entries_accept_strings_numbers_and_nulls() {
        let entries = parse_entries(
            r#"{"neutralGoalsFor0": "2", "neutralGoalsAgainst0": 1, "neutralGoalsFor2": null}"#,
        )
        .unwrap();
        assert_eq!(
            entries,
            vec![
                (FieldKey::goals_against(Role::Neutral, 0), "1".to_owned()),
                (FieldKey::goals_for(Role::Neutral, 0), "2".to_owned()),
                (FieldKey::goals_for(Role::Neutral, 2), String::new()),
            ]
        );
    }

    #[test]
    fn entries_reject_unknown_ids_and_nested_values() {
        assert!(parse_entries(r#"{"score": "1"}"#).is_err());
        assert!(parse_entries(r#"{"homeGoalsFor0": [1]}"#).is_err());
        assert!(parse_entries(r#"["homeGoalsFor0"]"#).is_err());
    }
}
