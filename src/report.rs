//! Plain-text views of a knockout round and a league team sheet.

use fixture_api::aggregate::{TieAggregate, TieSide, displayed_leg};
use fixture_api::entry::{FieldKey, Role};
use fixture_api::pairing::{EMPTY_SLOT, StructuralError, check_round, pairs_of, resolve_pair};
use fixture_api::{Fixtures, LegResult, Tournament};

fn goals(value: Option<u16>) -> String {
    value.map_or_else(|| "-".to_owned(), |g| g.to_string())
}

fn leg(result: (Option<u16>, Option<u16>)) -> String {
    match result {
        (None, None) => "not played".to_owned(),
        (left, right) => format!("{}-{}", goals(left), goals(right)),
    }
}

fn inputs(role: Role, index: usize) -> String {
    format!("[{} {}]", FieldKey::goals_for(role, index), FieldKey::goals_against(role, index))
}

pub fn knockout_round_lines(
    tournament: &Tournament,
    fixtures: &Fixtures,
    round: usize,
) -> Result<Vec<String>, StructuralError> {
    let slots = fixtures.round(round).ok_or(StructuralError::UnknownRound(round))?;
    check_round(slots, &tournament.teams)?;

    let status = match tournament.current_round {
        Some(current) if current == round => "open",
        _ => "closed",
    };
    let mut lines = vec![format!(
        "{} - round {} ({status}, {})",
        tournament.name,
        round + 1,
        if tournament.use_two_legs { "two legs" } else { "single match" }
    )];

    for pair in pairs_of(slots) {
        let pairing = resolve_pair(pair.first, slots, &tournament.teams)?;
        if pair.first.is_empty && pair.second.is_empty {
            lines.push(format!("  {EMPTY_SLOT} vs {EMPTY_SLOT}"));
            continue;
        }
        if pair.is_bye() {
            let advancing = if pair.first.is_empty {
                resolve_pair(pair.second, slots, &tournament.teams)?.first_team
            } else {
                pairing.first_team
            };
            lines.push(format!("  {advancing} advances (bye)"));
            continue;
        }

        lines.push(format!("  {} vs {}", pairing.first_team, pairing.second_team));
        let tie = if tournament.use_two_legs {
            let first_home = displayed_leg(Role::Home, &pair.first.home);
            let second_home = displayed_leg(Role::Away, &pair.first.away);
            lines.push(format!(
                "    leg 1 at {}: {}  {}",
                pairing.first_team,
                leg(first_home),
                inputs(Role::Home, pair.index)
            ));
            lines.push(format!(
                "    leg 2 at {}: {}  {}",
                pairing.second_team,
                leg(second_home),
                inputs(Role::Home, pair.index + 1)
            ));
            let second_score = LegResult { goals_for: second_home.0, goals_against: second_home.1 };
            TieAggregate::two_legs(pair.first.home.score(), second_score.score())
        } else {
            lines.push(format!(
                "    result: {}  {}",
                leg(displayed_leg(Role::Neutral, &pair.first.neutral)),
                inputs(Role::Neutral, pair.index)
            ));
            TieAggregate::single(pair.first.neutral.score())
        };

        if tie.is_complete() {
            let through = match tie.qualifier() {
                Some(TieSide::First) => pairing.first_team,
                Some(TieSide::Second) => pairing.second_team,
                None => "level",
            };
            lines.push(format!(
                "    aggregate {}-{}: {through}",
                tie.first_goals, tie.second_goals
            ));
        }
    }
    Ok(lines)
}

pub fn league_sheet_lines(
    tournament: &Tournament,
    fixtures: &Fixtures,
    team_index: usize,
) -> Result<Vec<String>, StructuralError> {
    let sheet = fixtures
        .team_sheet(team_index)
        .ok_or(StructuralError::UnknownTeam(team_index))?;
    fixture_api::collect::check_team_sheet(
        team_index,
        sheet,
        tournament.teams.len(),
        tournament.use_two_legs,
    )?;

    let team = &tournament.teams[team_index].team_name;
    let mut lines = vec![format!("{} - fixtures of {team}", tournament.name)];
    for (opponent, other) in tournament.teams.iter().enumerate() {
        if opponent == team_index {
            continue;
        }
        let name = &other.team_name;
        if tournament.use_two_legs {
            let (Some(home), Some(away)) = (sheet.home[opponent].result(), sheet.away[opponent].result())
            else {
                continue;
            };
            lines.push(format!(
                "  {team} v {name}: {}  {}",
                leg(displayed_leg(Role::Home, home)),
                inputs(Role::Home, opponent)
            ));
            lines.push(format!(
                "  {name} v {team}: {}  {}",
                leg(displayed_leg(Role::Away, away)),
                inputs(Role::Away, opponent)
            ));
        } else if let Some(neutral) = sheet.neutral[opponent].result() {
            lines.push(format!(
                "  {team} v {name}: {}  {}",
                leg(displayed_leg(Role::Neutral, neutral)),
                inputs(Role::Neutral, opponent)
            ));
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture_api::{FixtureSlot, LeagueLeg, Team, TeamFixtures};

    fn tournament(names: &[&str], use_two_legs: bool) -> Tournament {
        Tournament {
            name: "Cup".into(),
            use_two_legs,
            current_round: Some(0),
            teams: names
                .iter()
                .map(|n| Team { team_name: (*n).into(), player_name: String::new() })
                .collect(),
            ..Default::default()
        }
    }

    fn slot(team_index: usize, opponent_index: usize) -> FixtureSlot {
        FixtureSlot { team_index, opponent_index, ..Default::default() }
    }

    #[test]
    fn two_leg_tie_shows_both_hosts_and_aggregate() {
        let t = tournament(&["Reds", "Blues"], true);
        let mut first = slot(0, 1);
        first.home = LegResult::new(2, 1);
        first.away = LegResult::new(1, 0);
        let fixtures = Fixtures { knockout_rounds: vec![vec![first, slot(1, 0)]], ..Default::default() };

        let lines = knockout_round_lines(&t, &fixtures, 0).unwrap();
        assert_eq!(lines[0], "Cup - round 1 (open, two legs)");
        assert_eq!(lines[1], "  Reds vs Blues");
        assert_eq!(lines[2], "    leg 1 at Reds: 2-1  [homeGoalsFor0 homeGoalsAgainst0]");
        assert_eq!(lines[3], "    leg 2 at Blues: 0-1  [homeGoalsFor1 homeGoalsAgainst1]");
        assert_eq!(lines[4], "    aggregate 3-1: Reds");
    }

    #[test]
    fn byes_and_unplayed_ties() {
        let t = tournament(&["Reds", "Blues", "Greens"], false);
        let empty = FixtureSlot { opponent_index: 3, is_empty: true, ..Default::default() };
        let fixtures = Fixtures {
            knockout_rounds: vec![vec![slot(0, 1), slot(1, 0), empty, slot(2, 2)]],
            ..Default::default()
        };

        let lines = knockout_round_lines(&t, &fixtures, 0).unwrap();
        assert_eq!(
            lines[1..],
            [
                "  Reds vs Blues".to_owned(),
                "    result: not played  [neutralGoalsFor0 neutralGoalsAgainst0]".to_owned(),
                "  Greens advances (bye)".to_owned(),
            ]
        );
    }

    #[test]
    fn pair_of_empty_slots_advances_nobody() {
        let t = tournament(&["Reds", "Blues"], true);
        let fixtures = Fixtures {
            knockout_rounds: vec![vec![
                slot(0, 1),
                slot(1, 0),
                FixtureSlot { opponent_index: 3, is_empty: true, ..Default::default() },
                FixtureSlot { opponent_index: 2, is_empty: true, ..Default::default() },
            ]],
            ..Default::default()
        };

        let lines = knockout_round_lines(&t, &fixtures, 0).unwrap();
        assert_eq!(lines.last().map(String::as_str), Some("  (empty) vs (empty)"));
        assert!(lines.iter().all(|line| !line.contains("advances")));
    }

    #[test]
    fn league_sheet_lists_away_legs_host_first() {
        let t = tournament(&["Reds", "Blues"], true);
        let sheet = TeamFixtures {
            home: vec![LeagueLeg::SameTeam, LeagueLeg::Result(LegResult::new(1, 1))],
            away: vec![LeagueLeg::SameTeam, LeagueLeg::Result(LegResult::new(1, 3))],
            neutral: vec![],
        };
        let fixtures = Fixtures { league_fixtures: vec![sheet], ..Default::default() };

        let lines = league_sheet_lines(&t, &fixtures, 0).unwrap();
        assert_eq!(lines[1], "  Reds v Blues: 1-1  [homeGoalsFor1 homeGoalsAgainst1]");
        assert_eq!(lines[2], "  Blues v Reds: 3-1  [awayGoalsFor1 awayGoalsAgainst1]");
    }

    #[test]
    fn unknown_round_is_reported() {
        let t = tournament(&["Reds", "Blues"], false);
        assert_eq!(
            knockout_round_lines(&t, &Fixtures::default(), 2),
            Err(StructuralError::UnknownRound(2))
        );
    }
}
