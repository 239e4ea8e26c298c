//! Advances the bracket to the next playoff round once every game in the
//! current round has been executed, re-seeding winners the way the NFL's
//! current format does (best surviving seed hosts the worst).

use log::info;

use crate::calendar::CalendarDate;
use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, TeamId};
use crate::store::events::{Event, EventType, GameKind, NewEvent};
use crate::store::txn::Txn;

use super::seeding_transition::{self, ConferenceSeeds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoffRoundKind {
    WildCard,
    Divisional,
    Conference,
}

impl PlayoffRoundKind {
    fn prefix_tag(self) -> &'static str {
        match self {
            PlayoffRoundKind::WildCard => "wc",
            PlayoffRoundKind::Divisional => "div",
            PlayoffRoundKind::Conference => "conf",
        }
    }

    fn next_kind(self) -> EventType {
        match self {
            PlayoffRoundKind::WildCard => EventType::Game(GameKind::Divisional),
            PlayoffRoundKind::Divisional => EventType::Game(GameKind::Conference),
            PlayoffRoundKind::Conference => EventType::Game(GameKind::SuperBowl),
        }
    }
}

struct Survivor {
    team_id: TeamId,
    seed: u16,
}

/// `None` until every game of the round has a result; `Some(())` once this
/// function has scheduled the next round. Returns the champion's team id
/// when called on the Conference round's Super Bowl output is instead
/// obtained via [`super::champion::crown_champion`].
pub fn advance_round(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    conference: &str,
    round: PlayoffRoundKind,
    bye_seed: Option<(TeamId, u16)>,
    next_round_date: CalendarDate,
) -> Result<bool> {
    let prefix = format!("{season}_{}_{conference}", round.prefix_tag());
    let games = txn.events_by_game_id_prefix(dynasty_id, &prefix)?;
    if games.is_empty() {
        return Err(DynastyError::invariant(format!(
            "no {conference} {:?} games found for season {season}",
            round
        )));
    }
    if games.iter().any(|g| !g.is_executed()) {
        return Ok(false);
    }

    let mut survivors: Vec<Survivor> = games.iter().filter_map(|g| winner_of(g)).collect();
    if let Some((team_id, seed)) = bye_seed {
        survivors.push(Survivor { team_id, seed });
    }
    survivors.sort_by_key(|s| s.seed);

    if survivors.len() == 1 {
        // Conference round just produced the conference champion; the
        // Super Bowl pairing needs the other conference's champion too, so
        // the caller (the year-transition orchestrator) schedules that game
        // once both conferences have resolved.
        return Ok(true);
    }

    let mut events = Vec::new();
    let half = survivors.len() / 2;
    for i in 0..half {
        let high = &survivors[i];
        let low = &survivors[survivors.len() - 1 - i];
        events.push(NewEvent {
            event_type: round.next_kind(),
            timestamp: next_round_date,
            synthetic_game_id: Some(format!(
                "{season}_{}_{conference}_{}_{}",
                PlayoffRoundKind::next_prefix(round),
                high.team_id,
                low.team_id
            )),
            parameters: serde_json::json!({
                "home_team": high.team_id.as_u8(),
                "away_team": low.team_id.as_u8(),
                "home_seed": high.seed,
                "away_seed": low.seed,
                "conference": conference,
                "is_division_game": false,
                "is_conference_game": true,
            }),
        });
    }
    txn.bulk_insert_events(&events)?;
    info!(
        "dynasty {dynasty_id} {conference} {:?} complete, scheduled {} games for next round",
        round,
        events.len()
    );
    Ok(true)
}

impl PlayoffRoundKind {
    fn next_prefix(self) -> &'static str {
        match self {
            PlayoffRoundKind::WildCard => "div",
            PlayoffRoundKind::Divisional => "conf",
            PlayoffRoundKind::Conference => "sb",
        }
    }
}

/// Re-derives both conferences' seeds — stable once the regular season ends,
/// since the executor only ever updates playoff-phase standings rows — and
/// advances whichever round has finished: schedules the next round, or, once
/// both conference championship games are done, schedules the Super Bowl.
/// Safe to call on every playoffs-phase day tick: each step is a no-op until
/// its round is fully executed and the next round hasn't been scheduled yet.
pub fn advance_playoffs(txn: &Txn<'_>, dynasty_id: &DynastyId, season: u16) -> Result<()> {
    let (afc_teams, nfc_teams) = seeding_transition::conference_division_pairs();
    let (afc_seeds, nfc_seeds) = seeding_transition::seed_both_conferences(
        txn, dynasty_id, season, &afc_teams, &nfc_teams,
    )?;

    advance_one_conference(txn, dynasty_id, season, &afc_seeds)?;
    advance_one_conference(txn, dynasty_id, season, &nfc_seeds)?;
    maybe_schedule_super_bowl(txn, dynasty_id, season, &afc_seeds, &nfc_seeds)
}

fn advance_one_conference(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    seeds: &ConferenceSeeds,
) -> Result<()> {
    let bye = (seeds.seeds[0], 1u16);
    try_advance_round(
        txn,
        dynasty_id,
        season,
        seeds.conference_name,
        PlayoffRoundKind::WildCard,
        Some(bye),
    )?;
    try_advance_round(
        txn,
        dynasty_id,
        season,
        seeds.conference_name,
        PlayoffRoundKind::Divisional,
        None,
    )?;
    Ok(())
}

fn try_advance_round(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    conference: &str,
    round: PlayoffRoundKind,
    bye_seed: Option<(TeamId, u16)>,
) -> Result<()> {
    let this_round_prefix = format!("{season}_{}_{conference}", round.prefix_tag());
    let games = txn.events_by_game_id_prefix(dynasty_id, &this_round_prefix)?;
    if games.is_empty() || games.iter().any(|g| !g.is_executed()) {
        return Ok(());
    }

    let next_prefix = format!("{season}_{}_{conference}", round.next_prefix());
    if !txn.events_by_game_id_prefix(dynasty_id, &next_prefix)?.is_empty() {
        return Ok(());
    }

    let next_round_date = games.iter().map(|g| g.timestamp).max().unwrap().plus_days(7);
    advance_round(txn, dynasty_id, season, conference, round, bye_seed, next_round_date)?;
    Ok(())
}

fn maybe_schedule_super_bowl(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    afc: &ConferenceSeeds,
    nfc: &ConferenceSeeds,
) -> Result<()> {
    if !txn
        .events_by_game_id_prefix(dynasty_id, &format!("{season}_sb_"))?
        .is_empty()
    {
        return Ok(());
    }

    let afc_champ = conference_champion(txn, dynasty_id, season, afc.conference_name)?;
    let nfc_champ = conference_champion(txn, dynasty_id, season, nfc.conference_name)?;
    let (afc_team, afc_date) = match afc_champ {
        Some(v) => v,
        None => return Ok(()),
    };
    let (nfc_team, nfc_date) = match nfc_champ {
        Some(v) => v,
        None => return Ok(()),
    };

    let super_bowl_date = afc_date.max(nfc_date).plus_days(14);
    txn.insert_event(&NewEvent {
        event_type: EventType::Game(GameKind::SuperBowl),
        timestamp: super_bowl_date,
        synthetic_game_id: Some(format!("{season}_sb_{afc_team}_{nfc_team}")),
        parameters: serde_json::json!({
            "home_team": afc_team.as_u8(),
            "away_team": nfc_team.as_u8(),
            "is_division_game": false,
            "is_conference_game": false,
        }),
    })?;
    info!("dynasty {dynasty_id} season {season} Super Bowl scheduled: {afc_team} vs {nfc_team}");
    Ok(())
}

/// The sole winner of a conference's Conference round game, once played.
fn conference_champion(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    conference: &str,
) -> Result<Option<(TeamId, CalendarDate)>> {
    let prefix = format!("{season}_conf_{conference}");
    let games = txn.events_by_game_id_prefix(dynasty_id, &prefix)?;
    let game = match games.into_iter().next() {
        Some(g) if g.is_executed() => g,
        _ => return Ok(None),
    };
    let survivor = winner_of(&game).ok_or_else(|| {
        DynastyError::invariant(format!(
            "{conference} Conference round game for {season} has malformed results"
        ))
    })?;
    Ok(Some((survivor.team_id, game.timestamp)))
}

fn winner_of(event: &Event) -> Option<Survivor> {
    let results = event.results.as_ref()?;
    let home_score = results["home_score"].as_u64()?;
    let away_score = results["away_score"].as_u64()?;
    let home_team = event.parameters["home_team"].as_u64()? as u8;
    let away_team = event.parameters["away_team"].as_u64()? as u8;
    let home_seed = event.parameters["home_seed"].as_u64()? as u16;
    let away_seed = event.parameters["away_seed"].as_u64()? as u16;
    if home_score >= away_score {
        Some(Survivor {
            team_id: TeamId::new(home_team),
            seed: home_seed,
        })
    } else {
        Some(Survivor {
            team_id: TeamId::new(away_team),
            seed: away_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::Store;
    use serde_json::json;

    #[test]
    fn round_not_yet_complete_returns_false() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn.insert_event(&crate::store::events::NewEvent {
            event_type: EventType::Game(GameKind::WildCard),
            timestamp: CalendarDate::new(2026, 1, 10).unwrap(),
            synthetic_game_id: Some("2025_wc_AFC_2_7".into()),
            parameters: json!({
                "home_team": 2, "away_team": 7, "home_seed": 2, "away_seed": 7,
                "conference": "AFC"
            }),
        })
        .unwrap();

        let advanced = advance_round(
            &txn,
            &dynasty_id,
            2025,
            "AFC",
            PlayoffRoundKind::WildCard,
            Some((TeamId::new(1), 1)),
            CalendarDate::new(2026, 1, 17).unwrap(),
        )
        .unwrap();
        assert!(!advanced);
    }

    #[test]
    fn completed_round_schedules_next_round_with_reseeding() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        for (home_seed, away_seed, home_team, away_team) in
            [(2, 7, 2, 7), (3, 6, 3, 6), (4, 5, 4, 5)]
        {
            let id = txn
                .insert_event(&crate::store::events::NewEvent {
                    event_type: EventType::Game(GameKind::WildCard),
                    timestamp: CalendarDate::new(2026, 1, 10).unwrap(),
                    synthetic_game_id: Some(format!("2025_wc_AFC_{home_team}_{away_team}")),
                    parameters: json!({
                        "home_team": home_team, "away_team": away_team,
                        "home_seed": home_seed, "away_seed": away_seed,
                        "conference": "AFC"
                    }),
                })
                .unwrap();
            txn.mark_event_executed(&dynasty_id, id, &json!({ "home_score": 24, "away_score": 10 }))
                .unwrap();
        }

        let advanced = advance_round(
            &txn,
            &dynasty_id,
            2025,
            "AFC",
            PlayoffRoundKind::WildCard,
            Some((TeamId::new(1), 1)),
            CalendarDate::new(2026, 1, 17).unwrap(),
        )
        .unwrap();
        assert!(advanced);

        let next = txn
            .events_by_game_id_prefix(&dynasty_id, "2025_div_AFC")
            .unwrap();
        assert_eq!(next.len(), 2);
        // Seed 1 (the bye) should be paired with the lowest surviving seed.
        let top_game = next
            .iter()
            .find(|g| g.parameters["home_seed"] == 1)
            .unwrap();
        assert_eq!(top_game.parameters["away_seed"], 4);
    }
}
