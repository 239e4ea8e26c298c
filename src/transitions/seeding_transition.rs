//! Regular season → playoffs: seed both conferences and schedule the
//! Wild Card round.

use log::info;

use crate::calendar::CalendarDate;
use crate::error::Result;
use crate::ids::{DynastyId, TeamId};
use crate::seeding::{self, TeamRecord};
use crate::store::events::{EventType, GameKind, NewEvent};
use crate::store::txn::Txn;

/// A conference's top seven seeds, best first. Seed 1 gets a Wild Card bye
/// in the bracket generated by [`schedule_wild_card_round`].
pub struct ConferenceSeeds {
    pub conference_name: &'static str,
    pub seeds: Vec<TeamId>,
}

/// Partitions all 32 teams into (team, division) pairs per conference, the
/// grouping [`seed_both_conferences`] needs.
pub fn conference_division_pairs() -> (Vec<(TeamId, u8)>, Vec<(TeamId, u8)>) {
    let mut afc = Vec::new();
    let mut nfc = Vec::new();
    for team in TeamId::all_32() {
        let pair = (team, team.division_id());
        if team.conference() == "AFC" {
            afc.push(pair);
        } else {
            nfc.push(pair);
        }
    }
    (afc, nfc)
}

pub fn seed_both_conferences(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    afc_teams: &[(TeamId, u8)],
    nfc_teams: &[(TeamId, u8)],
) -> Result<(ConferenceSeeds, ConferenceSeeds)> {
    let afc_records = seeding::collect_records(txn, dynasty_id, season, afc_teams)?;
    let nfc_records = seeding::collect_records(txn, dynasty_id, season, nfc_teams)?;

    let afc = ConferenceSeeds {
        conference_name: "AFC",
        seeds: seed_top_seven(txn, dynasty_id, season, &afc_records)?,
    };
    let nfc = ConferenceSeeds {
        conference_name: "NFC",
        seeds: seed_top_seven(txn, dynasty_id, season, &nfc_records)?,
    };

    info!(
        "dynasty {dynasty_id} season {season} seeded: AFC #1 = {}, NFC #1 = {}",
        afc.seeds[0], nfc.seeds[0]
    );
    Ok((afc, nfc))
}

fn seed_top_seven(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    records: &[TeamRecord],
) -> Result<Vec<TeamId>> {
    let mut ordered = seeding::seed_conference(txn, dynasty_id, season, records)?;
    ordered.truncate(7);
    Ok(ordered)
}

/// Schedule the four Wild Card games for one conference: 2v7, 3v6, 4v5, and
/// a bye for seed 1. Higher seed always hosts.
pub fn schedule_wild_card_round(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    seeds: &ConferenceSeeds,
    wild_card_saturday: CalendarDate,
) -> Result<()> {
    let matchups = [(2, 7), (3, 6), (4, 5)];
    let mut events = Vec::new();
    for (i, (high, low)) in matchups.iter().enumerate() {
        let home = seeds.seeds[*high - 1];
        let away = seeds.seeds[*low - 1];
        events.push(NewEvent {
            event_type: EventType::Game(GameKind::WildCard),
            timestamp: wild_card_saturday.plus_days((i / 2) as i64),
            synthetic_game_id: Some(format!(
                "{season}_wc_{}_{home}_{away}",
                seeds.conference_name
            )),
            parameters: serde_json::json!({
                "home_team": home.as_u8(),
                "away_team": away.as_u8(),
                "home_seed": *high,
                "away_seed": *low,
                "conference": seeds.conference_name,
                "is_division_game": false,
                "is_conference_game": true,
            }),
        });
    }
    txn.bulk_insert_events(&events)?;
    Ok(())
}
