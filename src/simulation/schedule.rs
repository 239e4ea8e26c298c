//! Regular-season schedule generation.
//!
//! A league-realistic home/away slate respecting division and conference
//! rotation rules is out of scope here; this generates a round-robin-ish
//! schedule of `weeks` weeks, each pairing all 32 teams once, which is
//! enough to drive the phase/standings machinery end-to-end and is what
//! the integration tests exercise.

use chrono::Weekday;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::calendar::CalendarDate;
use crate::error::Result;
use crate::ids::{DynastyId, TeamId};
use crate::store::events::{EventType, GameKind, NewEvent};
use crate::store::txn::Txn;

/// Generates `weeks` weeks of games, one round-robin pairing of all 32
/// teams per week (so no bye weeks and no guarantee a team never plays a
/// division rival twice — a documented simplification). Games land on the
/// Sunday of each week starting from `week1_thursday`.
pub fn generate_regular_season_schedule(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    week1_thursday: CalendarDate,
    weeks: u8,
    rng: &mut impl Rng,
) -> Result<()> {
    let week1_sunday = week1_thursday.next_weekday(Weekday::Sun);
    let mut events = Vec::new();

    for week in 0..weeks {
        let mut teams: Vec<TeamId> = TeamId::all_32().collect();
        teams.shuffle(rng);
        let game_date = week1_sunday.plus_days(7 * week as i64);

        for (i, pair) in teams.chunks(2).enumerate() {
            let [home, away] = [pair[0], pair[1]];
            events.push(NewEvent {
                event_type: EventType::Game(GameKind::Regular),
                timestamp: game_date,
                synthetic_game_id: Some(format!("{season}_reg_w{}_g{i}", week + 1)),
                parameters: serde_json::json!({
                    "home_team": home.as_u8(),
                    "away_team": away.as_u8(),
                    "is_division_game": false,
                    "is_conference_game": false,
                    "week": week + 1,
                }),
            });
        }
    }

    txn.bulk_insert_events(&events)?;
    Ok(())
}
