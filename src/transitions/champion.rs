//! Playoffs → offseason: record the Super Bowl winner as that season's
//! champion once the game has been simulated.

use log::info;

use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, TeamId};
use crate::store::events::{EventType, GameKind};
use crate::store::txn::Txn;

/// Finds the executed Super Bowl event for `season` and records its winner.
/// Returns the champion's team id.
pub fn crown_champion(txn: &Txn<'_>, dynasty_id: &DynastyId, season: u16) -> Result<TeamId> {
    let prefix = format!("{season}_sb_");
    let games = txn.events_by_game_id_prefix(dynasty_id, &prefix)?;
    let game = games
        .into_iter()
        .find(|g| matches!(g.event_type, EventType::Game(GameKind::SuperBowl)))
        .ok_or_else(|| DynastyError::invariant(format!("no Super Bowl scheduled for {season}")))?;

    let results = game.results.as_ref().ok_or_else(|| {
        DynastyError::invariant(format!("Super Bowl for {season} has not been played yet"))
    })?;
    let home_score = results["home_score"].as_u64().unwrap_or(0);
    let away_score = results["away_score"].as_u64().unwrap_or(0);
    let home_team = game.parameters["home_team"].as_u64().unwrap_or(0) as u8;
    let away_team = game.parameters["away_team"].as_u64().unwrap_or(0) as u8;

    let champion = if home_score >= away_score {
        TeamId::new(home_team)
    } else {
        TeamId::new(away_team)
    };

    txn.record_champion(dynasty_id, season, champion)?;
    info!("dynasty {dynasty_id} season {season} champion: team {champion}");
    Ok(champion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDate;
    use crate::store::events::NewEvent;
    use crate::store::schema::Store;
    use serde_json::json;

    #[test]
    fn crowns_whichever_team_scored_higher() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        let id = txn
            .insert_event(&NewEvent {
                event_type: EventType::Game(GameKind::SuperBowl),
                timestamp: CalendarDate::new(2026, 2, 8).unwrap(),
                synthetic_game_id: Some("2025_sb_1_2".into()),
                parameters: json!({ "home_team": 1, "away_team": 2 }),
            })
            .unwrap();
        txn.mark_event_executed(&dynasty_id, id, &json!({ "home_score": 31, "away_score": 17 }))
            .unwrap();

        let champion = crown_champion(&txn, &dynasty_id, 2025).unwrap();
        assert_eq!(champion, TeamId::new(1));
        assert_eq!(txn.get_champion(&dynasty_id, 2025).unwrap(), Some(TeamId::new(1)));
    }

    #[test]
    fn crowning_before_the_game_is_played_is_an_error() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn.insert_event(&NewEvent {
            event_type: EventType::Game(GameKind::SuperBowl),
            timestamp: CalendarDate::new(2026, 2, 8).unwrap(),
            synthetic_game_id: Some("2025_sb_1_2".into()),
            parameters: json!({ "home_team": 1, "away_team": 2 }),
        })
        .unwrap();

        assert!(crown_champion(&txn, &dynasty_id, 2025).is_err());
    }
}
