//! `standings` command.

use crate::error::Result;
use crate::ids::DynastyId;
use crate::store::schema::Store;
use crate::store::standings::SeasonType;

pub fn handle_standings(mut store: Store, dynasty_id: DynastyId, season: u16, playoffs: bool) -> Result<()> {
    let season_type = if playoffs {
        SeasonType::Playoffs
    } else {
        SeasonType::Regular
    };

    let txn = store.begin(dynasty_id.clone())?;
    let mut standings = txn.list_standings(&dynasty_id, season, season_type)?;
    txn.commit()?;

    standings.sort_by(|a, b| {
        let pct = |s: &crate::store::standings::Standing| {
            let games = (s.wins + s.losses + s.ties) as f64;
            if games == 0.0 {
                0.0
            } else {
                (s.wins as f64 + 0.5 * s.ties as f64) / games
            }
        };
        pct(b).partial_cmp(&pct(a)).unwrap()
    });

    println!("team   w   l   t   pf   pa  streak");
    for s in &standings {
        println!(
            "{:<4}  {:>2}  {:>2}  {:>2}  {:>4} {:>4}  {:>+3}",
            s.team_id, s.wins, s.losses, s.ties, s.points_for, s.points_against, s.streak
        );
    }
    Ok(())
}
