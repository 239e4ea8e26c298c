//! Active roster players, including the id-minting used when a prospect is
//! drafted onto a roster: pick execution mints a player id disjoint from
//! every [`crate::ids::ProspectId`].

use rusqlite::params;

use crate::error::Result;
use crate::ids::{DynastyId, PlayerId, TeamId};
use crate::store::txn::Txn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPlayer {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    pub position: String,
    pub jersey_number: u8,
    pub overall: u8,
    pub depth_order: u16,
}

#[derive(Debug, Clone)]
pub struct NewRosterPlayer {
    pub team_id: TeamId,
    pub name: String,
    pub position: String,
    pub jersey_number: u8,
    pub overall: u8,
    pub depth_order: u16,
}

impl Txn<'_> {
    /// Insert a new roster player and return its freshly minted, globally
    /// unique [`PlayerId`] — never reused from a [`crate::ids::ProspectId`].
    pub fn insert_roster_player(
        &self,
        dynasty_id: &DynastyId,
        new_player: &NewRosterPlayer,
    ) -> Result<PlayerId> {
        self.inner.execute(
            "INSERT INTO roster_players
                (dynasty_id, team_id, name, position, jersey_number, overall, depth_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                dynasty_id.as_str(),
                new_player.team_id.as_u8(),
                new_player.name,
                new_player.position,
                new_player.jersey_number,
                new_player.overall,
                new_player.depth_order,
            ],
        )?;
        Ok(PlayerId::new(self.inner.last_insert_rowid()))
    }

    pub fn roster_for_team(
        &self,
        dynasty_id: &DynastyId,
        team_id: TeamId,
    ) -> Result<Vec<RosterPlayer>> {
        let mut stmt = self.inner.prepare(
            "SELECT player_id, team_id, name, position, jersey_number, overall, depth_order
             FROM roster_players
             WHERE dynasty_id = ?1 AND team_id = ?2
             ORDER BY depth_order ASC",
        )?;
        let rows = stmt.query_map(params![dynasty_id.as_str(), team_id.as_u8()], row_to_player)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get_roster_player(
        &self,
        dynasty_id: &DynastyId,
        player_id: PlayerId,
    ) -> Result<RosterPlayer> {
        self.inner
            .query_row(
                "SELECT player_id, team_id, name, position, jersey_number, overall, depth_order
                 FROM roster_players WHERE dynasty_id = ?1 AND player_id = ?2",
                params![dynasty_id.as_str(), player_id.as_i64()],
                row_to_player,
            )
            .map_err(Into::into)
    }
}

fn row_to_player(row: &rusqlite::Row) -> rusqlite::Result<RosterPlayer> {
    Ok(RosterPlayer {
        player_id: PlayerId::new(row.get(0)?),
        team_id: TeamId::new(row.get(1)?),
        name: row.get(2)?,
        position: row.get(3)?,
        jersey_number: row.get(4)?,
        overall: row.get(5)?,
        depth_order: row.get(6)?,
    })
}
