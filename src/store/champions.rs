//! One row per season recording the Super Bowl winner.

use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::ids::{DynastyId, TeamId};
use crate::store::txn::Txn;

impl Txn<'_> {
    pub fn record_champion(&self, dynasty_id: &DynastyId, season: u16, team_id: TeamId) -> Result<()> {
        self.inner.execute(
            "INSERT OR REPLACE INTO champions (dynasty_id, season, team_id) VALUES (?1, ?2, ?3)",
            params![dynasty_id.as_str(), season, team_id.as_u8()],
        )?;
        Ok(())
    }

    pub fn get_champion(&self, dynasty_id: &DynastyId, season: u16) -> Result<Option<TeamId>> {
        self.inner
            .query_row(
                "SELECT team_id FROM champions WHERE dynasty_id = ?1 AND season = ?2",
                params![dynasty_id.as_str(), season],
                |r| r.get::<_, u8>(0),
            )
            .optional()
            .map(|opt| opt.map(TeamId::new))
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::Store;

    #[test]
    fn record_and_fetch_champion_round_trips() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();
        txn.record_champion(&dynasty_id, 2025, TeamId::new(14))
            .unwrap();

        let champion = txn.get_champion(&dynasty_id, 2025).unwrap();
        assert_eq!(champion, Some(TeamId::new(14)));
        assert_eq!(txn.get_champion(&dynasty_id, 2026).unwrap(), None);
    }
}
