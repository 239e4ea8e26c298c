//! Persistence for the draft subsystem: the pick-ownership ledger
//! (`draft_order`) is a table distinct from the prospect pool
//! (`draft_classes`/`draft_prospects`) — a pick exists with an owner before
//! any prospect does, and a prospect can go undrafted.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::error::{DynastyError, Result};
use crate::ids::{DynastyId, PickId, PlayerId, ProspectId, TeamId};
use crate::store::txn::Txn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftClassStatus {
    Generated,
    InProgress,
    Completed,
}

impl DraftClassStatus {
    fn as_str(self) -> &'static str {
        match self {
            DraftClassStatus::Generated => "GENERATED",
            DraftClassStatus::InProgress => "IN_PROGRESS",
            DraftClassStatus::Completed => "COMPLETED",
        }
    }

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GENERATED" => Ok(DraftClassStatus::Generated),
            "IN_PROGRESS" => Ok(DraftClassStatus::InProgress),
            "COMPLETED" => Ok(DraftClassStatus::Completed),
            other => Err(DynastyError::invariant(format!(
                "unknown persisted draft class status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoutingConfidence {
    Low,
    Medium,
    High,
}

impl ScoutingConfidence {
    fn as_str(self) -> &'static str {
        match self {
            ScoutingConfidence::Low => "LOW",
            ScoutingConfidence::Medium => "MEDIUM",
            ScoutingConfidence::High => "HIGH",
        }
    }

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LOW" => Ok(ScoutingConfidence::Low),
            "MEDIUM" => Ok(ScoutingConfidence::Medium),
            "HIGH" => Ok(ScoutingConfidence::High),
            other => Err(DynastyError::invariant(format!(
                "unknown persisted scouting confidence: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftClassId(pub i64);

#[derive(Debug, Clone, PartialEq)]
pub struct DraftProspect {
    pub player_id: ProspectId,
    pub draft_class_id: DraftClassId,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub age: u8,
    pub true_overall: u8,
    pub scouted_overall: u8,
    pub scouting_confidence: ScoutingConfidence,
    pub projected_pick_min: u16,
    pub projected_pick_max: u16,
    pub college: String,
    pub archetype: String,
    pub development_curve: String,
    pub attributes: serde_json::Value,
    pub is_drafted: bool,
    pub drafted_by_team: Option<TeamId>,
    pub drafted_round: Option<u8>,
    pub drafted_pick: Option<u16>,
    pub roster_player_id: Option<PlayerId>,
}

#[derive(Debug, Clone)]
pub struct NewDraftProspect {
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub age: u8,
    pub true_overall: u8,
    pub scouted_overall: u8,
    pub scouting_confidence: ScoutingConfidence,
    pub projected_pick_min: u16,
    pub projected_pick_max: u16,
    pub college: String,
    pub archetype: String,
    pub development_curve: String,
    pub attributes: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftPick {
    pub pick_id: PickId,
    pub season: u16,
    pub round: u8,
    pub pick_in_round: u16,
    pub overall_pick: u16,
    pub original_owner_team: TeamId,
    pub current_owner_team: TeamId,
    pub selected_player_id: Option<ProspectId>,
    pub is_executed: bool,
    pub is_compensatory: bool,
    pub acquired_via_trade: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct NewDraftPick {
    pub round: u8,
    pub pick_in_round: u16,
    pub overall_pick: u16,
    pub original_owner_team: TeamId,
    pub is_compensatory: bool,
}

impl Txn<'_> {
    pub fn create_draft_class(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
        total_prospects: u16,
    ) -> Result<DraftClassId> {
        self.inner.execute(
            "INSERT INTO draft_classes (dynasty_id, season, total_prospects, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                dynasty_id.as_str(),
                season,
                total_prospects,
                DraftClassStatus::Generated.as_str()
            ],
        )?;
        Ok(DraftClassId(self.inner.last_insert_rowid()))
    }

    pub fn get_draft_class_id(&self, dynasty_id: &DynastyId, season: u16) -> Result<Option<DraftClassId>> {
        use rusqlite::OptionalExtension;
        self.inner
            .query_row(
                "SELECT draft_class_id FROM draft_classes WHERE dynasty_id = ?1 AND season = ?2",
                params![dynasty_id.as_str(), season],
                |r| r.get::<_, i64>(0),
            )
            .optional()
            .map(|opt| opt.map(DraftClassId))
            .map_err(DynastyError::from)
    }

    pub fn set_draft_class_status(
        &self,
        draft_class_id: DraftClassId,
        status: DraftClassStatus,
    ) -> Result<()> {
        self.inner.execute(
            "UPDATE draft_classes SET status = ?1 WHERE draft_class_id = ?2",
            params![status.as_str(), draft_class_id.0],
        )?;
        Ok(())
    }

    pub fn insert_prospect(
        &self,
        dynasty_id: &DynastyId,
        draft_class_id: DraftClassId,
        new_prospect: &NewDraftProspect,
    ) -> Result<ProspectId> {
        self.inner.execute(
            "INSERT INTO draft_prospects
                (draft_class_id, dynasty_id, first_name, last_name, position, age,
                 true_overall, scouted_overall, scouting_confidence,
                 projected_pick_min, projected_pick_max, college, archetype,
                 development_curve, attributes_blob, is_drafted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 0)",
            params![
                draft_class_id.0,
                dynasty_id.as_str(),
                new_prospect.first_name,
                new_prospect.last_name,
                new_prospect.position,
                new_prospect.age,
                new_prospect.true_overall,
                new_prospect.scouted_overall,
                new_prospect.scouting_confidence.as_str(),
                new_prospect.projected_pick_min,
                new_prospect.projected_pick_max,
                new_prospect.college,
                new_prospect.archetype,
                new_prospect.development_curve,
                new_prospect.attributes.to_string(),
            ],
        )?;
        Ok(ProspectId::new(self.inner.last_insert_rowid()))
    }

    pub fn undrafted_prospects(
        &self,
        dynasty_id: &DynastyId,
        draft_class_id: DraftClassId,
    ) -> Result<Vec<DraftProspect>> {
        let mut stmt = self.inner.prepare(
            "SELECT player_id, draft_class_id, first_name, last_name, position, age,
                    true_overall, scouted_overall, scouting_confidence,
                    projected_pick_min, projected_pick_max, college, archetype,
                    development_curve, attributes_blob, is_drafted,
                    drafted_by_team, drafted_round, drafted_pick, roster_player_id
             FROM draft_prospects
             WHERE dynasty_id = ?1 AND draft_class_id = ?2 AND is_drafted = 0
             ORDER BY true_overall DESC",
        )?;
        let rows = stmt.query_map(params![dynasty_id.as_str(), draft_class_id.0], row_to_prospect)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r??);
        }
        Ok(out)
    }

    pub fn get_prospect(&self, dynasty_id: &DynastyId, prospect_id: ProspectId) -> Result<DraftProspect> {
        self.inner
            .query_row(
                "SELECT player_id, draft_class_id, first_name, last_name, position, age,
                        true_overall, scouted_overall, scouting_confidence,
                        projected_pick_min, projected_pick_max, college, archetype,
                        development_curve, attributes_blob, is_drafted,
                        drafted_by_team, drafted_round, drafted_pick, roster_player_id
                 FROM draft_prospects WHERE dynasty_id = ?1 AND player_id = ?2",
                params![dynasty_id.as_str(), prospect_id.as_i64()],
                row_to_prospect,
            )?
            .map_err(DynastyError::from)
    }

    /// Mark a prospect drafted and link it to the freshly minted roster
    /// player id, an explicit back-fill between the two distinct id spaces.
    pub fn mark_prospect_drafted(
        &self,
        dynasty_id: &DynastyId,
        prospect_id: ProspectId,
        drafted_by_team: TeamId,
        round: u8,
        overall_pick: u16,
        roster_player_id: PlayerId,
    ) -> Result<()> {
        let rows = self.inner.execute(
            "UPDATE draft_prospects SET
                is_drafted = 1, drafted_by_team = ?1, drafted_round = ?2,
                drafted_pick = ?3, roster_player_id = ?4
             WHERE dynasty_id = ?5 AND player_id = ?6 AND is_drafted = 0",
            params![
                drafted_by_team.as_u8(),
                round,
                overall_pick,
                roster_player_id.as_i64(),
                dynasty_id.as_str(),
                prospect_id.as_i64(),
            ],
        )?;
        if rows == 0 {
            return Err(DynastyError::invariant(format!(
                "prospect {prospect_id} already drafted or does not exist"
            )));
        }
        Ok(())
    }

    pub fn create_draft_pick(
        &self,
        dynasty_id: &DynastyId,
        season: u16,
        new_pick: &NewDraftPick,
    ) -> Result<PickId> {
        self.inner.execute(
            "INSERT INTO draft_order
                (dynasty_id, season, round, pick_in_round, overall_pick,
                 original_owner_team, current_owner_team, is_executed,
                 is_compensatory, acquired_via_trade)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, 0, ?7, 0)",
            params![
                dynasty_id.as_str(),
                season,
                new_pick.round,
                new_pick.pick_in_round,
                new_pick.overall_pick,
                new_pick.original_owner_team.as_u8(),
                new_pick.is_compensatory as i64,
            ],
        )?;
        Ok(PickId::new(self.inner.last_insert_rowid()))
    }

    /// Reassign a pick's current owner — a trade. `original_owner_team`
    /// never changes, so compensatory-pick rules keyed off the original
    /// team still resolve correctly after trades.
    pub fn transfer_pick(
        &self,
        dynasty_id: &DynastyId,
        pick_id: PickId,
        new_owner: TeamId,
        trade_id: &str,
        trade_date: &str,
    ) -> Result<()> {
        let rows = self.inner.execute(
            "UPDATE draft_order SET current_owner_team = ?1, acquired_via_trade = 1,
                trade_id = ?2, trade_date = ?3
             WHERE dynasty_id = ?4 AND pick_id = ?5 AND is_executed = 0",
            params![
                new_owner.as_u8(),
                trade_id,
                trade_date,
                dynasty_id.as_str(),
                pick_id.as_i64(),
            ],
        )?;
        if rows == 0 {
            return Err(DynastyError::invariant(format!(
                "pick {pick_id} already executed or does not exist; cannot trade"
            )));
        }
        Ok(())
    }

    /// Picks for a season in on-the-clock order, whether or not executed.
    pub fn draft_order_for_season(&self, dynasty_id: &DynastyId, season: u16) -> Result<Vec<DraftPick>> {
        let mut stmt = self.inner.prepare(
            "SELECT pick_id, season, round, pick_in_round, overall_pick,
                    original_owner_team, current_owner_team, selected_player_id,
                    is_executed, is_compensatory, acquired_via_trade
             FROM draft_order
             WHERE dynasty_id = ?1 AND season = ?2
             ORDER BY overall_pick ASC",
        )?;
        let rows = stmt.query_map(params![dynasty_id.as_str(), season], row_to_pick)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// The lowest-overall-pick unexecuted pick for a season, i.e. who's on
    /// the clock. `None` once the draft has fully executed.
    pub fn next_unexecuted_pick(&self, dynasty_id: &DynastyId, season: u16) -> Result<Option<DraftPick>> {
        use rusqlite::OptionalExtension;
        self.inner
            .query_row(
                "SELECT pick_id, season, round, pick_in_round, overall_pick,
                        original_owner_team, current_owner_team, selected_player_id,
                        is_executed, is_compensatory, acquired_via_trade
                 FROM draft_order
                 WHERE dynasty_id = ?1 AND season = ?2 AND is_executed = 0
                 ORDER BY overall_pick ASC LIMIT 1",
                params![dynasty_id.as_str(), season],
                row_to_pick,
            )
            .optional()
            .map_err(DynastyError::from)
    }

    /// Execute a pick: record the selection and mark it non-tradeable.
    /// Caller is responsible for having already minted the roster player and
    /// called [`Txn::mark_prospect_drafted`] in the same transaction.
    pub fn execute_pick(
        &self,
        dynasty_id: &DynastyId,
        pick_id: PickId,
        selected_player_id: ProspectId,
    ) -> Result<()> {
        let rows = self.inner.execute(
            "UPDATE draft_order SET is_executed = 1, selected_player_id = ?1
             WHERE dynasty_id = ?2 AND pick_id = ?3 AND is_executed = 0",
            params![selected_player_id.as_i64(), dynasty_id.as_str(), pick_id.as_i64()],
        )?;
        if rows == 0 {
            return Err(DynastyError::invariant(format!(
                "pick {pick_id} already executed or does not exist"
            )));
        }
        Ok(())
    }
}

fn row_to_prospect(row: &rusqlite::Row) -> rusqlite::Result<Result<DraftProspect>> {
    let confidence_str: String = row.get(8)?;
    let attrs_str: String = row.get(14)?;
    let drafted_by_team: Option<u8> = row.get(16)?;
    let roster_player_id: Option<i64> = row.get(19)?;

    let parsed = (|| -> Result<DraftProspect> {
        Ok(DraftProspect {
            player_id: ProspectId::new(row.get(0)?),
            draft_class_id: DraftClassId(row.get(1)?),
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            position: row.get(4)?,
            age: row.get(5)?,
            true_overall: row.get(6)?,
            scouted_overall: row.get(7)?,
            scouting_confidence: ScoutingConfidence::from_str(&confidence_str)?,
            projected_pick_min: row.get(9)?,
            projected_pick_max: row.get(10)?,
            college: row.get(11)?,
            archetype: row.get(12)?,
            development_curve: row.get(13)?,
            attributes: serde_json::from_str(&attrs_str)?,
            is_drafted: row.get::<_, i64>(15)? != 0,
            drafted_by_team: drafted_by_team.map(TeamId::new),
            drafted_round: row.get(17)?,
            drafted_pick: row.get(18)?,
            roster_player_id: roster_player_id.map(PlayerId::new),
        })
    })();
    Ok(parsed)
}

fn row_to_pick(row: &rusqlite::Row) -> rusqlite::Result<DraftPick> {
    Ok(DraftPick {
        pick_id: PickId::new(row.get(0)?),
        season: row.get(1)?,
        round: row.get(2)?,
        pick_in_round: row.get(3)?,
        overall_pick: row.get(4)?,
        original_owner_team: TeamId::new(row.get(5)?),
        current_owner_team: TeamId::new(row.get(6)?),
        selected_player_id: row.get::<_, Option<i64>>(7)?.map(ProspectId::new),
        is_executed: row.get::<_, i64>(8)? != 0,
        is_compensatory: row.get::<_, i64>(9)? != 0,
        acquired_via_trade: row.get::<_, i64>(10)? != 0,
    })
}
