//! Player contracts and their year-over-year expiration.
//!
//! Each offseason the year-transition handler queries contracts whose
//! `end_year` has passed and marks them inactive via
//! [`Txn::expire_contracts`].

use rusqlite::params;

use crate::error::{DynastyError, Result};
use crate::ids::{ContractId, DynastyId, PlayerId, TeamId};

use crate::store::txn::Txn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub contract_id: ContractId,
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub start_year: u16,
    pub end_year: u16,
    pub contract_years: u8,
    pub total_value: u64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct NewContract {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub start_year: u16,
    pub contract_years: u8,
    pub total_value: u64,
}

impl Txn<'_> {
    pub fn create_contract(
        &self,
        dynasty_id: &DynastyId,
        new_contract: &NewContract,
    ) -> Result<ContractId> {
        let end_year = new_contract.start_year + new_contract.contract_years as u16 - 1;
        self.inner.execute(
            "INSERT INTO contracts
                (dynasty_id, player_id, team_id, start_year, end_year,
                 contract_years, total_value, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
            params![
                dynasty_id.as_str(),
                new_contract.player_id.as_i64(),
                new_contract.team_id.as_u8(),
                new_contract.start_year,
                end_year,
                new_contract.contract_years,
                new_contract.total_value as i64,
            ],
        )?;
        Ok(ContractId::new(self.inner.last_insert_rowid()))
    }

    pub fn active_contracts_for_team(
        &self,
        dynasty_id: &DynastyId,
        team_id: TeamId,
    ) -> Result<Vec<Contract>> {
        let mut stmt = self.inner.prepare(
            "SELECT contract_id, player_id, team_id, start_year, end_year,
                    contract_years, total_value, is_active
             FROM contracts
             WHERE dynasty_id = ?1 AND team_id = ?2 AND is_active = 1
             ORDER BY contract_id ASC",
        )?;
        let rows = stmt.query_map(params![dynasty_id.as_str(), team_id.as_u8()], row_to_contract)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Contracts whose `end_year` is strictly before `season_year` — the
    /// set the offseason year-transition marks inactive.
    pub fn contracts_expiring_before(
        &self,
        dynasty_id: &DynastyId,
        season_year: u16,
    ) -> Result<Vec<Contract>> {
        let mut stmt = self.inner.prepare(
            "SELECT contract_id, player_id, team_id, start_year, end_year,
                    contract_years, total_value, is_active
             FROM contracts
             WHERE dynasty_id = ?1 AND is_active = 1 AND end_year < ?2
             ORDER BY contract_id ASC",
        )?;
        let rows = stmt.query_map(params![dynasty_id.as_str(), season_year], row_to_contract)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Mark a contract inactive. Idempotent: marking an already-inactive
    /// contract inactive again is not an error, since the year-transition
    /// handler may be re-entered after a crash.
    pub fn expire_contract(&self, dynasty_id: &DynastyId, contract_id: ContractId) -> Result<()> {
        let rows = self.inner.execute(
            "UPDATE contracts SET is_active = 0 WHERE dynasty_id = ?1 AND contract_id = ?2",
            params![dynasty_id.as_str(), contract_id.as_i64()],
        )?;
        if rows == 0 {
            return Err(DynastyError::invariant(format!(
                "no contract {contract_id} for dynasty {dynasty_id}"
            )));
        }
        Ok(())
    }

    /// Expire every contract with `end_year < season_year` in one pass,
    /// returning the contracts that were expired for the caller to log.
    pub fn expire_contracts(
        &self,
        dynasty_id: &DynastyId,
        season_year: u16,
    ) -> Result<Vec<Contract>> {
        let expiring = self.contracts_expiring_before(dynasty_id, season_year)?;
        for contract in &expiring {
            self.expire_contract(dynasty_id, contract.contract_id)?;
        }
        Ok(expiring)
    }
}

fn row_to_contract(row: &rusqlite::Row) -> rusqlite::Result<Contract> {
    Ok(Contract {
        contract_id: ContractId::new(row.get(0)?),
        player_id: PlayerId::new(row.get(1)?),
        team_id: TeamId::new(row.get(2)?),
        start_year: row.get(3)?,
        end_year: row.get(4)?,
        contract_years: row.get(5)?,
        total_value: row.get::<_, i64>(6)? as u64,
        is_active: row.get::<_, i64>(7)? != 0,
    })
}
