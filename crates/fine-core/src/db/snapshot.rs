//! Point-in-time ledger reads

use super::goals::query_goals;
use super::limits::query_limits;
use super::profile::query_profile;
use super::transactions::query_transactions;
use super::{check_owner, Database};
use crate::error::Result;
use crate::models::LedgerSnapshot;

impl Database {
    /// Read everything one computation needs for `owner`
    ///
    /// All four reads run inside a single read transaction, so a concurrent
    /// write lands either entirely before or entirely after the snapshot.
    pub fn snapshot(&self, owner: &str) -> Result<LedgerSnapshot> {
        check_owner(owner)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let snapshot = LedgerSnapshot {
            owner: owner.to_string(),
            transactions: query_transactions(&tx, owner)?,
            goals: query_goals(&tx, owner)?,
            limits: query_limits(&tx, owner)?,
            profile: query_profile(&tx, owner)?,
        };
        tx.commit()?;

        Ok(snapshot)
    }
}
