// Share ownership of legal entities
//
// Each ShareTransfer states how many shares a holder has after the transfer,
// so a holder's position on a date is its latest row on or before that date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Checks, Result};
use crate::temporal::{Dated, FactHistory, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareTransfer {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub entity_id: String,
    /// Owner record holding the shares
    pub holder_id: String,
    pub date: NaiveDate,
    /// Shares held after this transfer; zero means the holder sold out
    pub shares: i64,
}

impl ShareTransfer {
    pub fn new(entity_id: &str, holder_id: &str, date: NaiveDate, shares: i64) -> Self {
        ShareTransfer {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            entity_id: entity_id.to_string(),
            holder_id: holder_id.to_string(),
            date,
            shares,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("ShareTransfer");
        checks.required("entity_id", &self.entity_id);
        checks.required("holder_id", &self.holder_id);
        if self.shares < 0 {
            checks.fail("shares", "Cannot hold a negative number of shares");
        }
        checks.finish()
    }
}

impl Dated for ShareTransfer {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Split one entity's transfers into a history per holder
pub fn histories_by_holder(transfers: &[ShareTransfer]) -> Vec<FactHistory<ShareTransfer>> {
    let mut by_holder: BTreeMap<&str, Vec<ShareTransfer>> = BTreeMap::new();
    for transfer in transfers {
        by_holder
            .entry(transfer.holder_id.as_str())
            .or_default()
            .push(transfer.clone());
    }
    by_holder
        .into_iter()
        .map(|(holder, facts)| FactHistory::from_facts(holder, facts))
        .collect()
}

/// Holders with a positive position on `as_of`, keyed by holder id
pub fn holders_as_of(transfers: &[ShareTransfer], as_of: NaiveDate) -> Snapshot<i64> {
    let histories = histories_by_holder(transfers);
    let resolved: Snapshot<ShareTransfer> = Snapshot::resolve(&histories, as_of);
    let values = resolved
        .values
        .into_iter()
        .filter(|(_, transfer)| transfer.shares > 0)
        .map(|(holder, transfer)| (holder, transfer.shares))
        .collect();
    Snapshot::new(as_of, values)
}

/// Fraction of outstanding shares (among current holders) held by `holder_id`
pub fn ownership_fraction(transfers: &[ShareTransfer], holder_id: &str, as_of: NaiveDate) -> f64 {
    let snapshot = holders_as_of(transfers, as_of);
    let total: i64 = snapshot.values.iter().map(|(_, shares)| *shares).sum();
    match (snapshot.get(holder_id), total) {
        (Some(held), total) if total > 0 => *held as f64 / total as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> Vec<ShareTransfer> {
        vec![
            ShareTransfer::new("llc", "alice", d(2010, 1, 1), 100),
            ShareTransfer::new("llc", "bob", d(2012, 1, 1), 50),
            ShareTransfer::new("llc", "alice", d(2012, 1, 1), 50),
            ShareTransfer::new("llc", "bob", d(2015, 6, 1), 0),
        ]
    }

    #[test]
    fn test_holders_as_of() {
        let transfers = sample();

        let early = holders_as_of(&transfers, d(2011, 1, 1));
        assert_eq!(early.count(), 1);
        assert_eq!(early.get("alice"), Some(&100));

        let split = holders_as_of(&transfers, d(2012, 1, 1));
        assert_eq!(split.get("alice"), Some(&50));
        assert_eq!(split.get("bob"), Some(&50));

        let later = holders_as_of(&transfers, d(2016, 1, 1));
        assert!(later.get("bob").is_none());
        assert_eq!(later.count(), 1);

        assert!(holders_as_of(&transfers, d(2009, 1, 1)).values.is_empty());
    }

    #[test]
    fn test_ownership_fraction() {
        let transfers = sample();
        assert_eq!(ownership_fraction(&transfers, "alice", d(2013, 1, 1)), 0.5);
        assert_eq!(ownership_fraction(&transfers, "alice", d(2016, 1, 1)), 1.0);
        assert_eq!(ownership_fraction(&transfers, "bob", d(2016, 1, 1)), 0.0);
        assert!(ShareTransfer::new("llc", "bob", d(2016, 1, 1), -5).validate().is_err());
    }
}
