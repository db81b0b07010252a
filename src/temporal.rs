// ⏰ Temporal Model - latest-as-of resolution
//
// Every fact record (ownership, occupancy, name, rate) carries one effective
// date. The fact "in effect" on a reference date is the latest one dated on
// or before it. Facts are appended, never edited.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};

// ============================================================================
// DATED
// ============================================================================

/// A fact record with an effective date
pub trait Dated {
    /// When this fact took effect. `None` means "since before anything we know",
    /// which orders ahead of every dated fact.
    fn effective_date(&self) -> Option<NaiveDate>;

    /// Entry order. Breaks ties between facts sharing a date: the later entry wins.
    fn sequence(&self) -> i64 {
        0
    }
}

fn in_effect<T: Dated + ?Sized>(fact: &T, as_of: NaiveDate) -> bool {
    fact.effective_date().map_or(true, |date| date <= as_of)
}

fn order_key<T: Dated + ?Sized>(fact: &T) -> (Option<NaiveDate>, i64) {
    (fact.effective_date(), fact.sequence())
}

// ============================================================================
// RESOLVER
// ============================================================================

/// The fact with the greatest date not after `as_of` (inclusive).
///
/// Equal (date, sequence) keys fall back to iteration order, so the element
/// yielded last wins.
pub fn latest_as_of<'a, T, I>(facts: I, as_of: NaiveDate) -> Option<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    facts
        .into_iter()
        .filter(|fact| in_effect(*fact, as_of))
        .max_by(|a, b| order_key(*a).cmp(&order_key(*b)))
}

/// Like [`latest_as_of`] but reports a missing fact as `DoesNotExist`
pub fn resolve<'a, T, I>(
    kind: &'static str,
    subject: &str,
    facts: I,
    as_of: NaiveDate,
) -> Result<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    latest_as_of(facts, as_of).ok_or_else(|| RecordError::DoesNotExist {
        kind,
        subject: subject.to_string(),
        as_of,
    })
}

/// Facts ordered current first: date descending, then entry order descending
pub fn most_recent_first<'a, T: Dated>(facts: &'a [T]) -> Vec<&'a T> {
    let mut ordered: Vec<(usize, &T)> = facts.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| {
        order_key(*b)
            .cmp(&order_key(*a))
            .then_with(|| ib.cmp(ia))
    });
    ordered.into_iter().map(|(_, fact)| fact).collect()
}

// ============================================================================
// FACT HISTORY
// ============================================================================

/// FactHistory - one subject plus its append-only facts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactHistory<T> {
    /// Stable identity of the subject (property, unit, person...)
    pub subject: String,

    /// Facts in entry order
    facts: Vec<T>,
}

impl<T: Dated> FactHistory<T> {
    pub fn new(subject: impl Into<String>) -> Self {
        FactHistory {
            subject: subject.into(),
            facts: Vec::new(),
        }
    }

    pub fn from_facts(subject: impl Into<String>, facts: Vec<T>) -> Self {
        FactHistory {
            subject: subject.into(),
            facts,
        }
    }

    /// Append a fact. Nothing is ever replaced.
    pub fn record(&mut self, fact: T) {
        self.facts.push(fact);
    }

    pub fn as_of(&self, as_of: NaiveDate) -> Option<&T> {
        latest_as_of(&self.facts, as_of)
    }

    pub fn resolve(&self, kind: &'static str, as_of: NaiveDate) -> Result<&T> {
        resolve(kind, &self.subject, &self.facts, as_of)
    }

    /// Latest fact regardless of date
    pub fn latest(&self) -> Option<&T> {
        self.facts
            .iter()
            .max_by(|a, b| order_key(*a).cmp(&order_key(*b)))
    }

    /// All facts, current first
    pub fn history(&self) -> Vec<&T> {
        most_recent_first(&self.facts)
    }

    pub fn facts(&self) -> &[T] {
        &self.facts
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.facts.iter().filter_map(|f| f.effective_date()).min()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// Snapshot - the facts in effect for many subjects on one date
///
/// Subjects with nothing in effect yet are left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub snapshot_id: String,
    pub as_of: NaiveDate,
    pub values: Vec<(String, T)>,
}

impl<T: Clone> Snapshot<T> {
    pub fn new(as_of: NaiveDate, values: Vec<(String, T)>) -> Self {
        Snapshot {
            snapshot_id: uuid::Uuid::new_v4().to_string(),
            as_of,
            values,
        }
    }

    pub fn resolve<'a, I>(histories: I, as_of: NaiveDate) -> Self
    where
        T: Dated + 'a,
        I: IntoIterator<Item = &'a FactHistory<T>>,
    {
        let values = histories
            .into_iter()
            .filter_map(|h| h.as_of(as_of).map(|f| (h.subject.clone(), f.clone())))
            .collect();
        Snapshot::new(as_of, values)
    }

    pub fn get(&self, subject: &str) -> Option<&T> {
        self.values
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, v)| v)
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
