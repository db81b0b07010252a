// 💵 Rates - effective-amount logs for a unit
//
// A new amount is a new row with its own effective date. The amount in force
// on a date is the latest row of that kind dated on or before it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dwellings::transfers::check_money;
use crate::error::{Checks, RecordError, Result};
use crate::temporal::{self, Dated};

// ============================================================================
// CHOICES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateKind {
    /// Rent asked for the unit
    UnitRate,
    /// Fee for managing the unit
    UnitManageRate,
    /// Rent a tenant charges a sub-tenant
    SubletRate,
    /// Rent actually paid, and by whom
    PayRate,
}

impl RateKind {
    pub const ALL: [RateKind; 4] = [
        RateKind::UnitRate,
        RateKind::UnitManageRate,
        RateKind::SubletRate,
        RateKind::PayRate,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RateKind::UnitRate => "unit",
            RateKind::UnitManageRate => "manage",
            RateKind::SubletRate => "sublet",
            RateKind::PayRate => "pay",
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.code() == code)
            .ok_or_else(|| RecordError::UnknownCode {
                kind: "rate kind",
                code: code.to_string(),
            })
    }
}

/// How often the amount is due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RentFrequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl RentFrequency {
    pub const ALL: [RentFrequency; 6] = [
        RentFrequency::Daily,
        RentFrequency::Weekly,
        RentFrequency::Biweekly,
        RentFrequency::Monthly,
        RentFrequency::Quarterly,
        RentFrequency::Yearly,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RentFrequency::Daily => "D",
            RentFrequency::Weekly => "W",
            RentFrequency::Biweekly => "B",
            RentFrequency::Monthly => "M",
            RentFrequency::Quarterly => "Q",
            RentFrequency::Yearly => "Y",
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.code() == code)
            .ok_or_else(|| RecordError::UnknownCode {
                kind: "rent frequency",
                code: code.to_string(),
            })
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            RentFrequency::Daily => 365,
            RentFrequency::Weekly => 52,
            RentFrequency::Biweekly => 26,
            RentFrequency::Monthly => 12,
            RentFrequency::Quarterly => 4,
            RentFrequency::Yearly => 1,
        }
    }
}

/// Who pays a PayRate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayerType {
    #[default]
    Tenant,
    /// Housing agency or other subsidy
    Agency,
    Guarantor,
    Employer,
    Other,
}

impl PayerType {
    pub const ALL: [PayerType; 5] = [
        PayerType::Tenant,
        PayerType::Agency,
        PayerType::Guarantor,
        PayerType::Employer,
        PayerType::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PayerType::Tenant => "TE",
            PayerType::Agency => "AG",
            PayerType::Guarantor => "GU",
            PayerType::Employer => "EM",
            PayerType::Other => "OT",
        }
    }

    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.code() == code)
            .ok_or_else(|| RecordError::UnknownCode {
                kind: "payer type",
                code: code.to_string(),
            })
    }
}

// ============================================================================
// RATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub id: String,
    #[serde(default)]
    pub seq: i64,
    pub unit_id: String,
    pub kind: RateKind,
    /// Effective date
    pub date: NaiveDate,
    pub amount: Decimal,
    pub frequency: RentFrequency,
    /// Only set on PayRate rows
    pub payer_type: Option<PayerType>,
}

impl Rate {
    pub fn new(unit_id: &str, kind: RateKind, date: NaiveDate, amount: Decimal) -> Self {
        Rate {
            id: uuid::Uuid::new_v4().to_string(),
            seq: 0,
            unit_id: unit_id.to_string(),
            kind,
            date,
            amount,
            frequency: RentFrequency::default(),
            payer_type: match kind {
                RateKind::PayRate => Some(PayerType::default()),
                _ => None,
            },
        }
    }

    pub fn every(mut self, frequency: RentFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn paid_by(mut self, payer: PayerType) -> Self {
        self.payer_type = Some(payer);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut checks = Checks::new("Rate");
        checks.required("unit_id", &self.unit_id);
        check_money(&mut checks, "amount", self.amount);
        match (self.kind, self.payer_type) {
            (RateKind::PayRate, None) => checks.fail("payer_type", "Required for a pay rate"),
            (RateKind::PayRate, Some(_)) | (_, None) => {}
            (_, Some(_)) => checks.fail("payer_type", "Only pay rates have a payer"),
        }
        checks.finish()
    }

    pub fn annualized(&self) -> Decimal {
        self.amount * Decimal::from(self.frequency.periods_per_year())
    }

    pub fn monthly_equivalent(&self) -> Decimal {
        (self.annualized() / Decimal::from(12)).round_dp(2)
    }
}

impl Dated for Rate {
    fn effective_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }

    fn sequence(&self) -> i64 {
        self.seq
    }
}

/// Rate of `kind` in force on `as_of` for the unit these rows belong to
pub fn rate_as_of<'a>(rates: &'a [Rate], kind: RateKind, as_of: NaiveDate) -> Result<&'a Rate> {
    let subject = rates.first().map(|r| r.unit_id.as_str()).unwrap_or_default();
    temporal::resolve(
        kind.code(),
        subject,
        rates.iter().filter(|r| r.kind == kind),
        as_of,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_codes() {
        for kind in RateKind::ALL {
            assert_eq!(RateKind::from_code(kind.code()).unwrap(), kind);
        }
        for frequency in RentFrequency::ALL {
            assert_eq!(RentFrequency::from_code(frequency.code()).unwrap(), frequency);
        }
        for payer in PayerType::ALL {
            assert_eq!(PayerType::from_code(payer.code()).unwrap(), payer);
        }
    }

    #[test]
    fn test_payer_only_on_pay_rates() {
        let pay = Rate::new("u1", RateKind::PayRate, d(2020, 1, 1), money("700"));
        assert_eq!(pay.payer_type, Some(PayerType::Tenant));
        assert!(pay.validate().is_ok());

        let asked = Rate::new("u1", RateKind::UnitRate, d(2020, 1, 1), money("800"));
        assert!(asked.validate().is_ok());
        assert!(asked.clone().paid_by(PayerType::Agency).validate().is_err());

        let mut pay = pay;
        pay.payer_type = None;
        assert!(pay.validate().is_err());
    }

    #[test]
    fn test_rate_as_of_by_kind() {
        let rates = vec![
            Rate::new("u1", RateKind::UnitRate, d(2019, 1, 1), money("750")),
            Rate::new("u1", RateKind::UnitManageRate, d(2019, 1, 1), money("75")),
            Rate::new("u1", RateKind::UnitRate, d(2021, 1, 1), money("800")),
        ];
        assert_eq!(rate_as_of(&rates, RateKind::UnitRate, d(2020, 12, 31)).unwrap().amount, money("750"));
        assert_eq!(rate_as_of(&rates, RateKind::UnitRate, d(2021, 1, 1)).unwrap().amount, money("800"));
        assert_eq!(rate_as_of(&rates, RateKind::UnitManageRate, d(2022, 1, 1)).unwrap().amount, money("75"));

        let err = rate_as_of(&rates, RateKind::SubletRate, d(2022, 1, 1)).unwrap_err();
        assert!(err.is_missing());
        assert!(rate_as_of(&rates, RateKind::UnitRate, d(2018, 12, 31)).is_err());
    }

    #[test]
    fn test_equivalents() {
        let weekly = Rate::new("u1", RateKind::SubletRate, d(2020, 1, 1), money("150"))
            .every(RentFrequency::Weekly);
        assert_eq!(weekly.annualized(), money("7800"));
        assert_eq!(weekly.monthly_equivalent(), money("650"));
    }
}
