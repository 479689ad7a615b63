//! The published allocation table.
//!
//! Sixty-eight explicit grants across six tranches, hard-coded as decimal
//! strings exactly as published, assembled once during plan construction.
//! The strategic tranche intentionally under-sums its published target;
//! [`reconcile_strategic`] closes it with one computed entry so the target
//! figure remains the single source of truth.

use std::fmt;

use crate::amount::Amount;
use crate::error::AllocationError;
use crate::vesting::{STANDARD_VESTING, TEAM_VESTING, VestingParams};

/// Named allocation category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tranche {
    Angel,
    Seed,
    Founders,
    Advisors,
    Strategic,
    Employees,
}

impl Tranche {
    /// All tranches, in payout order. The order is load-bearing: proxy
    /// accounts are later matched to grants by position.
    pub const ALL: [Tranche; 6] = [
        Tranche::Angel,
        Tranche::Seed,
        Tranche::Founders,
        Tranche::Advisors,
        Tranche::Strategic,
        Tranche::Employees,
    ];

    /// Default vesting preset for grants in this tranche.
    pub const fn vesting(self) -> VestingParams {
        match self {
            Tranche::Angel | Tranche::Seed | Tranche::Strategic => STANDARD_VESTING,
            Tranche::Founders | Tranche::Advisors | Tranche::Employees => TEAM_VESTING,
        }
    }

    const fn raw_amounts(self) -> &'static [&'static str] {
        match self {
            Tranche::Angel => ANGEL,
            Tranche::Seed => SEED,
            Tranche::Founders => FOUNDERS,
            Tranche::Advisors => ADVISORS,
            Tranche::Strategic => STRATEGIC,
            Tranche::Employees => EMPLOYEES,
        }
    }
}

impl fmt::Display for Tranche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tranche::Angel => "angel",
            Tranche::Seed => "seed",
            Tranche::Founders => "founders",
            Tranche::Advisors => "advisors",
            Tranche::Strategic => "strategic",
            Tranche::Employees => "employees",
        };
        f.write_str(name)
    }
}

/// One recipient's grant: a total amount and the vesting parameters it
/// releases under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationEntry {
    pub tranche: Tranche,
    pub amount: Amount,
    pub vesting: VestingParams,
}

// Published per-tranche grants, in payout order.

const ANGEL: &[&str] = &["202500000"];

const SEED: &[&str] = &[
    "45000000",
    "45000000",
    "45000000",
    "22500000",
    "22500000",
    "22500000",
    "22500000",
    "18000000",
    "16875000",
    "14625000",
    "11250000",
    "11250000",
    "11250000",
    "11250000",
    "11250000",
    "4500000",
    "2250000",
];

const FOUNDERS: &[&str] = &[
    "153326250",
    "144000000",
    "119362500",
    "9686250",
    "107100000",
];

const ADVISORS: &[&str] = &[
    "6750000",
    "6750000",
    "13500000",
    "6750000",
    "1350000",
];

const STRATEGIC: &[&str] = &[
    "50561797.752809",
    "9363295.88014981",
    "14981273.4082397",
    "13108614.2322097",
    "9363295.88014981",
    "7490636.70411985",
    "3745318.35205993",
    "3745318.35205993",
    "3745318.35205993",
    "1872659.17602996",
    "1872659.17602996",
    "1872659.17602996",
    "1872659.17602996",
    "1872659.17602996",
    "1872659.17602996",
    "1872659.17602996",
    "1872659.17602996",
    "1498127.34082397",
    "374531.835205993",
    "1498127.34082397",
    "3745318.35205993",
];

const EMPLOYEES: &[&str] = &[
    "33750000",
    "27000000",
    "6750000",
    "6750000",
    "8100000",
    "13500000",
    "1350000",
    "3375000",
    "6750000",
    "6750000",
    "3375000",
    "6750000",
    "3375000",
    "10125000",
    "6750000",
    "3375000",
    "6750000",
    "10125000",
    "76698176.503760355067",
];

// Published totals. Strategic is a target the explicit grants under-sum;
// founders and advisors are published as one combined figure.

pub const GRAND_TOTAL: &str = "1499973176.503760355067";
pub const ANGEL_TOTAL: &str = "202500000";
pub const SEED_TOTAL: &str = "337500000";
pub const FOUNDERS_AND_ADVISORS_TOTAL: &str = "568575000";
pub const STRATEGIC_TARGET: &str = "150000000";
pub const EMPLOYEES_TOTAL: &str = "241398176.503760355067";

/// Exact sum of the entries' amounts.
pub fn total(entries: &[AllocationEntry]) -> Result<Amount, AllocationError> {
    entries.iter().try_fold(Amount::ZERO, |acc, entry| {
        acc.checked_add(entry.amount).ok_or(AllocationError::Overflow)
    })
}

/// Append the computed entry that closes the strategic tranche to its
/// published target, under the tranche's default vesting preset.
///
/// The entry is `target - sum(explicit grants)`, never hard-coded, so a
/// corrected grant list stays consistent with the target automatically.
/// Exceeding the target is a fatal error.
pub fn reconcile_strategic(entries: &mut Vec<AllocationEntry>) -> Result<(), AllocationError> {
    let target: Amount = STRATEGIC_TARGET.parse()?;
    let allocated = total(entries)?;
    let remainder = target.checked_sub(allocated).ok_or(AllocationError::OverAllocated {
        tranche: "strategic",
        target,
        actual: allocated,
    })?;
    entries.push(AllocationEntry {
        tranche: Tranche::Strategic,
        amount: remainder,
        vesting: Tranche::Strategic.vesting(),
    });
    Ok(())
}

/// Build the full ordered grant list: angel, seed, founders, advisors,
/// strategic (reconciled), employees.
pub fn build_entries() -> Result<Vec<AllocationEntry>, AllocationError> {
    let mut entries = Vec::new();
    for tranche in Tranche::ALL {
        let mut batch: Vec<AllocationEntry> = tranche
            .raw_amounts()
            .iter()
            .map(|raw| {
                Ok(AllocationEntry {
                    tranche,
                    amount: raw.parse()?,
                    vesting: tranche.vesting(),
                })
            })
            .collect::<Result<_, AllocationError>>()?;
        if tranche == Tranche::Strategic {
            reconcile_strategic(&mut batch)?;
        }
        entries.append(&mut batch);
    }
    Ok(entries)
}

/// Assert every published figure against the assembled table. Runs before
/// any schedule leaves the process: a mismatch here means the amounts are
/// wrong and nothing may be submitted.
pub fn validate_totals(entries: &[AllocationEntry]) -> Result<(), AllocationError> {
    let checks: &[(&'static str, &[Tranche], &str)] = &[
        ("angel", &[Tranche::Angel], ANGEL_TOTAL),
        ("seed", &[Tranche::Seed], SEED_TOTAL),
        (
            "founders+advisors",
            &[Tranche::Founders, Tranche::Advisors],
            FOUNDERS_AND_ADVISORS_TOTAL,
        ),
        ("strategic", &[Tranche::Strategic], STRATEGIC_TARGET),
        ("employees", &[Tranche::Employees], EMPLOYEES_TOTAL),
    ];

    for &(label, tranches, published) in checks {
        let expected: Amount = published.parse()?;
        let actual = sum_where(entries, |entry| tranches.contains(&entry.tranche))?;
        if actual != expected {
            return Err(AllocationError::TrancheTotalMismatch { tranche: label, expected, actual });
        }
    }

    let expected: Amount = GRAND_TOTAL.parse()?;
    let actual = total(entries)?;
    if actual != expected {
        return Err(AllocationError::GrandTotalMismatch { expected, actual });
    }
    Ok(())
}

fn sum_where(
    entries: &[AllocationEntry],
    pred: impl Fn(&AllocationEntry) -> bool,
) -> Result<Amount, AllocationError> {
    entries.iter().filter(|e| pred(e)).try_fold(Amount::ZERO, |acc, entry| {
        acc.checked_add(entry.amount).ok_or(AllocationError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<AllocationEntry> {
        build_entries().unwrap()
    }

    fn tranche_sum(entries: &[AllocationEntry], tranche: Tranche) -> Amount {
        sum_where(entries, |e| e.tranche == tranche).unwrap()
    }

    // ------------------------------------------------------------------
    // Table shape
    // ------------------------------------------------------------------

    #[test]
    fn entry_count_includes_synthetic() {
        // 68 explicit grants plus the strategic reconciliation entry.
        assert_eq!(entries().len(), 69);
    }

    #[test]
    fn per_tranche_counts() {
        let entries = entries();
        let count = |t| entries.iter().filter(|e| e.tranche == t).count();
        assert_eq!(count(Tranche::Angel), 1);
        assert_eq!(count(Tranche::Seed), 17);
        assert_eq!(count(Tranche::Founders), 5);
        assert_eq!(count(Tranche::Advisors), 5);
        assert_eq!(count(Tranche::Strategic), 22);
        assert_eq!(count(Tranche::Employees), 19);
    }

    #[test]
    fn payout_order_is_tranche_order() {
        let entries = entries();
        assert_eq!(entries.first().unwrap().tranche, Tranche::Angel);
        assert_eq!(entries.last().unwrap().tranche, Tranche::Employees);
        // Tranche boundaries never interleave.
        let positions: Vec<usize> = Tranche::ALL
            .iter()
            .map(|t| entries.iter().position(|e| e.tranche == *t).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn vesting_presets_per_tranche() {
        for entry in entries() {
            assert_eq!(entry.vesting, entry.tranche.vesting());
        }
        assert_eq!(Tranche::Seed.vesting(), STANDARD_VESTING);
        assert_eq!(Tranche::Employees.vesting(), TEAM_VESTING);
    }

    // ------------------------------------------------------------------
    // Published totals
    // ------------------------------------------------------------------

    #[test]
    fn angel_total() {
        assert_eq!(tranche_sum(&entries(), Tranche::Angel).to_string(), "202500000");
    }

    #[test]
    fn seed_total() {
        assert_eq!(tranche_sum(&entries(), Tranche::Seed).to_string(), "337500000");
    }

    #[test]
    fn founders_and_advisors_total() {
        let entries = entries();
        let combined = tranche_sum(&entries, Tranche::Founders)
            .checked_add(tranche_sum(&entries, Tranche::Advisors))
            .unwrap();
        assert_eq!(combined.to_string(), "568575000");
    }

    #[test]
    fn strategic_hits_target_after_reconciliation() {
        assert_eq!(tranche_sum(&entries(), Tranche::Strategic).to_string(), "150000000");
    }

    #[test]
    fn employees_total() {
        assert_eq!(
            tranche_sum(&entries(), Tranche::Employees).to_string(),
            "241398176.503760355067"
        );
    }

    #[test]
    fn grand_total_exact() {
        let sum = total(&entries()).unwrap();
        assert_eq!(sum.to_string(), GRAND_TOTAL);
        assert_eq!(sum.units(), 1_499_973_176_503_760_355_067);
    }

    #[test]
    fn validate_totals_passes() {
        validate_totals(&entries()).unwrap();
    }

    #[test]
    fn validate_totals_catches_a_tampered_entry() {
        let mut entries = entries();
        entries[0].amount = entries[0].amount.checked_add(Amount::from_units(1)).unwrap();
        assert!(matches!(
            validate_totals(&entries),
            Err(AllocationError::TrancheTotalMismatch { tranche: "angel", .. })
        ));
    }

    // ------------------------------------------------------------------
    // Strategic reconciliation
    // ------------------------------------------------------------------

    #[test]
    fn synthetic_entry_value() {
        let entries = entries();
        let synthetic = entries
            .iter()
            .filter(|e| e.tranche == Tranche::Strategic)
            .next_back()
            .unwrap();
        assert_eq!(synthetic.amount.to_string(), "11797752.808988797");
        assert_eq!(synthetic.vesting, STANDARD_VESTING);
    }

    #[test]
    fn synthetic_entry_is_computed_from_target() {
        let explicit: Amount = STRATEGIC
            .iter()
            .map(|raw| raw.parse::<Amount>().unwrap())
            .fold(Amount::ZERO, |acc, a| acc.checked_add(a).unwrap());
        let target: Amount = STRATEGIC_TARGET.parse().unwrap();
        let entries = entries();
        let synthetic = entries.iter().rfind(|e| e.tranche == Tranche::Strategic).unwrap();
        assert_eq!(synthetic.amount, target.checked_sub(explicit).unwrap());
    }

    #[test]
    fn reconcile_rejects_over_allocation() {
        let mut over = vec![AllocationEntry {
            tranche: Tranche::Strategic,
            amount: "150000001".parse().unwrap(),
            vesting: Tranche::Strategic.vesting(),
        }];
        assert!(matches!(
            reconcile_strategic(&mut over),
            Err(AllocationError::OverAllocated { tranche: "strategic", .. })
        ));
    }

    #[test]
    fn reconcile_on_exact_target_appends_zero() {
        let mut exact = vec![AllocationEntry {
            tranche: Tranche::Strategic,
            amount: STRATEGIC_TARGET.parse().unwrap(),
            vesting: Tranche::Strategic.vesting(),
        }];
        reconcile_strategic(&mut exact).unwrap();
        assert_eq!(exact.len(), 2);
        assert_eq!(exact[1].amount, Amount::ZERO);
    }

    // ------------------------------------------------------------------
    // Determinism
    // ------------------------------------------------------------------

    #[test]
    fn build_entries_deterministic() {
        assert_eq!(build_entries().unwrap(), build_entries().unwrap());
    }
}
