//! # FIFO Allocation Planner
//!
//! Turns "sell N units of product P" into an ordered list of batch draws.
//! This module only plans; `sweetstock-db` applies the plan inside a
//! transaction while holding the product's lock.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  First to expire, first out                                             │
//! │                                                                         │
//! │   key 1: expiry_date   ascending                                        │
//! │   key 2: purchased_at  ascending   (receipt order)                      │
//! │   key 3: batch_id      ascending   (total order, never a tie)           │
//! │                                                                         │
//! │  B1 exp 01-10 qty 5 ┐                                                   │
//! │  B2 exp 01-05 qty 5 ┼──► sorted: B2, B1                                 │
//! │                     ┘                                                   │
//! │  allocate 7 ──► [B2 × 5 @ cost(B2)] [B1 × 2 @ cost(B1)]                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## All or Nothing
//! Availability is summed before anything is drawn. If the batches cannot
//! cover the request the planner returns `InsufficientStock` and produces
//! no draws at all.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Allocation;
use crate::validation::validate_quantity;

/// The slice of a batch the planner needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FifoCandidate {
    pub batch_id: i64,
    pub expiry_date: NaiveDate,
    pub purchased_at: DateTime<Utc>,
    pub quantity_remaining: i64,
    pub unit_cost: Money,
}

/// Total order used for FIFO selection.
pub fn fifo_order(a: &FifoCandidate, b: &FifoCandidate) -> Ordering {
    a.expiry_date
        .cmp(&b.expiry_date)
        .then_with(|| a.purchased_at.cmp(&b.purchased_at))
        .then_with(|| a.batch_id.cmp(&b.batch_id))
}

/// Units still available across live candidates, saturating at `i64::MAX`.
pub fn total_available(candidates: &[FifoCandidate]) -> i64 {
    candidates
        .iter()
        .filter(|c| c.quantity_remaining > 0)
        .fold(0i64, |total, c| total.saturating_add(c.quantity_remaining))
}

/// Plans a FIFO draw of `requested` units for `product_id`.
///
/// Candidates may arrive in any order and may include exhausted batches;
/// both are handled here. Each returned allocation carries the unit cost of
/// its batch at planning time.
///
/// ## Errors
/// - `Validation` if `requested` ≤ 0
/// - `InsufficientStock` if live batches hold fewer than `requested` units
///   (including the case of no batches at all)
pub fn plan_allocation(
    product_id: i64,
    requested: i64,
    mut candidates: Vec<FifoCandidate>,
) -> CoreResult<Vec<Allocation>> {
    validate_quantity(requested)?;

    candidates.retain(|c| c.quantity_remaining > 0);

    let available = total_available(&candidates);
    if available < requested {
        return Err(CoreError::InsufficientStock {
            product_id,
            requested,
            available,
        });
    }

    candidates.sort_by(fifo_order);

    let mut outstanding = requested;
    let mut plan = Vec::new();

    for candidate in candidates {
        if outstanding == 0 {
            break;
        }

        let take = outstanding.min(candidate.quantity_remaining);
        plan.push(Allocation {
            batch_id: candidate.batch_id,
            quantity: take,
            unit_cost: candidate.unit_cost,
        });
        outstanding -= take;
    }

    Ok(plan)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn candidate(id: i64, expiry: NaiveDate, qty: i64, cost: i64) -> FifoCandidate {
        FifoCandidate {
            batch_id: id,
            expiry_date: expiry,
            purchased_at: at(9),
            quantity_remaining: qty,
            unit_cost: Money::from_paise(cost),
        }
    }

    #[test]
    fn test_earlier_expiry_drains_first() {
        let batches = vec![
            candidate(1, date(1, 10), 5, 1000),
            candidate(2, date(1, 5), 5, 900),
        ];

        let plan = plan_allocation(1, 7, batches).unwrap();

        assert_eq!(
            plan,
            vec![
                Allocation {
                    batch_id: 2,
                    quantity: 5,
                    unit_cost: Money::from_paise(900)
                },
                Allocation {
                    batch_id: 1,
                    quantity: 2,
                    unit_cost: Money::from_paise(1000)
                },
            ]
        );
    }

    #[test]
    fn test_same_expiry_uses_receipt_order() {
        let mut late = candidate(1, date(2, 1), 4, 500);
        late.purchased_at = at(15);
        let mut early = candidate(2, date(2, 1), 4, 600);
        early.purchased_at = at(8);

        let plan = plan_allocation(1, 3, vec![late, early]).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].batch_id, 2);
    }

    #[test]
    fn test_exact_fit_touches_no_extra_batch() {
        let batches = vec![
            candidate(1, date(1, 1), 3, 100),
            candidate(2, date(1, 2), 3, 100),
            candidate(3, date(1, 3), 3, 100),
        ];
        let plan = plan_allocation(1, 6, batches).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.iter().map(|a| a.quantity).sum::<i64>(), 6);
    }

    #[test]
    fn test_exhausted_batches_are_skipped() {
        let batches = vec![
            candidate(1, date(1, 1), 0, 100),
            candidate(2, date(1, 9), 4, 300),
        ];
        let plan = plan_allocation(1, 4, batches).unwrap();
        assert_eq!(plan[0].batch_id, 2);
    }

    #[test]
    fn test_insufficient_stock_reports_available() {
        let batches = vec![
            candidate(1, date(1, 1), 5, 100),
            candidate(2, date(1, 2), 4, 100),
        ];
        match plan_allocation(9, 12, batches) {
            Err(CoreError::InsufficientStock {
                product_id,
                requested,
                available,
            }) => {
                assert_eq!(product_id, 9);
                assert_eq!(requested, 12);
                assert_eq!(available, 9);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_no_batches_is_insufficient_not_missing() {
        let err = plan_allocation(3, 1, Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 0, .. }
        ));
    }

    #[test]
    fn test_non_positive_request_is_validation() {
        let err = plan_allocation(1, 0, vec![candidate(1, date(1, 1), 5, 1)]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_huge_remaining_totals_saturate() {
        let batches = vec![
            candidate(1, date(1, 1), i64::MAX, 1),
            candidate(2, date(1, 2), i64::MAX, 1),
        ];
        assert_eq!(total_available(&batches), i64::MAX);

        let plan = plan_allocation(1, 10, batches).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].quantity, 10);
    }

    // -------------------------------------------------------------------------
    // Conservation: Σ initial − Σ allocated == Σ remaining after every step
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Purchase { qty: i64, expiry_offset: i64 },
        Sale { qty: i64 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..50, 0i64..60).prop_map(|(qty, expiry_offset)| Op::Purchase { qty, expiry_offset }),
            (1i64..80).prop_map(|qty| Op::Sale { qty }),
        ]
    }

    proptest! {
        #[test]
        fn prop_ledger_conserves_units(ops in prop::collection::vec(op(), 1..40)) {
            let base = date(1, 1);
            let mut ledger: Vec<FifoCandidate> = Vec::new();
            let mut initial_total = 0i64;
            let mut allocated_total = 0i64;

            for (step, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Purchase { qty, expiry_offset } => {
                        ledger.push(FifoCandidate {
                            batch_id: step as i64 + 1,
                            expiry_date: base + Duration::days(expiry_offset),
                            purchased_at: at(0) + Duration::minutes(step as i64),
                            quantity_remaining: qty,
                            unit_cost: Money::from_paise(100),
                        });
                        initial_total += qty;
                    }
                    Op::Sale { qty } => {
                        let before: Vec<i64> = ledger.iter().map(|b| b.quantity_remaining).collect();
                        match plan_allocation(1, qty, ledger.clone()) {
                            Ok(plan) => {
                                prop_assert_eq!(plan.iter().map(|a| a.quantity).sum::<i64>(), qty);
                                for draw in plan {
                                    let batch = ledger
                                        .iter_mut()
                                        .find(|b| b.batch_id == draw.batch_id)
                                        .unwrap();
                                    prop_assert!(draw.quantity > 0);
                                    prop_assert!(draw.quantity <= batch.quantity_remaining);
                                    batch.quantity_remaining -= draw.quantity;
                                    allocated_total += draw.quantity;
                                }
                            }
                            Err(CoreError::InsufficientStock { available, .. }) => {
                                prop_assert!(available < qty);
                                let after: Vec<i64> = ledger.iter().map(|b| b.quantity_remaining).collect();
                                prop_assert_eq!(before, after);
                            }
                            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                        }
                    }
                }

                let remaining: i64 = ledger.iter().map(|b| b.quantity_remaining).sum();
                prop_assert!(ledger.iter().all(|b| b.quantity_remaining >= 0));
                prop_assert_eq!(initial_total - allocated_total, remaining);
            }
        }
    }
}
