//! Splitting deposits into charge groups.
//!
//! Carriers of one deposit are transported in groups of `charge_per_step`
//! that share a single trajectory. When that would exceed
//! `max_charge_groups`, the group size grows to `ceil(charge / max)`.

/// Group size chosen for one deposit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupPlan {
    /// Carriers per group; the last group may be smaller.
    pub group_size: u32,
    /// Whether the size was raised to respect the group limit.
    pub coarsened: bool,
}

impl GroupPlan {
    /// Plan for a deposit of `charge` carriers.
    ///
    /// `max_charge_groups == 0` disables the limit.
    pub fn new(charge: u32, charge_per_step: u32, max_charge_groups: u32) -> Self {
        let charge_per_step = charge_per_step.max(1);
        if max_charge_groups > 0 && charge.div_ceil(charge_per_step) > max_charge_groups {
            Self {
                group_size: charge.div_ceil(max_charge_groups),
                coarsened: true,
            }
        } else {
            Self {
                group_size: charge_per_step,
                coarsened: false,
            }
        }
    }
}

/// Iterator over the group sizes of one deposit.
///
/// Yields full groups followed by a truncated remainder; the sizes sum to
/// the deposit charge exactly.
#[derive(Clone, Debug)]
pub struct ChargeGroups {
    remaining: u32,
    group_size: u32,
}

impl ChargeGroups {
    /// Groups of `plan.group_size` covering `charge` carriers.
    pub fn new(charge: u32, plan: GroupPlan) -> Self {
        Self {
            remaining: charge,
            group_size: plan.group_size.max(1),
        }
    }
}

impl Iterator for ChargeGroups {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let group = self.group_size.min(self.remaining);
        self.remaining -= group;
        Some(group)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.div_ceil(self.group_size) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ChargeGroups {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn groups(charge: u32, per_step: u32, max: u32) -> Vec<u32> {
        ChargeGroups::new(charge, GroupPlan::new(charge, per_step, max)).collect()
    }

    #[test]
    fn exact_multiple() {
        assert_eq!(groups(100, 10, 1000), vec![10; 10]);
    }

    #[test]
    fn remainder_in_last_group() {
        assert_eq!(groups(25, 10, 0), vec![10, 10, 5]);
    }

    #[test]
    fn zero_charge_yields_nothing() {
        assert!(groups(0, 10, 1000).is_empty());
    }

    #[test]
    fn coarsening_caps_group_count() {
        let plan = GroupPlan::new(5000, 10, 100);
        assert_eq!(
            plan,
            GroupPlan {
                group_size: 50,
                coarsened: true
            }
        );
        let g = groups(5000, 10, 100);
        assert_eq!(g.len(), 100);
        assert!(g.iter().all(|&s| s == 50));
    }

    #[test]
    fn limit_rounds_up() {
        // 1005 / 10 = 100.5 groups exceeds 100 even though integer division would not
        let g = groups(1005, 10, 100);
        assert!(g.len() <= 100);
        assert_eq!(g.iter().sum::<u32>(), 1005);
    }

    #[test]
    fn exact_size() {
        let it = ChargeGroups::new(25, GroupPlan::new(25, 10, 0));
        assert_eq!(it.len(), 3);
    }

    proptest! {
        #[test]
        fn groups_conserve_charge_and_respect_limit(
            charge in 0u32..200_000,
            per_step in 1u32..500,
            max in 0u32..2000,
        ) {
            let g = groups(charge, per_step, max);
            prop_assert_eq!(g.iter().map(|&s| u64::from(s)).sum::<u64>(), u64::from(charge));
            prop_assert!(g.iter().all(|&s| s > 0));
            if max > 0 {
                prop_assert!(g.len() as u64 <= u64::from(max));
            }
        }
    }
}
