//! Run-wide transport statistics.
//!
//! [`RunStatistics`] is shared by all workers of a run and updated with
//! relaxed atomic adds; it observes results but never influences them.
//! Each event additionally produces an [`EventSummary`] that is folded
//! into the run totals once the event completes.

use std::sync::atomic::{AtomicU64, Ordering};

use chargeprop_core::units::PS;

/// Per-event totals, logged at the end of every event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSummary {
    /// Carriers propagated, before gain.
    pub propagated_charge: u64,
    /// Carriers in groups that ended recombined.
    pub recombined_charge: u64,
    /// Carriers in groups that ended trapped.
    pub trapped_charge: u64,
    /// Charge groups transported.
    pub charge_groups: u64,
    /// Integration steps taken over all groups.
    pub integration_steps: u64,
    /// Sum over groups of group size times transport time.
    pub weighted_time: f64,
    /// Deposits that were propagated.
    pub deposits: u64,
    /// Deposits skipped by carrier type or integration window.
    pub skipped_deposits: u64,
    /// Deposits whose group size was increased to respect `max_charge_groups`.
    pub coarsened_deposits: u64,
}

impl EventSummary {
    /// Charge-weighted mean transport time.
    pub fn average_time(&self) -> f64 {
        self.weighted_time / self.propagated_charge.max(1) as f64
    }

    /// Log the event totals at info level.
    pub fn report(&self) {
        log::info!(
            "Propagated {} charges in {} groups ({} steps) in average time of {:.4} ns",
            self.propagated_charge,
            self.charge_groups,
            self.integration_steps,
            self.average_time()
        );
        log::info!(
            "Recombined {} charges during transport",
            self.recombined_charge
        );
        log::info!("Trapped {} charges during transport", self.trapped_charge);
    }
}

/// Run-scoped counters, zeroed at construction.
#[derive(Debug, Default)]
pub struct RunStatistics {
    events: AtomicU64,
    propagated_charge: AtomicU64,
    recombined_charge: AtomicU64,
    trapped_charge: AtomicU64,
    charge_groups: AtomicU64,
    integration_steps: AtomicU64,
    total_time_ps: AtomicU64,
    deposits: AtomicU64,
    skipped_deposits: AtomicU64,
    coarsened_deposits: AtomicU64,
}

/// Point-in-time copy of [`RunStatistics`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatisticsSnapshot {
    /// Events folded in.
    pub events: u64,
    /// Carriers propagated, before gain.
    pub propagated_charge: u64,
    /// Carriers that recombined.
    pub recombined_charge: u64,
    /// Carriers that were trapped.
    pub trapped_charge: u64,
    /// Charge groups transported.
    pub charge_groups: u64,
    /// Integration steps taken.
    pub integration_steps: u64,
    /// Charge-weighted transport time in picoseconds.
    pub total_time_ps: u64,
    /// Deposits propagated.
    pub deposits: u64,
    /// Deposits skipped.
    pub skipped_deposits: u64,
    /// Deposits with coarsened group size.
    pub coarsened_deposits: u64,
}

impl RunStatistics {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event's totals into the run.
    pub fn record(&self, summary: &EventSummary) {
        let add = |counter: &AtomicU64, value: u64| {
            counter.fetch_add(value, Ordering::Relaxed);
        };
        add(&self.events, 1);
        add(&self.propagated_charge, summary.propagated_charge);
        add(&self.recombined_charge, summary.recombined_charge);
        add(&self.trapped_charge, summary.trapped_charge);
        add(&self.charge_groups, summary.charge_groups);
        add(&self.integration_steps, summary.integration_steps);
        add(&self.total_time_ps, (summary.weighted_time / PS).round() as u64);
        add(&self.deposits, summary.deposits);
        add(&self.skipped_deposits, summary.skipped_deposits);
        add(&self.coarsened_deposits, summary.coarsened_deposits);
    }

    /// Current values of all counters.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        StatisticsSnapshot {
            events: load(&self.events),
            propagated_charge: load(&self.propagated_charge),
            recombined_charge: load(&self.recombined_charge),
            trapped_charge: load(&self.trapped_charge),
            charge_groups: load(&self.charge_groups),
            integration_steps: load(&self.integration_steps),
            total_time_ps: load(&self.total_time_ps),
            deposits: load(&self.deposits),
            skipped_deposits: load(&self.skipped_deposits),
            coarsened_deposits: load(&self.coarsened_deposits),
        }
    }

    /// Log the run totals at info level.
    pub fn report(&self, charge_per_step: u32, max_charge_groups: u32) {
        let s = self.snapshot();
        let average_ns = s.total_time_ps as f64 * PS / s.propagated_charge.max(1) as f64;
        log::info!(
            "Propagated total of {} charges in {} groups ({} steps) in average time of {:.4} ns",
            s.propagated_charge,
            s.charge_groups,
            s.integration_steps,
            average_ns
        );
        if s.deposits > 0 {
            log::info!(
                "{:.2}% of deposits have charge exceeding the {} charge groups allowed, with a charge_per_step value of {}",
                s.coarsened_deposits as f64 * 100.0 / s.deposits as f64,
                max_charge_groups,
                charge_per_step
            );
        }
        if s.skipped_deposits > 0 {
            log::info!("Skipped {} deposits", s.skipped_deposits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn summary() -> EventSummary {
        EventSummary {
            propagated_charge: 100,
            recombined_charge: 10,
            trapped_charge: 5,
            charge_groups: 10,
            integration_steps: 420,
            weighted_time: 100.0 * 2.5,
            deposits: 1,
            skipped_deposits: 2,
            coarsened_deposits: 1,
        }
    }

    #[test]
    fn new_statistics_are_zero() {
        assert_eq!(RunStatistics::new().snapshot(), StatisticsSnapshot::default());
    }

    #[test]
    fn record_accumulates() {
        let stats = RunStatistics::new();
        stats.record(&summary());
        stats.record(&summary());
        let s = stats.snapshot();
        assert_eq!(s.events, 2);
        assert_eq!(s.propagated_charge, 200);
        assert_eq!(s.integration_steps, 840);
        assert_eq!(s.total_time_ps, 2 * 250_000);
        assert_eq!(s.skipped_deposits, 4);
    }

    #[test]
    fn average_time_guards_empty_event() {
        assert_eq!(EventSummary::default().average_time(), 0.0);
        assert_eq!(summary().average_time(), 2.5);
    }

    #[test]
    fn concurrent_recording() {
        let stats = Arc::new(RunStatistics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record(&summary());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let s = stats.snapshot();
        assert_eq!(s.events, 400);
        assert_eq!(s.charge_groups, 4000);
    }
}
