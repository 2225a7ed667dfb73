use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Scheduler timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Period of the health pass
    pub tick_interval: Duration,
    /// Delay from startup to the first archival pass
    pub archival_first_check: Duration,
    /// Period of the archival pass after the first one
    pub archival_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            archival_first_check: Duration::from_secs(2),
            archival_interval: Duration::from_secs(10),
        }
    }
}

/// Drives the health pass on every tick and the archival pass whenever its
/// deadline has passed.
#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    next_archival_deadline: Instant,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig, start: Instant) -> Self {
        let next_archival_deadline = start + config.archival_first_check;
        Self {
            config,
            next_archival_deadline,
        }
    }

    /// Ticker whose first tick fires one interval after `start`.
    ///
    /// Late ticks are delayed rather than bursted.
    pub fn ticker(&self, start: Instant) -> Interval {
        let mut interval =
            tokio::time::interval_at(start + self.config.tick_interval, self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    pub fn next_archival_deadline(&self) -> Instant {
        self.next_archival_deadline
    }

    /// Returns true if the archival pass is due, advancing the deadline.
    pub fn archival_due(&mut self, now: Instant) -> bool {
        if now < self.next_archival_deadline {
            return false;
        }
        self.next_archival_deadline = now + self.config.archival_interval;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_config_default() {
        let config = SchedulerConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.archival_first_check, Duration::from_secs(2));
        assert_eq!(config.archival_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_archival_every_tenth_tick() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(SchedulerConfig::default(), start);

        let due: Vec<u64> = (1..=40)
            .filter(|&tick| scheduler.archival_due(start + Duration::from_secs(tick)))
            .collect();

        assert_eq!(due, vec![2, 12, 22, 32]);
    }

    #[test]
    fn test_deadline_advances_from_now() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(SchedulerConfig::default(), start);

        // A late tick pushes the next deadline relative to when it ran
        let late = start + Duration::from_secs(7);
        assert!(scheduler.archival_due(late));
        assert_eq!(
            scheduler.next_archival_deadline(),
            late + Duration::from_secs(10)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_first_tick_after_interval() {
        let start = Instant::now();
        let scheduler = Scheduler::new(SchedulerConfig::default(), start);
        let mut ticker = scheduler.ticker(start);

        let first = ticker.tick().await;
        assert_eq!(first, start + Duration::from_secs(1));
        let second = ticker.tick().await;
        assert_eq!(second, start + Duration::from_secs(2));
    }
}
