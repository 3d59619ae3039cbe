//! Adaptive poll interval calculation
//!
//! The softener reports an instantaneous flow rate with every reading.
//! While water is moving the monitor polls at the floor interval to track
//! the active cycle closely; once the device goes idle the interval
//! doubles after every poll until it reaches the ceiling and stays there.
//! Doubling instead of jumping straight back to the ceiling avoids
//! oscillation around short draws.

use std::time::Duration;

/// Fastest allowed poll cadence, used whenever water is flowing
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Slowest allowed poll cadence, the idle baseline
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Decide how long to wait before the next poll
///
/// `current` is the interval actually used for the just-completed poll,
/// `None` on the very first call after startup. `current_flow_l_h` is the
/// flow rate from the reading just obtained.
///
/// Rules, first match wins:
/// 1. water flowing: drop straight to `min`
/// 2. no prior interval: start at the idle baseline `max`
/// 3. already at or above the ceiling: stay put
/// 4. otherwise: double, clamped to `max`
pub fn next_poll_interval(
    current: Option<Duration>,
    current_flow_l_h: u32,
    min: Duration,
    max: Duration,
) -> Duration {
    if current_flow_l_h > 0 {
        return min;
    }

    match current {
        None => max,
        Some(interval) if interval >= max => interval,
        Some(interval) => (interval * 2).min(max),
    }
}

/// [`next_poll_interval`] with the default `[1 s, 30 s]` bounds
pub fn next_interval(current: Option<Duration>, current_flow_l_h: u32) -> Duration {
    next_poll_interval(current, current_flow_l_h, MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(Duration::from_secs(1)))]
    #[case(Some(Duration::from_secs(8)))]
    #[case(Some(Duration::from_secs(30)))]
    fn active_flow_always_returns_floor(#[case] current: Option<Duration>) {
        assert_eq!(next_interval(current, 350), MIN_POLL_INTERVAL);
        assert_eq!(next_interval(current, 1), MIN_POLL_INTERVAL);
    }

    #[test]
    fn first_idle_poll_starts_at_ceiling() {
        assert_eq!(next_interval(None, 0), MAX_POLL_INTERVAL);
    }

    #[test]
    fn ceiling_is_sticky() {
        let mut interval = MAX_POLL_INTERVAL;
        for _ in 0..10 {
            interval = next_interval(Some(interval), 0);
            assert_eq!(interval, MAX_POLL_INTERVAL);
        }
    }

    #[rstest]
    #[case(1, 2)]
    #[case(2, 4)]
    #[case(4, 8)]
    #[case(20, 30)]
    fn idle_interval_doubles_clamped(#[case] current_secs: u64, #[case] expected_secs: u64) {
        assert_eq!(
            next_interval(Some(Duration::from_secs(current_secs)), 0),
            Duration::from_secs(expected_secs)
        );
    }

    #[test]
    fn idle_recovery_from_floor_reaches_ceiling_within_five_steps() {
        let mut interval = MIN_POLL_INTERVAL;
        let mut steps = 0;

        while interval < MAX_POLL_INTERVAL {
            let next = next_interval(Some(interval), 0);
            assert!(next >= interval, "recovery must never decrease");
            interval = next;
            steps += 1;
            assert!(steps <= 5, "ceiling not reached after {} steps", steps);
        }

        assert_eq!(interval, MAX_POLL_INTERVAL);
    }

    #[test]
    fn flow_drops_interval_without_ramp_down() {
        // A single active reading goes straight to the floor, no matter
        // how far the interval had backed off.
        for idle_secs in [2u64, 8, 16, 30] {
            assert_eq!(
                next_interval(Some(Duration::from_secs(idle_secs)), 42),
                MIN_POLL_INTERVAL
            );
        }
    }

    proptest! {
        #[test]
        fn any_active_flow_returns_floor(
            flow in 1u32..=10_000,
            current_ms in proptest::option::of(0u64..=60_000),
        ) {
            let current = current_ms.map(Duration::from_millis);
            prop_assert_eq!(next_interval(current, flow), MIN_POLL_INTERVAL);
        }

        #[test]
        fn idle_result_is_bounded_and_monotonic(current_ms in 1u64..=30_000) {
            let current = Duration::from_millis(current_ms);
            let next = next_interval(Some(current), 0);

            prop_assert!(next >= current);
            prop_assert!(next <= MAX_POLL_INTERVAL);
        }
    }
}
