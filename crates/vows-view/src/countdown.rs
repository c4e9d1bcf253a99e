use chrono::{DateTime, Utc};

/// Live countdown to a target instant.
///
/// Holds only the target; every `remaining` call recomputes the difference
/// from scratch, so there is no drift to accumulate and retargeting takes
/// effect on the very next tick.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    target: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Counting {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    /// The target is now or in the past.
    Expired,
}

impl Countdown {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Swap the target mid-run; the next `remaining` call counts toward the
    /// new instant with no smoothing.
    pub fn retarget(&mut self, target: DateTime<Utc>) {
        self.target = target;
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        let difference = self.target.signed_duration_since(now);
        if difference.num_milliseconds() <= 0 {
            return Remaining::Expired;
        }

        let total_seconds = difference.num_milliseconds() / 1000;

        Remaining::Counting {
            days: total_seconds / 86_400,
            hours: (total_seconds / 3_600) % 24,
            minutes: (total_seconds / 60) % 60,
            seconds: total_seconds % 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse::<DateTime<Utc>>().unwrap()
    }

    #[test]
    fn one_day_out() {
        let countdown = Countdown::new(at("2026-12-05T00:00:00+09:00"));
        let remaining = countdown.remaining(at("2026-12-04T00:00:00+09:00"));
        assert_eq!(
            remaining,
            Remaining::Counting {
                days: 1,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn decomposition_sums_back_to_total_seconds() {
        let target = at("2026-12-05T14:00:00+09:00");
        let countdown = Countdown::new(target);

        for now in [
            at("2026-12-04T23:59:59+09:00"),
            at("2026-01-01T00:00:00Z"),
            at("2026-12-05T13:59:58+09:00"),
            at("2025-08-30T07:12:45Z"),
        ] {
            match countdown.remaining(now) {
                Remaining::Counting {
                    days,
                    hours,
                    minutes,
                    seconds,
                } => {
                    let expected = (target - now).num_milliseconds() / 1000;
                    assert_eq!(days * 86_400 + hours * 3_600 + minutes * 60 + seconds, expected);
                    assert!((0..24).contains(&hours));
                    assert!((0..60).contains(&minutes));
                    assert!((0..60).contains(&seconds));
                }
                Remaining::Expired => panic!("target is in the future of {}", now),
            }
        }
    }

    #[test]
    fn past_and_present_targets_expire() {
        let target = at("2026-12-05T14:00:00+09:00");
        let countdown = Countdown::new(target);

        assert_eq!(countdown.remaining(target), Remaining::Expired);
        assert_eq!(
            countdown.remaining(at("2026-12-05T14:00:01+09:00")),
            Remaining::Expired
        );
        assert_eq!(countdown.remaining(at("2030-01-01T00:00:00Z")), Remaining::Expired);
    }

    #[test]
    fn sub_second_remainder_counts_as_zero_not_expired() {
        let target = at("2026-12-05T14:00:00Z");
        let countdown = Countdown::new(target);
        let now = target - chrono::Duration::milliseconds(400);

        assert_eq!(
            countdown.remaining(now),
            Remaining::Counting {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn retarget_restarts_from_new_target() {
        let mut countdown = Countdown::new(at("2026-12-05T00:00:00Z"));
        countdown.retarget(at("2027-06-01T00:00:00Z"));

        match countdown.remaining(at("2027-05-31T00:00:00Z")) {
            Remaining::Counting { days, .. } => assert_eq!(days, 1),
            Remaining::Expired => panic!("new target is a day out"),
        }
    }
}
