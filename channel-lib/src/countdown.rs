//! This module contains the shared countdown, that runs while the session is playing.

/// What a heartbeat of the countdown produced.
#[derive(Debug, PartialEq, Eq)]
pub enum CountdownEvent {
    /// Less than a second accumulated, nothing visible happened.
    Unchanged,
    /// One or more whole seconds elapsed, time is still left.
    Ticked,
    /// The clock just reached zero. Fires exactly once.
    Expired,
}

/// A once-per-second countdown fed with per-frame delta times.
///
/// The two peers run independent countdowns that are not synchronized;
/// only the expiry outcome is broadcast, so both sessions converge on the
/// loss even if the clocks drift apart by a frame or two.
pub struct Countdown {
    remaining_seconds: u32,
    accumulator: f32,
    expired_reported: bool,
}

impl Countdown {
    pub fn new(seconds: u32) -> Countdown {
        Countdown {
            remaining_seconds: seconds,
            accumulator: 0.0,
            expired_reported: false,
        }
    }

    /// Advances the clock. Call once per frame while the session is playing;
    /// in any other phase simply do not call it and the clock freezes.
    pub fn update(&mut self, delta_time: f32) -> CountdownEvent {
        if self.remaining_seconds > 0 {
            self.accumulator += delta_time;
            let mut ticked = false;
            while self.accumulator >= 1.0 && self.remaining_seconds > 0 {
                self.accumulator -= 1.0;
                self.remaining_seconds -= 1;
                ticked = true;
            }
            if self.remaining_seconds > 0 {
                return if ticked {
                    CountdownEvent::Ticked
                } else {
                    CountdownEvent::Unchanged
                };
            }
        }

        // Zero, whether by ticking down or by a penalty.
        if self.expired_reported {
            CountdownEvent::Unchanged
        } else {
            self.expired_reported = true;
            CountdownEvent::Expired
        }
    }

    /// Subtracts a hazard penalty. Reaching zero this way is reported by the
    /// next [`Countdown::update`] call, keeping expiry single-sourced.
    pub fn penalize(&mut self, seconds: u32) {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(seconds);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_seconds
    }

    /// Formats the clock as `m:ss` for the header display.
    pub fn formatted(&self) -> String {
        format!(
            "{}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_seconds_tick_the_clock() {
        let mut countdown = Countdown::new(60);

        // Thirty frames of a 60 fps loop: no visible change.
        for _ in 0..30 {
            assert_eq!(countdown.update(1.0 / 60.0), CountdownEvent::Unchanged);
        }
        assert_eq!(countdown.remaining(), 60);

        // The rest of the second arrives.
        assert_eq!(countdown.update(0.6), CountdownEvent::Ticked);
        assert_eq!(countdown.remaining(), 59);
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let mut countdown = Countdown::new(2);
        assert_eq!(countdown.update(1.0), CountdownEvent::Ticked);
        assert_eq!(countdown.update(1.0), CountdownEvent::Expired);
        assert_eq!(countdown.update(1.0), CountdownEvent::Unchanged);
        assert_eq!(countdown.update(5.0), CountdownEvent::Unchanged);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn penalty_shortens_the_clock() {
        let mut countdown = Countdown::new(300);
        countdown.penalize(30);
        assert_eq!(countdown.remaining(), 270);

        // Penalties below zero saturate and expiry still reports once.
        countdown.penalize(400);
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.update(0.1), CountdownEvent::Unchanged);
    }

    #[test]
    fn penalty_to_zero_expires_on_next_update() {
        let mut countdown = Countdown::new(20);
        countdown.penalize(20);
        assert_eq!(countdown.update(0.016), CountdownEvent::Expired);
    }

    #[test]
    fn formatting_matches_the_header_display() {
        assert_eq!(Countdown::new(300).formatted(), "5:00");
        assert_eq!(Countdown::new(61).formatted(), "1:01");
        assert_eq!(Countdown::new(9).formatted(), "0:09");
    }
}
