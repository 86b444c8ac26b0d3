use std::{thread::sleep, time::{Duration, Instant}};

/// Fixed-rate throttle for the main loop.
pub struct Clock {
    period: Duration,
    next_tick: Instant,
}

impl Clock {
    pub fn new(ticks_per_second: u32) -> Self {
        let period = Duration::from_secs(1) / ticks_per_second.max(1);
        Clock { period, next_tick: Instant::now() + period }
    }

    #[cfg(test)]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps until the next tick boundary. A late caller is not made to catch
    /// up; the schedule restarts from now instead.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next_tick {
            sleep(self.next_tick - now);
            self.next_tick += self.period;
        } else {
            self.next_tick = now + self.period;
        }
    }
}
