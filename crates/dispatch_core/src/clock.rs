//! Fixed-step simulated clock over one dispatch day.

use bevy_ecs::prelude::Resource;

#[derive(Debug, Clone, Resource)]
pub struct DispatchClock {
    now: u32,
    day_start: u32,
    day_end: u32,
    step_min: u32,
}

impl DispatchClock {
    pub fn new(day_start: u32, day_end: u32, step_min: u32) -> Self {
        debug_assert!(step_min > 0, "tick step must be positive");
        Self {
            now: day_start,
            day_start,
            day_end,
            step_min,
        }
    }

    /// Current simulated time, minutes since midnight.
    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn day_start(&self) -> u32 {
        self.day_start
    }

    pub fn day_end(&self) -> u32 {
        self.day_end
    }

    pub fn step_min(&self) -> u32 {
        self.step_min
    }

    /// Step to the next tick. Returns `false` once the day is over.
    pub fn advance(&mut self) -> bool {
        self.now += self.step_min;
        self.now < self.day_end
    }

    pub fn is_over(&self) -> bool {
        self.now >= self.day_end
    }

    /// Number of ticks a full day produces.
    pub fn ticks_total(&self) -> u32 {
        let span = self.day_end.saturating_sub(self.day_start);
        span.div_ceil(self.step_min)
    }
}

/// Render minutes since midnight as `HH:MM`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60 % 24, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_from_day_start_to_day_end() {
        let mut clock = DispatchClock::new(360, 480, 30);
        assert_eq!(clock.now(), 360);
        assert!(!clock.is_over());

        let mut ticks = 1;
        while clock.advance() {
            ticks += 1;
        }
        assert_eq!(ticks, clock.ticks_total());
        assert!(clock.is_over());
        assert_eq!(clock.now(), 480);
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_hhmm(360), "06:00");
        assert_eq!(format_hhmm(1139), "18:59");
        assert_eq!(format_hhmm(0), "00:00");
    }
}
