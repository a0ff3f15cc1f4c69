use bevy_ecs::prelude::Resource;

/// Day start, 06:00.
const DEFAULT_DAY_START_MIN: u32 = 6 * 60;
/// Day end, 19:00.
const DEFAULT_DAY_END_MIN: u32 = 19 * 60;

/// Parameters for one dispatch day. Every field has a working default; the
/// `with_*` builders override the common ones.
#[derive(Debug, Clone, Resource)]
pub struct DispatchParams {
    pub day_start_min: u32,
    pub day_end_min: u32,
    pub tick_step_min: u32,
    /// Wall-clock pause between ticks. Cosmetic pacing, not a correctness
    /// constraint.
    pub real_sleep_secs: f64,
    /// Forward window inside which assigned pickups freeze.
    pub lock_window_min: u32,
    /// Forward window inside which the urgency pass waives availability.
    pub urgent_window_min: u32,
    /// Minutes a vehicle spends on turnaround after each trip.
    pub service_time_min: u32,
    /// Plan-size cap enforced by the urgency pass.
    pub overload_cap: usize,
    /// Softer plan-size cap used by the end-of-day sweep.
    pub overload_cap_final: usize,
    /// Highest class the upgrade pass may shadow a booking into.
    pub class_upgrade_max: u8,
    /// Assumed deadhead speed for the availability test, km/h.
    pub deadhead_speed_kmh: f64,
    /// Seed for the instant load-time draw.
    pub seed: u64,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            day_start_min: DEFAULT_DAY_START_MIN,
            day_end_min: DEFAULT_DAY_END_MIN,
            tick_step_min: 30,
            real_sleep_secs: 6.0,
            lock_window_min: 120,
            urgent_window_min: 60,
            service_time_min: 30,
            overload_cap: 8,
            overload_cap_final: 10,
            class_upgrade_max: 9,
            deadhead_speed_kmh: 40.0,
            seed: 0,
        }
    }
}

impl DispatchParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the simulated day window, minutes since midnight.
    pub fn with_day(mut self, day_start_min: u32, day_end_min: u32) -> Self {
        self.day_start_min = day_start_min;
        self.day_end_min = day_end_min;
        self
    }

    pub fn with_tick_step(mut self, tick_step_min: u32) -> Self {
        self.tick_step_min = tick_step_min;
        self
    }

    /// Set the inter-tick pause; 0 disables pacing entirely.
    pub fn with_real_sleep(mut self, secs: f64) -> Self {
        self.real_sleep_secs = secs;
        self
    }

    pub fn with_deadhead_speed(mut self, kmh: f64) -> Self {
        self.deadhead_speed_kmh = kmh;
        self
    }
}
