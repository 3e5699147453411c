/// # Ramp
///
/// Linear progress of one value toward a target over a duration in milliseconds. Each step adds
/// `dt / duration * |to - from|` in the direction of the target, so the value may also be moved by
/// something else meanwhile. The last step snaps exactly to the target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ramp {
    from: f32,
    to: f32,
    duration: f32,
    o_duration: f32,
    delta: f32,
    direction: f32,
}

impl Ramp {
    /// Returns a ramp from `from` to `to` lasting `duration` milliseconds.
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        let delta = to - from;
        Self {
            from,
            to,
            duration,
            o_duration: duration,
            delta,
            direction: if delta > 0.0 {
                1.0
            } else if delta < 0.0 {
                -1.0
            } else {
                0.0
            },
        }
    }

    /// Returns the start value.
    pub fn from(&self) -> f32 {
        self.from
    }

    /// Returns the target value.
    pub fn to(&self) -> f32 {
        self.to
    }

    /// Returns the remaining duration.
    pub fn remaining(&self) -> f32 {
        self.duration
    }

    /// Advances `value` by `dt` milliseconds. Returns the new value and true once the duration is
    /// exhausted.
    pub fn step(&mut self, value: f32, dt: f32) -> (f32, bool) {
        if self.o_duration <= 0.0 {
            self.duration = 0.0;
            return (self.to, true);
        }

        let mut value = value + dt / self.o_duration * self.direction * self.delta.abs();
        self.duration -= dt;

        if (self.direction > 0.0 && value > self.to) || (self.direction < 0.0 && value < self.to) {
            value = self.to;
        }

        if self.duration <= 0.0 {
            (self.to, true)
        } else {
            (value, false)
        }
    }
}
