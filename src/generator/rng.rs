use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// A pseudorandom source whose cursor can be stepped forward and backward
/// through a deterministic sequence of draw *steps*.
///
/// A master generator seeded from the caller's seed emits one sub-seed per
/// step; the draw generator is re-armed from the cursor's sub-seed whenever
/// the cursor moves. A step may consume any number of draws: reversing to a
/// step and drawing again reproduces that step's draws bit for bit, and
/// advancing afterwards lands on the next step's sub-seed no matter how many
/// draws the replay consumed. Memory is proportional to the furthest step
/// reached.
pub struct ReversibleRng {
    master: StdRng,
    step_seeds: Vec<u64>,
    cursor: usize,
    draw: StdRng,
}

impl ReversibleRng {
    pub fn new(seed: u64) -> Self {
        let mut master = StdRng::seed_from_u64(seed);
        let first = master.next_u64();
        ReversibleRng {
            master,
            step_seeds: vec![first],
            cursor: 0,
            draw: StdRng::seed_from_u64(first),
        }
    }

    /// Move the cursor one step forward, re-arming the draw stream on the
    /// next scheduled sub-seed.
    pub fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.step_seeds.len() {
            self.step_seeds.push(self.master.next_u64());
        }
        self.rearm();
    }

    /// Move the cursor one step backward, so the step being undone will
    /// reproduce its draws identically. Saturates at the initial position.
    pub fn reverse(&mut self) {
        // Re-arm on the current step before moving the cursor: the undo
        // logic replays the draws of the step it is unwinding, while the
        // next advance re-arms that same sub-seed again.
        self.rearm();
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Return the cursor to the seed position.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.rearm();
    }

    fn rearm(&mut self) {
        self.draw = StdRng::seed_from_u64(self.step_seeds[self.cursor]);
    }

    /// Uniform index in `[0, bound)`. One draw.
    pub fn next_index(&mut self, bound: usize) -> usize {
        self.draw.random_range(0..bound)
    }

    /// Uniform in `[0, 1)`. One draw.
    pub fn next_f64(&mut self) -> f64 {
        self.draw.random()
    }

    /// Uniform in `[0, bound)`. One draw.
    pub fn next_f64_below(&mut self, bound: f64) -> f64 {
        self.draw.random_range(0.0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_replays_draws_exactly() {
        let mut rng = ReversibleRng::new(42);
        let first = (rng.next_index(100), rng.next_f64());
        rng.advance();
        let second = (rng.next_index(100), rng.next_f64());
        rng.reverse();
        // Replaying the step reproduces its draws even though the replay
        // starts after a different number of consumed values.
        assert_eq!((rng.next_index(100), rng.next_f64()), second);
        rng.reverse();
        assert_eq!((rng.next_index(100), rng.next_f64()), first);
    }

    #[test]
    fn test_advance_after_reverse_is_unaffected_by_replay_draws() {
        let mut rng = ReversibleRng::new(7);
        rng.advance();
        let scheduled = rng.next_index(1000);
        rng.reverse();
        // Consume a different number of draws than the original step did.
        let _ = rng.next_f64();
        let _ = rng.next_f64();
        let _ = rng.next_f64();
        rng.advance();
        assert_eq!(rng.next_index(1000), scheduled);
    }

    #[test]
    fn test_reverse_saturates_at_seed_position() {
        let mut rng = ReversibleRng::new(3);
        let initial = rng.next_index(50);
        rng.reverse();
        assert_eq!(rng.next_index(50), initial);
    }

    #[test]
    fn test_reset_returns_to_seed_position() {
        let mut rng = ReversibleRng::new(99);
        let initial = rng.next_f64();
        for _ in 0..5 {
            rng.advance();
        }
        rng.reset();
        assert_eq!(rng.next_f64(), initial);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = ReversibleRng::new(1234);
        let mut b = ReversibleRng::new(1234);
        for _ in 0..10 {
            assert_eq!(a.next_index(7), b.next_index(7));
            a.advance();
            b.advance();
        }
    }
}
