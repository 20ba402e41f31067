//! Bounds on the work a single search may perform.

/// Limits applied to every search.
///
/// The step budget grows with the size of the compiled program and with the
/// length of the input, so that short inputs against small patterns give up
/// quickly on catastrophic backtracking while long inputs are not penalized.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Steps always granted, regardless of input length.
    pub min_steps: u64,

    /// Cap on the input-length-derived part of the budget.
    pub max_steps: u64,

    /// Maximum depth of the backtrack stack.
    pub max_backtrack_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            min_steps: 100_000,
            max_steps: 100_000_000,
            max_backtrack_depth: 1 << 20,
        }
    }
}

impl Limits {
    /// \return the number of backtracking steps allowed when running a
    /// program of \p program_len instructions over \p input_len bytes.
    pub fn step_budget(&self, program_len: usize, input_len: usize) -> u64 {
        let program = program_len.max(1) as u64;
        let input = input_len as u64;
        let by_program = program
            .saturating_mul(program)
            .saturating_mul(input)
            .saturating_add(self.min_steps);
        let by_input = input
            .saturating_mul(input)
            .saturating_add(self.min_steps)
            .min(self.max_steps);
        by_program.max(by_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_has_a_floor() {
        let limits = Limits::default();
        assert_eq!(limits.step_budget(0, 0), 100_000);
        assert_eq!(limits.step_budget(10, 0), 100_000);
    }

    #[test]
    fn budget_scales_with_input() {
        let limits = Limits::default();
        assert_eq!(limits.step_budget(1, 1000), 1_100_000);
        assert_eq!(limits.step_budget(20, 100), 140_000);
    }

    #[test]
    fn input_part_is_capped() {
        let limits = Limits {
            min_steps: 10,
            max_steps: 1_000,
            max_backtrack_depth: 16,
        };
        // program² · len dominates once the input part saturates.
        assert_eq!(limits.step_budget(1, 1_000_000), 1_000_010);
        assert_eq!(limits.step_budget(1, 20), 410);
        assert_eq!(limits.step_budget(1, 40), 1_000);
    }
}
