/// Interval settings of a workout, all durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub num_sets: i64,
    pub exercise_duration: i64,
    pub rest_duration: i64,
    pub set_rest: i64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            num_sets: 1,
            exercise_duration: 30,
            rest_duration: 15,
            set_rest: 60,
        }
    }
}

impl Timing {
    #[must_use]
    pub fn total(&self, num_exercises: i64) -> i64 {
        total_time(
            num_exercises,
            self.num_sets,
            self.exercise_duration,
            self.rest_duration,
            self.set_rest,
        )
    }

    /// Time spent exercising.
    #[must_use]
    pub fn exercise_time(&self, num_exercises: i64) -> i64 {
        self.num_sets
            .saturating_mul(num_exercises)
            .saturating_mul(self.exercise_duration)
    }

    /// Time spent resting between exercises and between sets.
    #[must_use]
    pub fn rest_time(&self, num_exercises: i64) -> i64 {
        let between_exercises = self
            .num_sets
            .saturating_mul(num_exercises.saturating_sub(1).max(0))
            .saturating_mul(self.rest_duration);
        let between_sets = self
            .num_sets
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.set_rest);
        between_exercises.saturating_add(between_sets)
    }
}

#[must_use]
pub fn total_time(
    num_exercises: i64,
    num_sets: i64,
    exercise_duration: i64,
    rest_duration: i64,
    set_rest: i64,
) -> i64 {
    if num_exercises <= 0 || num_sets <= 0 {
        return 0;
    }
    let time_per_set = num_exercises
        .saturating_mul(exercise_duration)
        .saturating_add((num_exercises - 1).saturating_mul(rest_duration));
    num_sets
        .saturating_mul(time_per_set)
        .saturating_add((num_sets - 1).saturating_mul(set_rest))
}

/// Format seconds as minutes and seconds, e.g. `4m 40s`.
#[must_use]
pub fn format_time(seconds: i64) -> String {
    let (mins, secs) = (seconds.div_euclid(60), seconds.rem_euclid(60));
    format!("{mins}m {secs}s")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::example(3, 2, 30, 10, 60, 280)]
    #[case::single_exercise(1, 1, 30, 15, 60, 30)]
    #[case::single_set(5, 1, 30, 15, 60, 210)]
    #[case::no_exercises(0, 3, 30, 15, 60, 0)]
    #[case::negative_exercises(-2, 3, 30, 15, 60, 0)]
    #[case::no_sets(4, 0, 30, 15, 60, 0)]
    #[case::negative_sets(4, -1, 30, 15, 60, 0)]
    fn test_total_time(
        #[case] num_exercises: i64,
        #[case] num_sets: i64,
        #[case] exercise_duration: i64,
        #[case] rest_duration: i64,
        #[case] set_rest: i64,
        #[case] expected: i64,
    ) {
        assert_eq!(
            total_time(
                num_exercises,
                num_sets,
                exercise_duration,
                rest_duration,
                set_rest
            ),
            expected
        );
    }

    #[rstest]
    #[case(0, "0m 0s")]
    #[case(59, "0m 59s")]
    #[case(60, "1m 0s")]
    #[case(280, "4m 40s")]
    #[case(3725, "62m 5s")]
    fn test_format_time(#[case] seconds: i64, #[case] expected: &str) {
        assert_eq!(format_time(seconds), expected);
    }

    #[test]
    fn test_timing_split() {
        let timing = Timing {
            num_sets: 2,
            exercise_duration: 30,
            rest_duration: 10,
            set_rest: 60,
        };

        assert_eq!(timing.total(3), 280);
        assert_eq!(timing.exercise_time(3), 180);
        assert_eq!(timing.rest_time(3), 100);
        assert_eq!(timing.exercise_time(3) + timing.rest_time(3), timing.total(3));
        assert_eq!(timing.rest_time(0), 60);
    }

    #[test]
    fn test_timing_saturates() {
        let timing = Timing {
            num_sets: i64::MAX,
            exercise_duration: i64::MAX,
            rest_duration: i64::MAX,
            set_rest: i64::MAX,
        };

        assert_eq!(timing.total(3), i64::MAX);
        assert_eq!(timing.exercise_time(3), i64::MAX);
        assert_eq!(timing.rest_time(i64::MIN), i64::MAX);
        assert_eq!(format_time(timing.total(i64::MAX)), "153722867280912930m 7s");
    }

    #[test]
    fn test_timing_default() {
        assert_eq!(Timing::default().total(5), 210);
    }
}
