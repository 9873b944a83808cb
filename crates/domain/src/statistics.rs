use std::{collections::BTreeMap, slice::Iter};

use chrono::{Datelike, NaiveDateTime};

use crate::{Exercise, ExerciseID, WorkoutRecord};

/// Time split of a single workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub label: String,
    pub exercise_time: i64,
    pub rest_time: i64,
}

/// Exercise and rest time of each workout, oldest first.
#[must_use]
pub fn trend(records: &[WorkoutRecord]) -> Vec<TrendPoint> {
    let mut records = records.iter().collect::<Vec<_>>();
    records.sort_by_key(|r| (r.timestamp, r.id));
    records
        .into_iter()
        .map(|r| {
            let n = r.num_exercises();
            TrendPoint {
                label: r.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                exercise_time: r.timing.exercise_time(n),
                rest_time: r.timing.rest_time(n),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Week,
    Month,
}

impl Bucket {
    pub fn iter() -> Iter<'static, Bucket> {
        static BUCKETS: [Bucket; 2] = [Bucket::Week, Bucket::Month];
        BUCKETS.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Bucket::Week => "Weekly",
            Bucket::Month => "Monthly",
        }
    }

    /// Key of the period containing `timestamp`: `2024-W09` for ISO weeks, `2024-03` for months.
    #[must_use]
    pub fn key(self, timestamp: &NaiveDateTime) -> String {
        match self {
            Bucket::Week => {
                let week = timestamp.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Bucket::Month => timestamp.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Totals {
    pub exercise_time: i64,
    pub rest_time: i64,
    /// Exercise time per muscle.
    pub muscles: BTreeMap<String, i64>,
    pub workout_count: u32,
}

/// Sum up workouts per period.
///
/// Exercises missing from `catalog` count towards the default muscle.
#[must_use]
pub fn aggregate(
    records: &[WorkoutRecord],
    catalog: &BTreeMap<ExerciseID, Exercise>,
    bucket: Bucket,
) -> BTreeMap<String, Totals> {
    let mut totals: BTreeMap<String, Totals> = BTreeMap::new();

    for record in records {
        let n = record.num_exercises();
        let entry = totals.entry(bucket.key(&record.timestamp)).or_default();

        entry.exercise_time = entry
            .exercise_time
            .saturating_add(record.timing.exercise_time(n));
        entry.rest_time = entry.rest_time.saturating_add(record.timing.rest_time(n));
        entry.workout_count = entry.workout_count.saturating_add(1);

        let time = record
            .timing
            .num_sets
            .saturating_mul(record.timing.exercise_duration);
        for id in &record.exercises {
            let muscle = catalog
                .get(id)
                .map_or(Exercise::DEFAULT_MUSCLE, Exercise::muscle);
            let total = entry.muscles.entry(muscle.to_string()).or_default();
            *total = total.saturating_add(time);
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Name, NewWorkout, Timing, testing::exercises};

    use super::*;

    fn timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn record(id: u32, timestamp: NaiveDateTime, ids: &[u32], timing: Timing) -> WorkoutRecord {
        NewWorkout::new(
            Name::new("Bruno").unwrap(),
            timestamp,
            &exercises(ids.iter().copied()),
            timing,
        )
        .into_record(id.into())
    }

    fn timing(num_sets: i64) -> Timing {
        Timing {
            num_sets,
            exercise_duration: 30,
            rest_duration: 10,
            set_rest: 60,
        }
    }

    #[test]
    fn test_trend() {
        let records = vec![
            record(2, timestamp(2024, 3, 5, 18, 30), &[1, 2, 3], timing(2)),
            record(1, timestamp(2024, 3, 1, 7, 5), &[1], timing(1)),
        ];

        assert_eq!(
            trend(&records),
            vec![
                TrendPoint {
                    label: "2024-03-01 07:05".to_string(),
                    exercise_time: 30,
                    rest_time: 0,
                },
                TrendPoint {
                    label: "2024-03-05 18:30".to_string(),
                    exercise_time: 180,
                    rest_time: 100,
                },
            ]
        );
    }

    #[test]
    fn test_trend_empty() {
        assert!(trend(&[]).is_empty());
    }

    #[rstest]
    #[case::week(Bucket::Week, timestamp(2024, 3, 1, 12, 0), "2024-W09")]
    #[case::week_padded(Bucket::Week, timestamp(2024, 1, 3, 12, 0), "2024-W01")]
    #[case::week_previous_year(Bucket::Week, timestamp(2021, 1, 1, 12, 0), "2020-W53")]
    #[case::week_next_year(Bucket::Week, timestamp(2024, 12, 30, 12, 0), "2025-W01")]
    #[case::month(Bucket::Month, timestamp(2024, 3, 1, 12, 0), "2024-03")]
    #[case::month_end(Bucket::Month, timestamp(2024, 12, 31, 23, 59), "2024-12")]
    fn test_bucket_key(
        #[case] bucket: Bucket,
        #[case] timestamp: NaiveDateTime,
        #[case] expected: &str,
    ) {
        assert_eq!(bucket.key(&timestamp), expected);
    }

    #[test]
    fn test_aggregate() {
        let catalog = exercises([1, 2])
            .into_iter()
            .map(|mut e| {
                e.muscle = if *e.id == 1 { "Legs" } else { "Chest" }.to_string();
                (e.id, e)
            })
            .collect::<BTreeMap<_, _>>();
        let records = vec![
            record(1, timestamp(2024, 3, 4, 8, 0), &[1, 2], timing(1)),
            record(2, timestamp(2024, 3, 6, 8, 0), &[1, 9], timing(2)),
            record(3, timestamp(2024, 4, 1, 8, 0), &[2], timing(1)),
        ];

        assert_eq!(
            aggregate(&records, &catalog, Bucket::Week),
            BTreeMap::from([
                (
                    "2024-W10".to_string(),
                    Totals {
                        exercise_time: 60 + 120,
                        rest_time: 10 + 80,
                        muscles: BTreeMap::from([
                            ("Chest".to_string(), 30),
                            ("Legs".to_string(), 30 + 60),
                            ("Other".to_string(), 60),
                        ]),
                        workout_count: 2,
                    }
                ),
                (
                    "2024-W14".to_string(),
                    Totals {
                        exercise_time: 30,
                        rest_time: 0,
                        muscles: BTreeMap::from([("Chest".to_string(), 30)]),
                        workout_count: 1,
                    }
                ),
            ])
        );
        assert_eq!(
            aggregate(&records, &catalog, Bucket::Month)
                .into_iter()
                .map(|(key, totals)| (key, totals.workout_count))
                .collect::<Vec<_>>(),
            vec![("2024-03".to_string(), 2), ("2024-04".to_string(), 1)]
        );
    }

    #[test]
    fn test_aggregate_saturates() {
        let timing = Timing {
            num_sets: i64::MAX,
            ..timing(1)
        };
        let records = vec![
            record(1, timestamp(2024, 3, 4, 8, 0), &[1, 1], timing),
            record(2, timestamp(2024, 3, 5, 8, 0), &[1], timing),
        ];

        let totals = aggregate(&records, &BTreeMap::new(), Bucket::Month);

        assert_eq!(totals["2024-03"].exercise_time, i64::MAX);
        assert_eq!(totals["2024-03"].rest_time, i64::MAX);
        assert_eq!(totals["2024-03"].muscles["Other"], i64::MAX);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[], &BTreeMap::new(), Bucket::Month).is_empty());
    }

    #[test]
    fn test_bucket_name() {
        assert_eq!(
            Bucket::iter().map(|b| b.name()).collect::<Vec<_>>(),
            vec!["Weekly", "Monthly"]
        );
    }
}
