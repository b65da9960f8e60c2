use crate::aggregate::{attendance_counts, completion_counts};
use crate::dates::{DateNormalizer, YearMonth, count_sundays};
use crate::models::{
    ActivityRecord, AttendanceCounts, AttendanceRecord, Employee, MonthlySummary,
    MonthlySummaryRow,
};
use std::collections::{BTreeMap, HashMap};

/// Everything one summary is computed from, fetched once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub roster: Vec<Employee>,
    pub attendance: Vec<AttendanceRecord>,
    pub feeds: BTreeMap<String, Vec<ActivityRecord>>,
}

impl Snapshot {
    pub fn summarize(
        &self,
        month: YearMonth,
        normalizer: &DateNormalizer,
        generation: u64,
    ) -> MonthlySummary {
        MonthlySummary {
            month,
            sundays: count_sundays_in_month(month),
            generation,
            rows: compute_summary(
                &self.roster,
                &self.attendance,
                &self.feeds,
                month,
                normalizer,
            ),
        }
    }
}

/// One row per roster entry, in roster order.
///
/// Activity feeds are joined on the employee's current display name, so
/// completions filed under a previous name are not attributed to anyone on
/// the roster.
pub fn compute_summary(
    roster: &[Employee],
    attendance: &[AttendanceRecord],
    feeds: &BTreeMap<String, Vec<ActivityRecord>>,
    month: YearMonth,
    normalizer: &DateNormalizer,
) -> Vec<MonthlySummaryRow> {
    let attendance = attendance_counts(attendance, month, normalizer);
    let feeds = feeds
        .iter()
        .map(|(feed, records)| {
            (
                feed.as_str(),
                completion_counts(records, month, normalizer),
            )
        })
        .collect::<BTreeMap<_, _>>();

    compose(roster, &attendance, &feeds)
}

pub fn compose(
    roster: &[Employee],
    attendance: &HashMap<&str, AttendanceCounts>,
    feeds: &BTreeMap<&str, HashMap<&str, u32>>,
) -> Vec<MonthlySummaryRow> {
    roster
        .iter()
        .map(|employee| {
            let counts = attendance
                .get(employee.id.as_str())
                .copied()
                .unwrap_or_default();
            let activity_counts = feeds
                .iter()
                .map(|(feed, by_name)| {
                    let count = by_name.get(employee.name.as_str()).copied().unwrap_or(0);
                    (feed.to_string(), count)
                })
                .collect();

            MonthlySummaryRow {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                present: counts.present,
                absent: counts.absent,
                halfday: counts.halfday,
                casualleave: counts.casualleave,
                activity_counts,
            }
        })
        .collect()
}

pub fn count_sundays_in_month(month: YearMonth) -> u32 {
    count_sundays(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateLike;

    const FEEDS: [&str; 3] = ["clickup", "trackabi", "workdone"];

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            ..Employee::default()
        }
    }

    fn attendance(employee_id: &str, date: &str, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: Some(employee_id.to_string()),
            date: Some(DateLike::Text(date.to_string())),
            status: Some(status.to_string()),
            ..AttendanceRecord::default()
        }
    }

    fn activity(name: &str, date: DateLike, status: &str) -> ActivityRecord {
        ActivityRecord {
            name: Some(name.to_string()),
            date: Some(date),
            status: Some(status.to_string()),
            ..ActivityRecord::default()
        }
    }

    fn empty_feeds() -> BTreeMap<String, Vec<ActivityRecord>> {
        FEEDS
            .iter()
            .map(|feed| (feed.to_string(), Vec::new()))
            .collect()
    }

    fn month(raw: &str) -> YearMonth {
        raw.parse().unwrap()
    }

    #[test]
    fn attendance_only_row() {
        let roster = vec![employee("e1", "Asha")];
        let attendance = vec![
            attendance("e1", "01-03-2024", "Present"),
            attendance("e1", "02-03-2024", "half day"),
        ];

        let rows = compute_summary(
            &roster,
            &attendance,
            &empty_feeds(),
            month("2024-03"),
            &DateNormalizer::default(),
        );

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.employee_id, "e1");
        assert_eq!(row.name, "Asha");
        assert_eq!(
            (row.present, row.absent, row.halfday, row.casualleave),
            (1, 0, 1, 0)
        );
        assert_eq!(row.activity_counts.len(), 3);
        assert!(row.activity_counts.values().all(|count| *count == 0));
    }

    #[test]
    fn timestamp_completion_counts_in_its_month_only() {
        let roster = vec![employee("e1", "Asha")];
        let mut feeds = empty_feeds();
        // 2024-03-05T12:00:00Z
        feeds.insert(
            "trackabi".to_string(),
            vec![activity(
                "Asha",
                DateLike::Timestamp {
                    seconds: 1_709_640_000,
                    nanoseconds: 0,
                },
                "Yes",
            )],
        );
        let normalizer = DateNormalizer::default();

        let march = compute_summary(&roster, &[], &feeds, month("2024-03"), &normalizer);
        assert_eq!(march[0].activity_counts["trackabi"], 1);
        assert_eq!(march[0].activity_counts["clickup"], 0);

        for other in ["2024-02", "2024-04", "2023-03"] {
            let rows = compute_summary(&roster, &[], &feeds, month(other), &normalizer);
            assert_eq!(rows[0].activity_counts["trackabi"], 0, "month {other}");
        }
    }

    #[test]
    fn rows_follow_roster_order_with_zero_defaults() {
        let roster = vec![
            employee("e3", "Meera"),
            employee("e1", "Asha"),
            employee("e2", "Ravi"),
        ];
        let attendance = vec![attendance("e1", "04-03-2024", "Absent")];
        let mut feeds = empty_feeds();
        feeds.insert(
            "workdone".to_string(),
            vec![activity("Ravi", DateLike::Text("2024-03-04".into()), "yes")],
        );

        let rows = compute_summary(
            &roster,
            &attendance,
            &feeds,
            month("2024-03"),
            &DateNormalizer::default(),
        );

        let ids: Vec<_> = rows.iter().map(|row| row.employee_id.as_str()).collect();
        assert_eq!(ids, ["e3", "e1", "e2"]);
        assert_eq!(rows[0].present + rows[0].absent, 0);
        assert_eq!(rows[1].absent, 1);
        assert_eq!(rows[2].activity_counts["workdone"], 1);
        assert_eq!(rows[1].activity_counts["workdone"], 0);
    }

    #[test]
    fn activity_joins_on_the_current_name_only() {
        let feeds = BTreeMap::from([(
            "clickup".to_string(),
            vec![
                activity("Asha K", DateLike::Text("04-03-2024".into()), "yes"),
                activity("Asha", DateLike::Text("05-03-2024".into()), "yes"),
            ],
        )]);

        let renamed = vec![employee("e1", "Asha K")];
        let rows = compute_summary(
            &renamed,
            &[],
            &feeds,
            month("2024-03"),
            &DateNormalizer::default(),
        );

        assert_eq!(rows[0].activity_counts["clickup"], 1);
    }

    #[test]
    fn recomputing_is_idempotent() {
        let snapshot = Snapshot {
            roster: vec![employee("e1", "Asha"), employee("e2", "Ravi")],
            attendance: vec![
                attendance("e1", "01-03-2024", "Present"),
                attendance("e2", "01-03-2024", "cl"),
            ],
            feeds: BTreeMap::from([(
                "clickup".to_string(),
                vec![activity("Ravi", DateLike::Text("01-03-2024".into()), "Yes")],
            )]),
        };
        let normalizer = DateNormalizer::default();

        let first = snapshot.summarize(month("2024-03"), &normalizer, 1);
        let second = snapshot.summarize(month("2024-03"), &normalizer, 1);
        assert_eq!(first, second);
        assert_eq!(first.sundays, 5);
        assert_eq!(first.rows[1].casualleave, 1);
    }

    #[test]
    fn empty_roster_gives_empty_summary() {
        let rows = compute_summary(
            &[],
            &[attendance("e1", "01-03-2024", "Present")],
            &empty_feeds(),
            month("2024-03"),
            &DateNormalizer::default(),
        );
        assert!(rows.is_empty());
    }
}
