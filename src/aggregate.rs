use crate::dates::{DateNormalizer, YearMonth};
use crate::models::{ActivityRecord, AttendanceCounts, AttendanceRecord, DateLike};
use crate::status::{AttendanceCategory, Completion, classify_attendance, classify_completion};
use std::{collections::HashMap, hash::Hash};
use tracing::trace;

/// A running count that one classified record bumps.
pub trait Tally<C>: Default {
    fn record(&mut self, category: C);
}

impl Tally<AttendanceCategory> for AttendanceCounts {
    fn record(&mut self, category: AttendanceCategory) {
        let slot = match category {
            AttendanceCategory::Present => &mut self.present,
            AttendanceCategory::Absent => &mut self.absent,
            AttendanceCategory::HalfDay => &mut self.halfday,
            AttendanceCategory::CasualLeave => &mut self.casualleave,
        };
        *slot = slot.saturating_add(1);
    }
}

impl Tally<Completion> for u32 {
    fn record(&mut self, _: Completion) {
        *self = self.saturating_add(1);
    }
}

/// The parts of a record the aggregation needs. A record that can't supply
/// all three is skipped before it is classified.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a, K> {
    pub key: K,
    pub date: &'a DateLike,
    pub status: &'a str,
}

/// Counts `records` per key for one month.
///
/// Each record is normalized, bucketed and classified on its own; whatever
/// fails any step is dropped without touching the others. Counting is
/// commutative, so the input order never matters.
pub fn aggregate<'a, R, K, C, T>(
    records: &'a [R],
    month: YearMonth,
    normalizer: &DateNormalizer,
    fields: impl Fn(&'a R) -> Option<Fields<'a, K>>,
    classify: impl Fn(&str) -> Option<C>,
) -> HashMap<K, T>
where
    K: Eq + Hash,
    T: Tally<C>,
{
    let mut counts: HashMap<K, T> = HashMap::new();

    for record in records {
        let Some(Fields { key, date, status }) = fields(record) else {
            trace!("skipping record without key, date or status");
            continue;
        };
        let Some(day) = normalizer.normalize(date) else {
            trace!(?date, "skipping record with unreadable date");
            continue;
        };
        if !month.contains(day) {
            continue;
        }
        let Some(category) = classify(status) else {
            trace!(status, "skipping record with unclassified status");
            continue;
        };

        counts.entry(key).or_default().record(category);
    }

    counts
}

/// Attendance categories per `employeeId`.
pub fn attendance_counts<'a>(
    records: &'a [AttendanceRecord],
    month: YearMonth,
    normalizer: &DateNormalizer,
) -> HashMap<&'a str, AttendanceCounts> {
    aggregate(
        records,
        month,
        normalizer,
        |record: &'a AttendanceRecord| {
            Some(Fields {
                key: filled(record.employee_id.as_deref())?,
                date: record.date.as_ref()?,
                status: filled(record.status.as_deref())?,
            })
        },
        classify_attendance,
    )
}

/// Completions per employee display name.
pub fn completion_counts<'a>(
    records: &'a [ActivityRecord],
    month: YearMonth,
    normalizer: &DateNormalizer,
) -> HashMap<&'a str, u32> {
    aggregate(
        records,
        month,
        normalizer,
        |record: &'a ActivityRecord| {
            Some(Fields {
                key: filled(record.name.as_deref())?,
                date: record.date.as_ref()?,
                status: filled(record.status.as_deref())?,
            })
        },
        classify_completion,
    )
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
