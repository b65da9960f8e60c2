//! Free-text status canonicalization, one vocabulary per record kind.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceCategory {
    Present,
    Absent,
    HalfDay,
    CasualLeave,
}

/// Marker for an activity record that counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Completion;

/// Maps a typed-in attendance status onto its category. Unknown values are
/// `None` and are not counted anywhere.
pub fn classify_attendance(raw: &str) -> Option<AttendanceCategory> {
    match raw.trim().to_lowercase().as_str() {
        "present" => Some(AttendanceCategory::Present),
        "absent" => Some(AttendanceCategory::Absent),
        "halfday" | "half-day" | "half day" => Some(AttendanceCategory::HalfDay),
        "casualleave" | "casual leave" | "cl" => Some(AttendanceCategory::CasualLeave),
        _ => None,
    }
}

/// Only completions are tracked: `"yes"` counts, `"no"` and blanks don't.
pub fn classify_completion(raw: &str) -> Option<Completion> {
    is_completion(raw).then_some(Completion)
}

pub fn is_completion(raw: &str) -> bool {
    raw.trim().to_lowercase() == "yes"
}
