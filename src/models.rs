use crate::dates::YearMonth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A date field as it is found in the record store.
///
/// Attendance rows typed in by hand carry `DD-MM-YYYY` strings, older imports
/// carry ISO dates, and documents written by the store itself carry native
/// timestamps. Anything else lands in `Other` and never counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateLike {
    Text(String),
    Timestamp {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    Millis(i64),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// One employee's attendance for one day.
///
/// Every field is optional so that half-written documents still load; the
/// aggregation drops them instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<DateLike>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaving_time: Option<String>,
}

/// A daily completion flag from one of the activity feeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default)]
    pub date: Option<DateLike>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttendanceCounts {
    pub present: u32,
    pub absent: u32,
    pub halfday: u32,
    pub casualleave: u32,
}

impl AttendanceCounts {
    pub fn total(&self) -> u32 {
        self.present
            .saturating_add(self.absent)
            .saturating_add(self.halfday)
            .saturating_add(self.casualleave)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummaryRow {
    pub employee_id: String,
    pub name: String,
    pub present: u32,
    pub absent: u32,
    pub halfday: u32,
    pub casualleave: u32,
    pub activity_counts: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: YearMonth,
    pub sundays: u32,
    pub generation: u64,
    pub rows: Vec<MonthlySummaryRow>,
}

/// The whole record store document, keyed the way the daily screens write it
/// (`<employeeId>_<DD-MM-YYYY>`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub attendance: BTreeMap<String, AttendanceRecord>,
    #[serde(default)]
    pub feeds: BTreeMap<String, BTreeMap<String, ActivityRecord>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntryRequest {
    pub employee_id: String,
    pub date: String,
    pub status: String,
    #[serde(default)]
    pub entry_time: Option<String>,
    #[serde(default)]
    pub leaving_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntryRequest {
    pub employee_id: String,
    pub date: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SundaysResponse {
    pub month: YearMonth,
    pub sundays: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedReportRow {
    pub name: String,
    pub status: String,
}

/// One roster line of the daily attendance sheet. Employees without a record
/// for the day still get a line, with `"Select Status"` and blank times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheetRow {
    pub employee_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub date: String,
    pub status: String,
    pub entry_time: String,
    pub leaving_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSheetRow {
    pub employee_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub date: String,
    pub status: String,
}

/// A feed's completion flags for one day, joined onto the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSheet {
    pub feed: String,
    pub date: String,
    pub total_employees: u32,
    pub total_completed: u32,
    pub total_incomplete: u32,
    pub rows: Vec<FeedSheetRow>,
}
