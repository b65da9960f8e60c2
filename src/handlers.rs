use crate::dates::{DateNormalizer, YearMonth};
use crate::errors::AppError;
use crate::models::{
    ActivityEntryRequest, ActivityRecord, AppData, AttendanceEntryRequest, AttendanceRecord,
    AttendanceSheetRow, DateLike, DateQuery, Employee, FeedReportRow, FeedSheet, FeedSheetRow,
    MonthQuery, MonthlySummary, SundaysResponse,
};
use crate::state::AppState;
use crate::status::is_completion;
use crate::storage::{RecordSource, persist_data};
use crate::summary::count_sundays_in_month;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

const UNSET_STATUS: &str = "Select Status";

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Html<String>, AppError> {
    let month = selected_month(&query, &state.settings.normalizer)?;
    let summary = refresh(&state, month).await;
    Ok(Html(render_index(&summary, &state.settings.feeds)))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>, AppError> {
    let month = selected_month(&query, &state.settings.normalizer)?;
    let summary = refresh(&state, month).await;
    Ok(Json(summary.as_ref().clone()))
}

pub async fn get_latest_summary(
    State(state): State<AppState>,
) -> Result<Json<MonthlySummary>, AppError> {
    let summary = state
        .board
        .latest()
        .await
        .ok_or_else(|| AppError::not_found("no summary has been computed yet"))?;
    Ok(Json(summary.as_ref().clone()))
}

pub async fn get_sundays(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<SundaysResponse>, AppError> {
    let month = selected_month(&query, &state.settings.normalizer)?;
    Ok(Json(SundaysResponse {
        month,
        sundays: count_sundays_in_month(month),
    }))
}

pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(state.store.fetch_roster().await?))
}

/// The daily attendance sheet: every roster employee, with whatever was
/// recorded for them on that day.
pub async fn attendance_sheet(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<AttendanceSheetRow>>, AppError> {
    let date = selected_date(&state, &query)?;
    let day = store_date(date);

    let data = state.store.data.lock().await;
    let rows = data
        .employees
        .iter()
        .map(|employee| {
            let stored = data.attendance.get(&document_id(&employee.id, date));
            AttendanceSheetRow {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                designation: employee.designation.clone(),
                date: day.clone(),
                status: stored
                    .and_then(|record| filled(record.status.clone()))
                    .unwrap_or_else(|| UNSET_STATUS.to_string()),
                entry_time: stored
                    .and_then(|record| record.entry_time.clone())
                    .unwrap_or_default(),
                leaving_time: stored
                    .and_then(|record| record.leaving_time.clone())
                    .unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(rows))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(payload): Json<AttendanceEntryRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let status = payload.status.trim();
    if status.is_empty() {
        return Err(AppError::bad_request("status must not be empty"));
    }
    let date = entry_date(&state, &payload.date)?;

    let mut data = state.store.data.lock().await;
    let employee = find_employee(&data.employees, &payload.employee_id)?;
    let doc_id = document_id(&employee.id, date);

    // Absent days carry no times; otherwise keep what was already clocked.
    let absent = status.eq_ignore_ascii_case("absent");
    let existing = data.attendance.get(&doc_id);
    let (entry_time, leaving_time) = if absent {
        (String::new(), String::new())
    } else {
        let entry_time = filled(payload.entry_time)
            .or_else(|| existing.and_then(|record| filled(record.entry_time.clone())))
            .unwrap_or_else(|| state.settings.normalizer.now().format("%H:%M").to_string());
        let leaving_time = filled(payload.leaving_time)
            .or_else(|| existing.and_then(|record| record.leaving_time.clone()))
            .unwrap_or_default();
        (entry_time, leaving_time)
    };

    let record = AttendanceRecord {
        employee_id: Some(employee.id.clone()),
        name: Some(employee.name.clone()),
        date: Some(DateLike::Text(store_date(date))),
        status: Some(status.to_string()),
        entry_time: Some(entry_time),
        leaving_time: Some(leaving_time),
    };
    let mut next = data.clone();
    next.attendance.insert(doc_id.clone(), record.clone());
    commit(&state, &mut data, next).await?;

    info!(%doc_id, status, "attendance saved");
    Ok(Json(record))
}

/// One feed's flags for a day, joined onto the roster, with the completed
/// and incomplete totals the daily screens show.
pub async fn feed_sheet(
    State(state): State<AppState>,
    Path(feed): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<FeedSheet>, AppError> {
    ensure_feed(&state, &feed)?;
    let date = selected_date(&state, &query)?;
    let day = store_date(date);

    let data = state.store.data.lock().await;
    let records = data.feeds.get(&feed);
    let rows: Vec<FeedSheetRow> = data
        .employees
        .iter()
        .map(|employee| FeedSheetRow {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            designation: employee.designation.clone(),
            date: day.clone(),
            status: records
                .and_then(|records| records.get(&document_id(&employee.id, date)))
                .and_then(|record| filled(record.status.clone()))
                .unwrap_or_default(),
        })
        .collect();

    let total_employees = rows.len() as u32;
    let total_completed = rows.iter().filter(|row| is_completion(&row.status)).count() as u32;
    Ok(Json(FeedSheet {
        feed,
        date: day,
        total_employees,
        total_completed,
        total_incomplete: total_employees.saturating_sub(total_completed),
        rows,
    }))
}

pub async fn mark_activity(
    State(state): State<AppState>,
    Path(feed): Path<String>,
    Json(payload): Json<ActivityEntryRequest>,
) -> Result<Json<ActivityRecord>, AppError> {
    ensure_feed(&state, &feed)?;
    let date = entry_date(&state, &payload.date)?;

    let mut data = state.store.data.lock().await;
    let employee = find_employee(&data.employees, &payload.employee_id)?;
    let doc_id = document_id(&employee.id, date);

    let record = ActivityRecord {
        name: Some(employee.name.clone()),
        designation: employee.designation.clone(),
        date: Some(DateLike::Text(store_date(date))),
        status: Some(payload.status),
    };
    let mut next = data.clone();
    next.feeds
        .entry(feed.clone())
        .or_default()
        .insert(doc_id.clone(), record.clone());
    commit(&state, &mut data, next).await?;

    info!(%feed, %doc_id, "activity saved");
    Ok(Json(record))
}

pub async fn feed_report(
    State(state): State<AppState>,
    Path(feed): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<FeedReportRow>>, AppError> {
    ensure_feed(&state, &feed)?;
    let date = selected_date(&state, &query)?;

    let normalizer = state.settings.normalizer;
    let rows = state
        .store
        .fetch_activity(&feed)
        .await?
        .into_iter()
        .filter(|record| {
            record
                .date
                .as_ref()
                .and_then(|value| normalizer.normalize(value))
                == Some(date)
        })
        .map(|record| FeedReportRow {
            name: filled(record.name).unwrap_or_else(|| "No Name".to_string()),
            status: filled(record.status).unwrap_or_else(|| "No Status".to_string()),
        })
        .collect();

    Ok(Json(rows))
}

async fn refresh(state: &AppState, month: YearMonth) -> Arc<MonthlySummary> {
    state
        .board
        .refresh(
            &state.store,
            &state.settings.feeds,
            month,
            &state.settings.normalizer,
        )
        .await
}

/// Writes `next` to disk and only then makes it the live document.
async fn commit(state: &AppState, live: &mut AppData, next: AppData) -> Result<(), AppError> {
    persist_data(&state.store.path, &next).await?;
    *live = next;
    Ok(())
}

fn selected_month(query: &MonthQuery, normalizer: &DateNormalizer) -> Result<YearMonth, AppError> {
    match query.month.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Ok(raw.parse::<YearMonth>()?),
        _ => Ok(YearMonth::of(normalizer.today())),
    }
}

fn selected_date(state: &AppState, query: &DateQuery) -> Result<NaiveDate, AppError> {
    match query.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => entry_date(state, raw),
        _ => Ok(state.settings.normalizer.today()),
    }
}

fn entry_date(state: &AppState, raw: &str) -> Result<NaiveDate, AppError> {
    state
        .settings
        .normalizer
        .normalize(&DateLike::Text(raw.to_string()))
        .ok_or_else(|| {
            AppError::bad_request(format!("invalid date {raw:?}, expected YYYY-MM-DD"))
        })
}

fn ensure_feed(state: &AppState, feed: &str) -> Result<(), AppError> {
    if state.settings.has_feed(feed) {
        Ok(())
    } else {
        Err(AppError::not_found(format!("unknown feed {feed:?}")))
    }
}

fn find_employee(roster: &[Employee], id: &str) -> Result<Employee, AppError> {
    roster
        .iter()
        .find(|employee| employee.id == id)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("unknown employee {id:?}")))
}

fn document_id(employee_id: &str, date: NaiveDate) -> String {
    format!("{employee_id}_{}", store_date(date))
}

fn store_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
