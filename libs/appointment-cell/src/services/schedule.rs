use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::models::AppointmentError;

/// Combines the picked day and "HH:MM" slot in the business timezone and
/// converts to UTC. Seconds and millis are always zero.
pub fn merge_schedule(date: NaiveDate, time: &str, utc_offset_minutes: i32) -> Result<DateTime<Utc>, AppointmentError> {
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppointmentError::InvalidTime(time.to_string()))?;

    let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
        .ok_or_else(|| AppointmentError::InvalidTime(format!("offset {} minutes", utc_offset_minutes)))?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| AppointmentError::InvalidTime(format!("{} {}", date, time)))
}

/// `2024-06-10T12:00:00.000Z`
pub fn format_scheduled_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
