//! Calendar helpers shared by the aggregation services.

use chrono::{DateTime, Duration, Local, NaiveTime, Timelike, Utc};

/// Start of the current calendar day in the server's local timezone.
pub fn local_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.with_timezone(&Local);
    local
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .map(|midnight| midnight.with_timezone(&Utc))
        // Local midnight does not exist on some DST transition days.
        .unwrap_or_else(|| {
            now - Duration::seconds(i64::from(local.num_seconds_from_midnight()))
        })
}

/// `YYYY-MM-DD` in UTC.
pub fn iso_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD` of `days` days before `now`.
pub fn iso_date_days_ago(now: DateTime<Utc>, days: i64) -> String {
    iso_date(now - Duration::days(days))
}
