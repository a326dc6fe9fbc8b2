//! 时间工具函数: 业务时区转换
//!
//! 引擎内部统一用 `DateTime<Utc>`，只有按"本地小时"判断的规则才转换到业务时区。

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::core::{BookingError, BookingResult};

/// 解析 ISO-8601 / RFC 3339 时间戳
pub fn parse_timestamp(value: &str) -> BookingResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| BookingError::validation(format!("Invalid timestamp: {}", value)))
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(value: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| BookingError::validation(format!("Invalid date format: {}", value)))
}

pub fn to_local(t: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    t.with_timezone(&tz)
}

/// 业务时区下的小时 (0-23)
pub fn local_hour(t: DateTime<Utc>, tz: Tz) -> u32 {
    to_local(t, tz).hour()
}

/// 本地日期 00:00 → UTC
///
/// DST gap fallback: 如果本地零点不存在 (夏令时跳跃)，按 UTC 零点处理。
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// 本地日期的 `[start, end)` 窗口 (UTC)，end 为次日零点
pub fn local_day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_midnight(date, tz), local_midnight(next, tz))
}
