use chrono::Duration;
use chrono_tz::Tz;

/// Business rules the engine evaluates against
///
/// Built from [`crate::core::Config::booking_rules`] in the binary;
/// tests construct it directly.
#[derive(Debug, Clone)]
pub struct BookingRules {
    /// 营业时区
    pub timezone: Tz,
    /// 最早可预订的本地小时
    pub opening_hour: u32,
    /// 分配桌台时允许多出的座位数
    pub max_capacity_overflow: i32,
    pub no_show_grace_minutes: i64,
    pub late_arrival_grace_minutes: i64,
    /// 到店前多久把桌台置为 RESERVED
    pub table_hold_window_minutes: i64,
    pub upcoming_lookahead_minutes: i64,
}

impl BookingRules {
    pub fn no_show_grace(&self) -> Duration {
        Duration::minutes(self.no_show_grace_minutes)
    }

    pub fn late_arrival_grace(&self) -> Duration {
        Duration::minutes(self.late_arrival_grace_minutes)
    }

    pub fn hold_window(&self) -> Duration {
        Duration::minutes(self.table_hold_window_minutes)
    }

    pub fn upcoming_lookahead(&self) -> Duration {
        Duration::minutes(self.upcoming_lookahead_minutes)
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            opening_hour: 6,
            max_capacity_overflow: 2,
            no_show_grace_minutes: 15,
            late_arrival_grace_minutes: 15,
            table_hold_window_minutes: 30,
            upcoming_lookahead_minutes: 60,
        }
    }
}
