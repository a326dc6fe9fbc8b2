use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::reservations::BookingRules;

/// 服务配置 - 预订引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ENVIRONMENT | development | 运行环境 |
/// | BUSINESS_TIMEZONE | UTC | 营业时区 (IANA 名称) |
/// | OPENING_HOUR | 6 | 最早可预订的本地小时 |
/// | MAX_CAPACITY_OVERFLOW | 2 | 分配桌台时允许多出的座位数 |
/// | NO_SHOW_GRACE_MINUTES | 15 | 开始后多久才允许标记爽约 |
/// | LATE_ARRIVAL_GRACE_MINUTES | 15 | 迟到提醒阈值 |
/// | TABLE_HOLD_WINDOW_MINUTES | 30 | 到店前锁定桌台的窗口 |
/// | UPCOMING_LOOKAHEAD_MINUTES | 60 | 到店前扫描范围 |
/// | MONITOR_INTERVAL_SECS | 60 | 巡检间隔(秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 滚动日志目录 |
/// | SEED_FILE | - | 启动时导入的 JSON 种子数据 |
/// | BUS_CHANNEL_CAPACITY | 1024 | 消息总线缓冲 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时时间(毫秒) |
///
/// # 示例
///
/// ```ignore
/// BUSINESS_TIMEZONE=Europe/Madrid MONITOR_INTERVAL_SECS=30 cargo run -p booking-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 营业时区，所有"本地小时"规则都基于它
    pub timezone: Tz,
    pub opening_hour: u32,
    pub max_capacity_overflow: i32,
    pub no_show_grace_minutes: i64,
    pub late_arrival_grace_minutes: i64,
    pub table_hold_window_minutes: i64,
    pub upcoming_lookahead_minutes: i64,
    /// 巡检间隔 (秒)
    pub monitor_interval_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub seed_file: Option<String>,
    pub bus_channel_capacity: usize,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let defaults = BookingRules::default();
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            timezone: parse_timezone(std::env::var("BUSINESS_TIMEZONE").ok().as_deref()),
            opening_hour: env_parse("OPENING_HOUR", defaults.opening_hour),
            max_capacity_overflow: env_parse(
                "MAX_CAPACITY_OVERFLOW",
                defaults.max_capacity_overflow,
            ),
            no_show_grace_minutes: env_parse(
                "NO_SHOW_GRACE_MINUTES",
                defaults.no_show_grace_minutes,
            ),
            late_arrival_grace_minutes: env_parse(
                "LATE_ARRIVAL_GRACE_MINUTES",
                defaults.late_arrival_grace_minutes,
            ),
            table_hold_window_minutes: env_parse(
                "TABLE_HOLD_WINDOW_MINUTES",
                defaults.table_hold_window_minutes,
            ),
            upcoming_lookahead_minutes: env_parse(
                "UPCOMING_LOOKAHEAD_MINUTES",
                defaults.upcoming_lookahead_minutes,
            ),
            monitor_interval_secs: env_parse("MONITOR_INTERVAL_SECS", 60),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            seed_file: std::env::var("SEED_FILE").ok().filter(|s| !s.is_empty()),
            bus_channel_capacity: env_parse("BUS_CHANNEL_CAPACITY", 1024),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
        }
    }

    /// 引擎业务规则
    pub fn booking_rules(&self) -> BookingRules {
        BookingRules {
            timezone: self.timezone,
            opening_hour: self.opening_hour,
            max_capacity_overflow: self.max_capacity_overflow,
            no_show_grace_minutes: self.no_show_grace_minutes,
            late_arrival_grace_minutes: self.late_arrival_grace_minutes,
            table_hold_window_minutes: self.table_hold_window_minutes,
            upcoming_lookahead_minutes: self.upcoming_lookahead_minutes,
        }
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_secs.max(1))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 解析时区名称，失败回退到 UTC
pub fn parse_timezone(name: Option<&str>) -> Tz {
    match name {
        None => Tz::UTC,
        Some(name) => name.parse().unwrap_or_else(|e| {
            tracing::warn!("Unknown BUSINESS_TIMEZONE '{}': {}, falling back to UTC", name, e);
            Tz::UTC
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone(None), Tz::UTC);
        assert_eq!(parse_timezone(Some("Europe/Madrid")), Tz::Europe__Madrid);
        assert_eq!(parse_timezone(Some("Mars/Olympus")), Tz::UTC);
    }

    #[test]
    fn test_booking_rules_follow_config() {
        let mut config = Config::from_env();
        config.timezone = Tz::Asia__Shanghai;
        config.no_show_grace_minutes = 20;
        config.max_capacity_overflow = 3;

        let rules = config.booking_rules();
        assert_eq!(rules.timezone, Tz::Asia__Shanghai);
        assert_eq!(rules.no_show_grace_minutes, 20);
        assert_eq!(rules.max_capacity_overflow, 3);
    }

    #[test]
    fn test_monitor_interval_never_zero() {
        let mut config = Config::from_env();
        config.monitor_interval_secs = 0;
        assert_eq!(config.monitor_interval(), Duration::from_secs(1));
    }
}
