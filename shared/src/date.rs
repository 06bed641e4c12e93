//! 时间类型模块
//!
//! 任务的截止时间在线上是 ISO-8601 字符串（后端序列化 naive datetime 时
//! 可能不带时区后缀），本模块提供：
//! - `Timestamp`: 毫秒时间戳，用于排序和提醒窗口比较
//! - 宽容的字符串解析与 `<input type="date">` 的往返转换

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::time::Duration;

// =========================================================
// Timestamp - 毫秒时间戳类型
// =========================================================

/// 自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 纪元（缺失截止日期的任务按此排序）
    pub const EPOCH: Timestamp = Timestamp(0);

    /// 获取当前时间的毫秒时间戳
    #[inline]
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_millis() as i64)
    }
}

// =========================================================
// 解析 (Parsing)
// =========================================================

/// 从 ISO-8601 / RFC 3339 字符串解析时间戳
///
/// 依次尝试：带时区偏移、无时区（按 UTC 处理）、纯日期（当天零点）。
/// 返回 None 如果三种形式都解析失败。
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp(dt.timestamp_millis()));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Timestamp(naive.and_utc().timestamp_millis()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Timestamp(naive.and_utc().timestamp_millis()));
    }
    None
}

/// 排序键：无截止日期（或无法解析）的任务按纪元处理
pub fn due_timestamp_or_epoch(due_date: Option<&str>) -> Timestamp {
    due_date
        .and_then(parse_timestamp)
        .unwrap_or(Timestamp::EPOCH)
}

// =========================================================
// 展示与表单转换 (Display & Form Round-trip)
// =========================================================

/// 列表展示用的短格式，如 "Jun 1"；无日期显示 "No date"
pub fn display_due_date(due_date: Option<&str>) -> String {
    due_date
        .and_then(parse_timestamp)
        .and_then(|ts| DateTime::<Utc>::from_timestamp_millis(ts.as_millis()))
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_else(|| "No date".to_string())
}

/// 转换为 `<input type="date">` 的值（YYYY-MM-DD），无日期为空串
pub fn date_input_value(due_date: Option<&str>) -> String {
    due_date
        .and_then(parse_timestamp)
        .and_then(|ts| DateTime::<Utc>::from_timestamp_millis(ts.as_millis()))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 从 `<input type="date">` 的值还原截止时间（UTC 当天零点）
///
/// 空串或非法输入返回 None（即清除截止日期）。
pub fn due_date_from_input(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| format!("{}T00:00:00Z", date.format("%Y-%m-%d")))
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-06-01T00:00:00Z").unwrap();
        assert_eq!(ts.as_millis(), 1_748_736_000_000);
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        // FastAPI 序列化 naive datetime 时没有时区后缀
        let with_z = parse_timestamp("2025-06-01T00:00:00Z").unwrap();
        let naive = parse_timestamp("2025-06-01T00:00:00").unwrap();
        assert_eq!(with_z, naive);

        let fractional = parse_timestamp("2025-06-01T00:00:00.000").unwrap();
        assert_eq!(with_z, fractional);
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(
            parse_timestamp("2025-06-01"),
            parse_timestamp("2025-06-01T00:00:00Z")
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn missing_due_date_sorts_as_epoch() {
        assert_eq!(due_timestamp_or_epoch(None), Timestamp::EPOCH);
        assert_eq!(due_timestamp_or_epoch(Some("garbage")), Timestamp::EPOCH);
        assert!(due_timestamp_or_epoch(Some("2025-01-01T00:00:00Z")) > Timestamp::EPOCH);
    }

    #[test]
    fn displays_short_date() {
        assert_eq!(display_due_date(Some("2025-06-01T00:00:00Z")), "Jun 1");
        assert_eq!(display_due_date(Some("2025-12-24T10:30:00Z")), "Dec 24");
        assert_eq!(display_due_date(None), "No date");
        assert_eq!(display_due_date(Some("garbage")), "No date");
    }

    #[test]
    fn date_input_round_trip() {
        let wire = due_date_from_input("2025-06-01").unwrap();
        assert_eq!(wire, "2025-06-01T00:00:00Z");
        assert_eq!(date_input_value(Some(&wire)), "2025-06-01");
    }

    #[test]
    fn empty_input_clears_due_date() {
        assert_eq!(due_date_from_input(""), None);
        assert_eq!(due_date_from_input("   "), None);
        assert_eq!(due_date_from_input("junk"), None);
        assert_eq!(date_input_value(None), "");
    }
}
