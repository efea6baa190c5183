// ==========================================
// 销售预测与生产计划 - 年月值类型
// ==========================================
// 职责: "YYYY-MM" 月份口径,支持按月偏移与时间顺序比较
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 年份范围（"YYYY" 四位可表示的年份）
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// 年月（序列化为 "YYYY-MM"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32, // 1..=12
}

impl YearMonth {
    /// 创建年月；年份或月份越界返回 None
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (MIN_YEAR..=MAX_YEAR).contains(&year) && (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 当前本地月份
    pub fn current() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// 按月偏移（可为负）
    pub fn add_months(&self, offset: i32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(offset);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// 两个月份相差的月数（other - self）
    pub fn months_until(&self, other: &YearMonth) -> i32 {
        (other.year - self.year) * 12 + (other.month as i32 - self.month as i32)
    }

    /// 当月第一天
    pub fn first_day(&self) -> NaiveDate {
        // 月份已在构造时校验,1 号必然合法
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// 接受 "YYYY-MM"、"YYYY/MM"、"YYYYMM" 以及 "YYYY-MM-DD"（取年月）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (year_part, month_part) = if let Some((y, rest)) = trimmed.split_once(['-', '/']) {
            let m = rest.split(['-', '/']).next().unwrap_or("");
            (y, m)
        } else if trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_digit()) {
            trimmed.split_at(4)
        } else {
            return Err(format!("年月格式错误: 期望 YYYY-MM，实际 {}", trimmed));
        };

        let year: i32 = year_part
            .parse()
            .map_err(|_| format!("年份无效: {}", trimmed))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| format!("月份无效: {}", trimmed))?;

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(format!("年份越界: {}", trimmed));
        }
        YearMonth::new(year, month).ok_or_else(|| format!("月份越界: {}", trimmed))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
