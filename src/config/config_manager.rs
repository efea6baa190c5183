// ==========================================
// 销售预测与生产计划 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 规则: 格式错误的配置值记录告警并回退默认值
// ==========================================

use crate::config::planning_config_reader::PlanningConfigReader;
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::year_month::YearMonth;
use crate::engine::alert_engine::AlertThresholds;
use crate::engine::baseline::DEFAULT_HORIZON;
use crate::engine::production::DEFAULT_SAFETY_STOCK_PCT;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

type BoxError = Box<dyn Error + Send + Sync>;

/// 默认分析服务地址
pub const DEFAULT_ANALYTICS_BASE_URL: &str = "http://localhost:8000/api";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（确保 schema 就绪）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, BoxError> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, BoxError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
            init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, BoxError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
    }

    /// 读取 global scope 的配置值（公开方法,供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, BoxError> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), BoxError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 删除 global scope 的配置值（恢复默认）
    pub fn remove_global_config_value(&self, key: &str) -> Result<bool, BoxError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 解析数值配置；缺失返回 None,格式错误记录告警后返回 None
    fn parse_optional<T: FromStr>(&self, key: &str) -> Result<Option<T>, BoxError> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(None);
        };

        match raw.parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误,使用默认值");
                Ok(None)
            }
        }
    }

    fn parse_or_default<T: FromStr>(&self, key: &str, default: T) -> Result<T, BoxError> {
        Ok(self.parse_optional(key)?.unwrap_or(default))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// 用途: 持久化计划运行时记录当时的配置
    pub fn get_config_snapshot(&self) -> Result<String, BoxError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置（覆盖现有 global 配置）
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, BoxError> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 分析服务地址
    pub fn get_analytics_base_url(&self) -> Result<String, BoxError> {
        Ok(self
            .get_config_value(config_keys::ANALYTICS_BASE_URL)?
            .unwrap_or_else(|| DEFAULT_ANALYTICS_BASE_URL.to_string()))
    }
}

// ==========================================
// PlanningConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PlanningConfigReader for ConfigManager {
    async fn get_anchor_month(&self) -> Result<YearMonth, BoxError> {
        Ok(self
            .parse_optional::<YearMonth>(config_keys::ANCHOR_MONTH)?
            .unwrap_or_else(YearMonth::current))
    }

    async fn get_forecast_horizon(&self) -> Result<u32, BoxError> {
        self.parse_or_default(config_keys::FORECAST_HORIZON, DEFAULT_HORIZON)
    }

    async fn get_safety_stock_pct(&self) -> Result<f64, BoxError> {
        self.parse_or_default(config_keys::SAFETY_STOCK_PCT, DEFAULT_SAFETY_STOCK_PCT)
    }

    async fn get_scenario_uplift_pct(&self) -> Result<Option<f64>, BoxError> {
        self.parse_optional(config_keys::SCENARIO_UPLIFT_PCT)
    }

    async fn get_capacity_limit(&self) -> Result<Option<i64>, BoxError> {
        self.parse_optional(config_keys::CAPACITY_LIMIT)
    }

    async fn get_moq(&self) -> Result<Option<i64>, BoxError> {
        self.parse_optional(config_keys::MOQ)
    }

    async fn get_alert_thresholds(&self) -> Result<AlertThresholds, BoxError> {
        let defaults = AlertThresholds::default();
        Ok(AlertThresholds {
            spike_ratio: self.parse_or_default(config_keys::SPIKE_RATIO, defaults.spike_ratio)?,
            promo_days_threshold: self
                .parse_or_default(config_keys::PROMO_DAYS_THRESHOLD, defaults.promo_days_threshold)?,
            promo_discount_threshold: self.parse_or_default(
                config_keys::PROMO_DISCOUNT_THRESHOLD,
                defaults.promo_discount_threshold,
            )?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 时间窗口
    pub const ANCHOR_MONTH: &str = "anchor_month";
    pub const FORECAST_HORIZON: &str = "forecast_horizon";

    // 情景与生产
    pub const SAFETY_STOCK_PCT: &str = "safety_stock_pct";
    pub const SCENARIO_UPLIFT_PCT: &str = "scenario_uplift_pct";
    pub const CAPACITY_LIMIT: &str = "capacity_limit";
    pub const MOQ: &str = "moq";

    // 告警
    pub const SPIKE_RATIO: &str = "spike_ratio";
    pub const PROMO_DAYS_THRESHOLD: &str = "promo_days_threshold";
    pub const PROMO_DISCOUNT_THRESHOLD: &str = "promo_discount_threshold";

    // 外部服务
    pub const ANALYTICS_BASE_URL: &str = "analytics_base_url";
}
