// ==========================================
// 销售预测与生产计划 - 计划运行记录仓储
// ==========================================
// 职责: 持久化 PlanningSnapshot 的生产计划与汇总,供事后追溯
// 红线: Repository 不含业务逻辑；运行记录写入后只读
// ==========================================

use crate::domain::forecast::ProductionPlan;
use crate::domain::summary::GlobalSummary;
use crate::domain::types::{Flavor, PackSize};
use crate::domain::year_month::YearMonth;
use crate::engine::snapshot::PlanningSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// PlanRunEntity - 计划运行记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRunEntity {
    pub run_id: String,
    pub anchor_month: YearMonth,
    pub config_snapshot_json: String, // 运行时的 config_kv 快照
    pub summary: GlobalSummary,
    pub alert_count: usize,
    pub created_at: DateTime<Utc>,
}

// 数据库行的原始形态,转换在闭包外完成
struct PlanRunRow {
    run_id: String,
    anchor_month: String,
    config_snapshot_json: String,
    summary_json: String,
    alert_count: i64,
    created_at: String,
}

struct PlanItemRow {
    year_month: String,
    flavor: String,
    size: i64,
    baseline_forecast: i64,
    scenario_forecast: Option<i64>,
    buffer_pct: f64,
    recommended_qty: i64,
    max_qty: Option<i64>,
    capacity_violation_flag: i64,
    note: Option<String>,
}

fn field_error(field: &str, message: impl Into<String>) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message: message.into(),
    }
}

impl PlanRunRow {
    fn into_entity(self) -> RepositoryResult<PlanRunEntity> {
        let anchor_month = self
            .anchor_month
            .parse::<YearMonth>()
            .map_err(|e| field_error("anchor_month", e))?;
        let summary: GlobalSummary = serde_json::from_str(&self.summary_json)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| field_error("created_at", e.to_string()))?
            .with_timezone(&Utc);

        Ok(PlanRunEntity {
            run_id: self.run_id,
            anchor_month,
            config_snapshot_json: self.config_snapshot_json,
            summary,
            alert_count: self.alert_count.max(0) as usize,
            created_at,
        })
    }
}

impl PlanItemRow {
    fn into_plan(self) -> RepositoryResult<ProductionPlan> {
        Ok(ProductionPlan {
            year_month: self
                .year_month
                .parse::<YearMonth>()
                .map_err(|e| field_error("year_month", e))?,
            flavor: self
                .flavor
                .parse::<Flavor>()
                .map_err(|e| field_error("flavor", e))?,
            size: self
                .size
                .to_string()
                .parse::<PackSize>()
                .map_err(|e| field_error("size", e))?,
            baseline_forecast: self.baseline_forecast,
            scenario_forecast: self.scenario_forecast,
            buffer_pct: self.buffer_pct,
            recommended_qty: self.recommended_qty,
            max_qty: self.max_qty,
            capacity_violation_flag: self.capacity_violation_flag != 0,
            note: self.note,
        })
    }
}

// ==========================================
// PlanRunRepository - 计划运行记录仓储
// ==========================================
pub struct PlanRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlanRunRepository {
    /// 从已有连接创建仓储实例（调用方负责 init_schema）
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存一次计划运行（头 + 明细,单事务）
    ///
    /// # 返回
    /// - Ok(run_id): 新生成的运行 ID
    pub fn save_run(
        &self,
        snapshot: &PlanningSnapshot,
        config_snapshot_json: &str,
    ) -> RepositoryResult<String> {
        let run_id = Uuid::new_v4().to_string();
        let summary_json = serde_json::to_string(snapshot.summary())?;
        let created_at = Utc::now().to_rfc3339();

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"INSERT INTO plan_run (
                    run_id, anchor_month, config_snapshot_json, summary_json,
                    alert_count, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                &run_id,
                snapshot.anchor_month().to_string(),
                config_snapshot_json,
                &summary_json,
                snapshot.alerts().len() as i64,
                &created_at,
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO plan_run_item (
                        run_id, seq_no, year_month, flavor, size, baseline_forecast,
                        scenario_forecast, buffer_pct, recommended_qty, max_qty,
                        capacity_violation_flag, note
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )?;

            for (seq_no, plan) in snapshot.production_plans().iter().enumerate() {
                stmt.execute(params![
                    &run_id,
                    seq_no as i64,
                    plan.year_month.to_string(),
                    plan.flavor.as_str(),
                    plan.size.volume_ml(),
                    plan.baseline_forecast,
                    plan.scenario_forecast,
                    plan.buffer_pct,
                    plan.recommended_qty,
                    plan.max_qty,
                    if plan.capacity_violation_flag { 1 } else { 0 },
                    &plan.note,
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!(
            run_id = %run_id,
            items = snapshot.production_plans().len(),
            "计划运行已保存"
        );
        Ok(run_id)
    }

    /// 按 run_id 查询运行记录
    pub fn find_run(&self, run_id: &str) -> RepositoryResult<Option<PlanRunEntity>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"SELECT run_id, anchor_month, config_snapshot_json, summary_json,
                          alert_count, created_at
                   FROM plan_run WHERE run_id = ?1"#,
                params![run_id],
                Self::map_run_row,
            )
            .optional()?;

        row.map(PlanRunRow::into_entity).transpose()
    }

    /// 最近的运行记录（按创建时间倒序）
    pub fn list_runs(&self, limit: usize) -> RepositoryResult<Vec<PlanRunEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT run_id, anchor_month, config_snapshot_json, summary_json,
                      alert_count, created_at
               FROM plan_run
               ORDER BY created_at DESC, rowid DESC
               LIMIT ?1"#,
        )?;

        let rows = stmt
            .query_map(params![limit as i64], Self::map_run_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(PlanRunRow::into_entity).collect()
    }

    /// 运行记录的生产计划明细（保持保存时的顺序）
    pub fn list_items(&self, run_id: &str) -> RepositoryResult<Vec<ProductionPlan>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"SELECT year_month, flavor, size, baseline_forecast, scenario_forecast,
                      buffer_pct, recommended_qty, max_qty, capacity_violation_flag, note
               FROM plan_run_item
               WHERE run_id = ?1
               ORDER BY seq_no"#,
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(PlanItemRow {
                    year_month: row.get(0)?,
                    flavor: row.get(1)?,
                    size: row.get(2)?,
                    baseline_forecast: row.get(3)?,
                    scenario_forecast: row.get(4)?,
                    buffer_pct: row.get(5)?,
                    recommended_qty: row.get(6)?,
                    max_qty: row.get(7)?,
                    capacity_violation_flag: row.get(8)?,
                    note: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(PlanItemRow::into_plan).collect()
    }

    /// 删除运行记录（明细级联删除）
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    pub fn delete_run(&self, run_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM plan_run WHERE run_id = ?1", params![run_id])?;
        Ok(affected > 0)
    }

    fn map_run_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanRunRow> {
        Ok(PlanRunRow {
            run_id: row.get(0)?,
            anchor_month: row.get(1)?,
            config_snapshot_json: row.get(2)?,
            summary_json: row.get(3)?,
            alert_count: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}
