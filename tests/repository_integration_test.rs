// ==========================================
// 运行记录仓储集成测试
// ==========================================
// 测试目标: 文件数据库上的保存/查询/列表/删除
// ==========================================


use sales_planning::api::{ApiError, PlanningApi};
use sales_planning::config::config_keys;
use sales_planning::db::read_schema_version;
use sales_planning::repository::PlanRunRepository;
use sales_planning::{PlanningConfig, PlanningSnapshot, YearMonth};
use std::sync::{Arc, Mutex};
use test_helpers::{create_test_db, insert_test_config, open_test_connection};

fn snapshot_with_capacity(capacity: i64) -> PlanningSnapshot {
    let mut config = PlanningConfig::with_anchor(YearMonth::new(2025, 6).unwrap());
    config.capacity_limit = Some(capacity);
    config.scenario_uplift_pct = Some(5.0);
    PlanningSnapshot::build(&config).unwrap()
}

#[test]
fn test_schema_version_registered() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    assert_eq!(read_schema_version(&conn).unwrap(), Some(1));
}

#[test]
fn test_save_and_reload_items_in_order() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repo = PlanRunRepository::new(Arc::new(Mutex::new(conn)));

    let snapshot = snapshot_with_capacity(12_000);
    let run_id = repo.save_run(&snapshot, "{}").unwrap();

    let run = repo.find_run(&run_id).unwrap().expect("run should exist");
    assert_eq!(run.anchor_month, snapshot.anchor_month());
    assert_eq!(run.alert_count, snapshot.alerts().len());
    assert_eq!(run.summary.risk_badge, snapshot.summary().risk_badge);
    assert_eq!(run.summary.recommended_production, snapshot.summary().recommended_production);

    let items = repo.list_items(&run_id).unwrap();
    assert_eq!(items.as_slice(), snapshot.production_plans());
    assert!(items.iter().any(|p| p.capacity_violation_flag && p.note.is_some()));
}

#[test]
fn test_runs_survive_reopen() {
    let (_temp_file, db_path) = create_test_db().unwrap();

    let run_id = {
        let conn = open_test_connection(&db_path).unwrap();
        let repo = PlanRunRepository::new(Arc::new(Mutex::new(conn)));
        repo.save_run(&snapshot_with_capacity(12_000), "{}").unwrap()
    };

    let conn = open_test_connection(&db_path).unwrap();
    let repo = PlanRunRepository::new(Arc::new(Mutex::new(conn)));
    assert!(repo.find_run(&run_id).unwrap().is_some());
    assert_eq!(repo.list_items(&run_id).unwrap().len(), 18 * 6);
}

#[test]
fn test_list_runs_newest_first_with_limit() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repo = PlanRunRepository::new(Arc::new(Mutex::new(conn)));

    let snapshot = snapshot_with_capacity(12_000);
    let ids: Vec<String> = (0..3)
        .map(|_| repo.save_run(&snapshot, "{}").unwrap())
        .collect();

    let runs = repo.list_runs(2).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run_id, ids[2]);
    assert_eq!(runs[1].run_id, ids[1]);
}

#[test]
fn test_delete_cascades_items() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let repo = PlanRunRepository::new(Arc::new(Mutex::new(conn)));

    let run_id = repo.save_run(&snapshot_with_capacity(12_000), "{}").unwrap();
    assert!(repo.delete_run(&run_id).unwrap());
    assert!(!repo.delete_run(&run_id).unwrap());

    assert!(repo.find_run(&run_id).unwrap().is_none());
    assert!(repo.list_items(&run_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_planning_api_records_config_snapshot() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    insert_test_config(&conn).unwrap();
    let api = PlanningApi::new(Arc::new(Mutex::new(conn))).unwrap();

    let snapshot = api.build_snapshot().await.unwrap();
    assert_eq!(snapshot.anchor_month(), YearMonth::new(2025, 6).unwrap());
    let run_id = api.save_run(&snapshot).unwrap();

    // 运行后修改配置不影响已保存的快照
    api.config_manager()
        .set_global_config_value(config_keys::ANCHOR_MONTH, "2026-01")
        .unwrap();

    let (run, items) = api.get_run(&run_id).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&run.config_snapshot_json).unwrap();
    assert_eq!(saved["anchor_month"], "2025-06");
    assert_eq!(items.len(), snapshot.production_plans().len());

    assert_eq!(api.list_runs(5).unwrap().len(), 1);
    assert!(matches!(api.list_runs(0), Err(ApiError::InvalidInput(_))));
    assert!(matches!(api.get_run("missing"), Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_analytics_client_uses_configured_base_url() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    let api = PlanningApi::new(Arc::new(Mutex::new(conn))).unwrap();

    api.config_manager()
        .set_global_config_value(config_keys::ANALYTICS_BASE_URL, "http://localhost:9000/")
        .unwrap();
    let client = api.analytics_client().unwrap();
    assert_eq!(client.base_url(), "http://localhost:9000");

    // 空白值回落默认地址
    api.config_manager()
        .set_global_config_value(config_keys::ANALYTICS_BASE_URL, "   ")
        .unwrap();
    let client = api.analytics_client().unwrap();
    assert_eq!(
        client.base_url(),
        sales_planning::config::config_manager::DEFAULT_ANALYTICS_BASE_URL.trim_end_matches('/')
    );

    api.config_manager()
        .set_global_config_value(config_keys::ANALYTICS_BASE_URL, "/")
        .unwrap();
    assert!(matches!(api.analytics_client(), Err(ApiError::Analytics(_))));
}
