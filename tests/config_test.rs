// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证文件数据库上的配置读取与快照恢复
// ==========================================


use sales_planning::config::{config_keys, ConfigManager, PlanningConfigReader};
use sales_planning::YearMonth;
use test_helpers::{create_test_db, insert_config, insert_test_config, open_test_connection};

#[tokio::test]
async fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[tokio::test]
async fn test_load_planning_config_from_file_db() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn).expect("Failed to insert test config");
    insert_config(&conn, config_keys::CAPACITY_LIMIT, "5000").unwrap();
    insert_config(&conn, config_keys::SCENARIO_UPLIFT_PCT, "-20").unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let config = config_manager.load_planning_config().await.unwrap();

    assert_eq!(config.anchor_month, YearMonth::new(2025, 6).unwrap());
    assert_eq!(config.horizon, 6);
    assert_eq!(config.safety_stock_pct, 15.0);
    assert_eq!(config.capacity_limit, Some(5000));
    assert_eq!(config.scenario_uplift_pct, Some(-20.0));
    assert_eq!(config.moq, None);
}

#[tokio::test]
async fn test_defaults_without_rows() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    let thresholds = config_manager.get_alert_thresholds().await.unwrap();
    assert_eq!(thresholds.spike_ratio, 1.3);
    assert_eq!(thresholds.promo_days_threshold, 20);
    assert_eq!(thresholds.promo_discount_threshold, 20);

    // 未配置锚定月时取当前月
    let anchor = config_manager.get_anchor_month().await.unwrap();
    assert_eq!(anchor, YearMonth::current());
}

#[tokio::test]
async fn test_invalid_horizon_rejected_on_load() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();
    config_manager
        .set_global_config_value(config_keys::FORECAST_HORIZON, "0")
        .unwrap();

    assert!(config_manager.load_planning_config().await.is_err());
}

#[tokio::test]
async fn test_values_visible_across_managers() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let writer = ConfigManager::new(&db_path).unwrap();
    writer
        .set_global_config_value(config_keys::MOQ, "250")
        .unwrap();

    let reader = ConfigManager::new(&db_path).unwrap();
    assert_eq!(reader.get_moq().await.unwrap(), Some(250));

    assert!(writer.remove_global_config_value(config_keys::MOQ).unwrap());
    assert_eq!(reader.get_moq().await.unwrap(), None);
}

#[tokio::test]
async fn test_snapshot_restore_between_databases() {
    let (_src_file, src_path) = create_test_db().unwrap();
    let (_dst_file, dst_path) = create_test_db().unwrap();

    let source = ConfigManager::new(&src_path).unwrap();
    source
        .set_global_config_value(config_keys::ANCHOR_MONTH, "2024-12")
        .unwrap();
    source
        .set_global_config_value(config_keys::SPIKE_RATIO, "1.5")
        .unwrap();
    let snapshot = source.get_config_snapshot().unwrap();

    let target = ConfigManager::new(&dst_path).unwrap();
    let restored = target.restore_config_from_snapshot(&snapshot).unwrap();
    assert_eq!(restored, 2);

    let config = target.load_planning_config().await.unwrap();
    assert_eq!(config.anchor_month, YearMonth::new(2024, 12).unwrap());
    assert_eq!(config.alert_thresholds.spike_ratio, 1.5);
}

#[tokio::test]
async fn test_analytics_base_url_default_and_override() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config_manager = ConfigManager::new(&db_path).unwrap();

    assert_eq!(
        config_manager.get_analytics_base_url().unwrap(),
        sales_planning::config::config_manager::DEFAULT_ANALYTICS_BASE_URL
    );

    config_manager
        .set_global_config_value(config_keys::ANALYTICS_BASE_URL, "http://analytics:9000/api")
        .unwrap();
    assert_eq!(
        config_manager.get_analytics_base_url().unwrap(),
        "http://analytics:9000/api"
    );
}
