// ==========================================
// 销售预测与生产计划 - 命令行入口
// ==========================================
// 用法:
//   sales-planning [--db PATH] [--locale en] [--json] <命令>
// 命令: summary / plan / alerts / forecast / save / runs / import <文件...> / analytics
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sales_planning::api::analytics::{AnalyticsQuery, AnalyticsSource};
use sales_planning::api::{DashboardApi, PlanningApi, PlanningFilter};
use sales_planning::db::{default_db_path, open_and_init};
use sales_planning::{i18n, logging, Flavor, PackSize, PlanningSnapshot, Severity, YearMonth};

#[derive(Debug, Parser)]
#[command(name = "sales-planning", version, about = "销售预测与生产计划")]
struct Cli {
    /// 数据库文件路径
    #[arg(long, env = "SALES_PLANNING_DB_PATH")]
    db: Option<String>,

    /// 界面语言（zh-CN / en）
    #[arg(long)]
    locale: Option<String>,

    /// 以 JSON 输出
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 头部 KPI
    Summary,
    /// 生产计划明细
    Plan,
    /// 告警列表
    Alerts {
        /// 最低严重度（low / med / high）
        #[arg(long)]
        min_severity: Option<Severity>,
    },
    /// 预测明细
    Forecast,
    /// 构建快照并保存运行记录
    Save,
    /// 最近的运行记录
    Runs {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// 以导入文件构建快照并输出汇总
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 查询外部分析服务的驾驶舱汇总（服务地址取自配置 analytics_base_url）
    Analytics {
        /// 起始月（YYYY-MM）
        #[arg(long)]
        from: Option<YearMonth>,
        /// 截止月（YYYY-MM）
        #[arg(long)]
        to: Option<YearMonth>,
        #[arg(long)]
        flavor: Option<Flavor>,
        #[arg(long)]
        size: Option<PackSize>,
    },
}

fn print_output<T: Serialize + std::fmt::Debug>(json: bool, value: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{:#?}", value);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    if let Some(locale) = cli.locale.as_deref() {
        i18n::set_locale(locale);
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", sales_planning::APP_NAME, sales_planning::VERSION);
    tracing::info!("==================================================");

    let db_path = cli.db.clone().unwrap_or_else(default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let conn = open_and_init(&db_path).with_context(|| format!("无法打开数据库 {}", db_path))?;
    let api = PlanningApi::new(Arc::new(Mutex::new(conn)))?;

    let command = cli.command.unwrap_or(Command::Summary);

    match command {
        Command::Import { files } => {
            let imported = api.build_snapshot_from_files(files).await?;
            for result in &imported.imports {
                match result {
                    Ok(r) => tracing::info!(
                        file = %r.file_name,
                        success = r.summary.success,
                        blocked = r.summary.blocked,
                        "导入完成"
                    ),
                    Err(e) => tracing::error!("{}", e),
                }
            }
            print_output(cli.json, imported.snapshot.summary())?;
        }
        Command::Save => {
            let snapshot = api.build_snapshot().await?;
            let run_id = api.save_run(&snapshot)?;
            println!("{}: {}", i18n::t("common.success"), run_id);
        }
        Command::Runs { limit } => {
            print_output(cli.json, &api.list_runs(limit)?)?;
        }
        Command::Analytics {
            from,
            to,
            flavor,
            size,
        } => {
            let client = api.analytics_client()?;
            tracing::info!(base_url = client.base_url(), "查询分析服务");
            let query = AnalyticsQuery {
                date_from: from,
                date_to: to,
                flavor,
                size,
                ..Default::default()
            };
            print_output(cli.json, &client.dashboard_summary(&query).await?)?;
        }
        other => {
            let snapshot: PlanningSnapshot = api.build_snapshot().await?;
            let dashboard = DashboardApi::new(Arc::new(snapshot));
            let filter = PlanningFilter::default();
            match other {
                Command::Summary => print_output(cli.json, &dashboard.summary())?,
                Command::Plan => print_output(cli.json, &dashboard.production_plan(&filter)?)?,
                Command::Alerts { min_severity } => {
                    print_output(cli.json, &dashboard.list_alerts(&filter, min_severity)?)?
                }
                Command::Forecast => print_output(cli.json, &dashboard.snapshot().forecasts())?,
                Command::Save
                | Command::Runs { .. }
                | Command::Import { .. }
                | Command::Analytics { .. } => {}
            }
        }
    }

    Ok(())
}
