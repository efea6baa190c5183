// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成销量导入测试数据集 CSV 文件
// 输出: tests/fixtures/datasets/*.csv
// ==========================================

use csv::Writer;
use sales_planning::{Channel, Flavor, PackSize, SalesGenerator, YearMonth};
use std::error::Error;
use std::fs::{self, File};

const OUTPUT_DIR: &str = "tests/fixtures/datasets";

// CSV 表头（中文列名,与导入字段别名一致）
const CSV_HEADER: &[&str] = &["月份", "口味", "规格", "销量", "渠道"];

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");
    fs::create_dir_all(OUTPUT_DIR)?;

    // 锚定月可由第一个参数指定（YYYY-MM）,默认当前月
    let anchor = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<YearMonth>()?,
        None => YearMonth::current(),
    };

    // 1. 演示数据（确定性种子,432条）
    generate_demo_sales(anchor)?;

    // 2. 多渠道拆分数据
    generate_multi_channel(anchor)?;

    // 3. 数据质量问题
    generate_dq_issues(anchor)?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_demo_sales(anchor: YearMonth) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/01_demo_sales.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);
    wtr.write_record(CSV_HEADER)?;

    let records = SalesGenerator::new().generate(anchor);
    for r in &records {
        wtr.write_record([
            r.year_month.to_string(),
            r.flavor.to_string(),
            r.size.to_string(),
            r.sales_qty.to_string(),
            r.channel.to_string(),
        ])?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_demo_sales.csv ({}条)", records.len());
    Ok(())
}

fn generate_multi_channel(anchor: YearMonth) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/02_multi_channel.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);
    wtr.write_record(CSV_HEADER)?;

    let mut count = 0;
    for offset in -6..0 {
        let month = anchor.add_months(offset).to_string();
        for (i, channel) in Channel::ALL.iter().enumerate() {
            let qty = 500 + (i as i64) * 250 + (offset as i64).abs() * 10;
            wtr.write_record([
                month.clone(),
                Flavor::Mango.to_string(),
                PackSize::Ml400.to_string(),
                qty.to_string(),
                channel.to_string(),
            ])?;
            count += 1;
        }
    }

    wtr.flush()?;
    println!("✓ 生成 02_multi_channel.csv ({}条,同月多渠道)", count);
    Ok(())
}

fn generate_dq_issues(anchor: YearMonth) -> Result<(), Box<dyn Error>> {
    let path = format!("{}/03_dq_issues.csv", OUTPUT_DIR);
    let mut wtr = Writer::from_writer(File::create(&path)?);
    wtr.write_record(CSV_HEADER)?;

    let month = anchor.add_months(-1).to_string();
    let rows: [[&str; 5]; 6] = [
        [&month, "芒果", "200", "1200", "电商"],  // 正常
        ["2025-13", "芒果", "200", "1200", "电商"], // 月份非法
        [&month, "榴莲", "200", "1200", "电商"],  // 未知口味
        [&month, "抹茶", "300", "1200", "电商"],  // 未知规格
        [&month, "咖啡", "1000", "-5", "餐饮"],   // 负销量
        [&month, "原味", "400", "800", ""],       // 缺渠道（警告）
    ];
    for row in rows.iter() {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    println!("✓ 生成 03_dq_issues.csv ({}条,含4条阻断)", rows.len());
    Ok(())
}
