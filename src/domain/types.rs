// ==========================================
// 销售预测与生产计划 - 领域类型定义
// ==========================================
// 职责: 产品目录枚举（口味/规格/渠道）与告警/风险等级
// 红线: 目录为封闭集合,顺序即生成顺序,不可随意调整
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 口味 (Flavor)
// ==========================================
// 顺序与生成器遍历顺序一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flavor {
    Original,   // 原味
    Chocolate,  // 巧克力
    Strawberry, // 草莓
    Mango,      // 芒果
    Matcha,     // 抹茶
    Coffee,     // 咖啡
}

impl Flavor {
    pub const ALL: [Flavor; 6] = [
        Flavor::Original,
        Flavor::Chocolate,
        Flavor::Strawberry,
        Flavor::Mango,
        Flavor::Matcha,
        Flavor::Coffee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Original => "ORIGINAL",
            Flavor::Chocolate => "CHOCOLATE",
            Flavor::Strawberry => "STRAWBERRY",
            Flavor::Mango => "MANGO",
            Flavor::Matcha => "MATCHA",
            Flavor::Coffee => "COFFEE",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = String;

    /// 支持英文代码与中文名称
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ORIGINAL" | "原味" => Ok(Flavor::Original),
            "CHOCOLATE" | "巧克力" => Ok(Flavor::Chocolate),
            "STRAWBERRY" | "草莓" => Ok(Flavor::Strawberry),
            "MANGO" | "芒果" => Ok(Flavor::Mango),
            "MATCHA" | "抹茶" => Ok(Flavor::Matcha),
            "COFFEE" | "咖啡" => Ok(Flavor::Coffee),
            other => Err(format!("未知口味: {}", other)),
        }
    }
}

// ==========================================
// 规格 (Pack Size)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PackSize {
    #[serde(rename = "200")]
    Ml200,
    #[serde(rename = "400")]
    Ml400,
    #[serde(rename = "1000")]
    Ml1000,
}

impl PackSize {
    pub const ALL: [PackSize; 3] = [PackSize::Ml200, PackSize::Ml400, PackSize::Ml1000];

    /// 容量（ml）
    pub fn volume_ml(&self) -> u32 {
        match self {
            PackSize::Ml200 => 200,
            PackSize::Ml400 => 400,
            PackSize::Ml1000 => 1000,
        }
    }
}

impl fmt::Display for PackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.volume_ml())
    }
}

impl FromStr for PackSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let digits = normalized.trim_end_matches("ml").trim();
        // Excel 数值单元格可能带小数位（如 "400.0"）
        let digits = digits.strip_suffix(".0").unwrap_or(digits);
        match digits {
            "200" => Ok(PackSize::Ml200),
            "400" => Ok(PackSize::Ml400),
            "1000" => Ok(PackSize::Ml1000),
            other => Err(format!("未知规格: {}", other)),
        }
    }
}

// ==========================================
// 销售渠道 (Channel)
// ==========================================
// 非主键维度,生成器按记录随机分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    ModernTrade,      // 现代渠道（商超）
    TraditionalTrade, // 传统渠道（便利店/夫妻店）
    ECommerce,        // 电商
    FoodService,      // 餐饮
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::ModernTrade,
        Channel::TraditionalTrade,
        Channel::ECommerce,
        Channel::FoodService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::ModernTrade => "MODERN_TRADE",
            Channel::TraditionalTrade => "TRADITIONAL_TRADE",
            Channel::ECommerce => "E_COMMERCE",
            Channel::FoodService => "FOOD_SERVICE",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "MODERN_TRADE" | "MT" | "商超" => Ok(Channel::ModernTrade),
            "TRADITIONAL_TRADE" | "GT" | "传统渠道" => Ok(Channel::TraditionalTrade),
            "E_COMMERCE" | "ECOMMERCE" | "电商" => Ok(Channel::ECommerce),
            "FOOD_SERVICE" | "HORECA" | "餐饮" => Ok(Channel::FoodService),
            other => Err(format!("未知渠道: {}", other)),
        }
    }
}

// ==========================================
// 促销类型 (Promo Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoType {
    PriceOff, // 直降
    Bundle,   // 组合装
    Display,  // 陈列
}

impl PromoType {
    pub const ALL: [PromoType; 3] = [PromoType::PriceOff, PromoType::Bundle, PromoType::Display];
}

impl fmt::Display for PromoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromoType::PriceOff => write!(f, "PRICE_OFF"),
            PromoType::Bundle => write!(f, "BUNDLE"),
            PromoType::Display => write!(f, "DISPLAY"),
        }
    }
}

// ==========================================
// 告警类型 (Alert Type)
// ==========================================
// DemandDrop / ForecastDrift 仅声明,当前规则不产出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    DemandSpike,
    DemandDrop,
    PromoConflict,
    ForecastDrift,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::DemandSpike => write!(f, "demand_spike"),
            AlertType::DemandDrop => write!(f, "demand_drop"),
            AlertType::PromoConflict => write!(f, "promo_conflict"),
            AlertType::ForecastDrift => write!(f, "forecast_drift"),
        }
    }
}

// ==========================================
// 告警严重度 (Severity)
// ==========================================
// 顺序: Low < Med < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Med,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Med => write!(f, "med"),
            Severity::High => write!(f, "high"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "med" | "medium" => Ok(Severity::Med),
            "high" => Ok(Severity::High),
            other => Err(format!("未知严重度: {}", other)),
        }
    }
}

// ==========================================
// 风险徽章 (Risk Badge)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBadge {
    Low,
    Med,
    High,
}

impl fmt::Display for RiskBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBadge::Low => write!(f, "Low"),
            RiskBadge::Med => write!(f, "Med"),
            RiskBadge::High => write!(f, "High"),
        }
    }
}
