// ==========================================
// 销售预测与生产计划 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 非法参数必须显式报错,不得静默产出 NaN/负数
// ==========================================

use crate::domain::types::{Flavor, PackSize};
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("参数非法 ({name}={value}): {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("历史销量为空: flavor={flavor}, size={size}")]
    EmptyHistory { flavor: Flavor, size: PackSize },

    #[error("数据不一致: {0}")]
    InconsistentData(String),
}

impl EngineError {
    pub fn invalid(name: &str, value: impl ToString, reason: &str) -> Self {
        EngineError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
