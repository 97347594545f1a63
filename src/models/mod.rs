//! 数据模型模块

pub mod category;
pub mod plant;
pub mod upload;
pub mod user;

use serde::{Deserialize, Deserializer};

/// 必填字符串字段：缺失与显式 null 都视为空串，交给 validator 报缺失
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
