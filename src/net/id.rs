//! 标识符类型
//!
//! 定义节点和应用的唯一标识符。

use serde::Serialize;

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

/// 应用标识符（在 `Applications` 容器中的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ApplicationId(pub usize);
