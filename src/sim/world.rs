//! 世界 trait
//!
//! 定义仿真世界接口。

use std::any::Any;

/// 仿真世界：由业务层实现（例如节点/应用/流统计），只在事件回调内被修改。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
