//! ports - 抽象 trait 层
//!
//! 定义库存持久化的抽象接口及其内存实现

mod memory;
mod repository;

pub use memory::*;
pub use repository::*;
