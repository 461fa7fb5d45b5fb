//! domain-core - 库存领域核心类型
//!
//! 服务端与客户端共享同一套实体和校验规则

mod item;
mod outcome;
mod quantity;

pub use item::*;
pub use outcome::*;
pub use quantity::*;
