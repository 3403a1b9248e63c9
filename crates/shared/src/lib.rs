//! 共享库
//!
//! 包含点赞处理服务共用的配置、错误处理、流事件模型、可观测性初始化等基础设施代码。

pub mod config;
pub mod error;
pub mod events;
pub mod observability;
pub mod test_utils;
