//! 基础设施层：配置、日志、存储与 schema 初始化

pub mod config;
pub mod database;
pub mod logger;
pub mod memory;
pub mod schema;
