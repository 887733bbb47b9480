//! HTTP 处理器模块

pub mod auth;
pub mod course;
pub mod department;
pub mod health;
pub mod metrics;
pub mod syllabus;
pub mod user;
