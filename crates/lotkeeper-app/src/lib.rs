//! Application service layer - parking use cases, config, repositories

pub mod app;
pub mod config;
pub mod repository;
