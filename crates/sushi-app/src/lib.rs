//! Application service layer - config, order and shift workflows, export

pub mod config;
pub mod export;
pub mod app;
pub mod repository;
