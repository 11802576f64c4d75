//! Domain layer for sushi delivery: models, pure services, repository traits

pub mod model;
pub mod repository;
pub mod service;
