//! Domain layer: slot registry, tariffs, fee calculation and repository traits

pub mod model;
pub mod repository;
pub mod service;

pub use model::*;
pub use repository::{LotState, StateRepository, TariffRepository};
