//! Внешний слой стола.
//!
//! Здесь живут:
//! - сервис (service.rs) — операции над столом поверх хранилища;
//! - DTO (dto.rs) — срезы стола для клиента, со скрытием чужих карт.

pub mod dto;
pub mod service;

pub use dto::{build_table_view, PlayerView, TableView};
pub use service::{ServiceError, TableService};
