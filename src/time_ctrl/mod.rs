// src/time_ctrl/mod.rs
//! Контроль времени стола: дедлайны готовности, хода и окна показа.
//!
//! Вместо тикающих таймеров стол хранит метки начала фаз, а правила
//! (`timeout_decision`) чисто выводят просроченное действие из снимка
//! состояния и текущего момента.

pub mod clock;
pub mod time_rules;

pub use clock::{deadline, elapsed_ms, expired};
pub use time_rules::{timeout_decision, TimeoutDecision};
