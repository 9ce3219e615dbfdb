//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - RNG-реализации;
//! - версионированное хранилище снимков стола.

pub mod ids;
pub mod persistence;
pub mod rng;

pub use ids::IdGenerator;
pub use persistence::{InMemoryTableStore, StoreError, TableStore};
pub use rng::{DeterministicRng, SystemRng};
