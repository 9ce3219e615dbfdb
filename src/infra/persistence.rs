use std::collections::HashMap;

use thiserror::Error;

use crate::domain::{Table, TableId};

/// Ошибки хранилища снимков стола.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Стол {0} не найден в хранилище")]
    NotFound(TableId),

    #[error("Конфликт версий: ожидали {expected}, в хранилище {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("Снимок стола повреждён: {0}")]
    Corrupt(String),
}

/// Версионированное хранилище снимков стола.
///
/// Каждый `save` сверяет ожидаемую версию с фактической: запись поверх
/// устаревшего снимка завершается `VersionConflict`, а не молча теряет
/// чужое сохранение.
pub trait TableStore {
    /// Загрузить снимок и его текущую версию.
    fn load(&self, key: TableId) -> Result<(Table, u64), StoreError>;

    /// Сохранить снимок поверх версии `expected_version` (0 — создание).
    /// Возвращает новую версию.
    fn save(
        &mut self,
        key: TableId,
        table: &Table,
        expected_version: u64,
    ) -> Result<u64, StoreError>;
}

/// In-memory реализация для тестов и локального запуска. Снимки лежат
/// в JSON, чтобы путь сериализации совпадал с настоящим хранилищем.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    snapshots: HashMap<TableId, (u64, String)>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for InMemoryTableStore {
    fn load(&self, key: TableId) -> Result<(Table, u64), StoreError> {
        let (version, raw) = self
            .snapshots
            .get(&key)
            .ok_or(StoreError::NotFound(key))?;
        let table: Table =
            serde_json::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok((table, *version))
    }

    fn save(
        &mut self,
        key: TableId,
        table: &Table,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let actual = self.snapshots.get(&key).map(|(v, _)| *v).unwrap_or(0);
        if actual != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }

        let raw =
            serde_json::to_string(table).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let version = actual + 1;
        self.snapshots.insert(key, (version, raw));
        Ok(version)
    }
}
