use thiserror::Error;
use tracing::info;

use crate::api::dto::{build_table_view, TableView};
use crate::domain::{Chips, PlayerId, SeatIndex, Table, TableConfig, TableId, TablePhase, Timestamp};
use crate::engine;
use crate::engine::{EngineError, PlayerActionKind, RandomSource};
use crate::infra::{IdGenerator, StoreError, TableStore};
use crate::time_ctrl::{timeout_decision, TimeoutDecision};

/// Зритель "никто": срез стола без героя, все карманные карты скрыты.
/// Id зарезервирован за наблюдателем, поэтому `join(0)` отклоняется.
const OBSERVER: PlayerId = 0;

/// Ошибки сервисного слоя: движок либо хранилище.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Сервис одного стола поверх версионированного хранилища.
///
/// Каждая операция проходит один и тот же путь: загрузка снимка,
/// применение просроченных дедлайнов, сама операция, сохранение с
/// проверкой версии. Часы сервису не нужны: клиент передаёт `now`,
/// поэтому любую последовательность операций можно воспроизвести.
pub struct TableService<S, R> {
    store: S,
    rng: R,
    ids: IdGenerator,
    table_key: TableId,
    default_config: TableConfig,
}

impl<S: TableStore, R: RandomSource> TableService<S, R> {
    pub fn new(store: S, rng: R, table_key: TableId, default_config: TableConfig) -> Self {
        Self {
            store,
            rng,
            ids: IdGenerator::new(),
            table_key,
            default_config,
        }
    }

    fn load_or_create(&self) -> Result<(Table, u64), ServiceError> {
        match self.store.load(self.table_key) {
            Ok(pair) => Ok(pair),
            Err(StoreError::NotFound(_)) => Ok((Table::new(self.default_config.clone()), 0)),
            Err(e) => Err(e.into()),
        }
    }

    /// Применить к снимку все просроченные дедлайны.
    ///
    /// Решения выдаёт `timeout_decision`, цикл крутится, пока они есть:
    /// после выселения может сразу стартовать раздача, а принудительный
    /// фолд может закрыть улицу. Возвращает, изменился ли стол.
    fn sweep_timeouts(&mut self, table: &mut Table, now: Timestamp) -> Result<bool, ServiceError> {
        let mut changed = false;

        loop {
            let decision = match timeout_decision(table, now, &table.config) {
                Some(d) => d,
                None => break,
            };

            match decision {
                TimeoutDecision::EvictUnready { player_ids } => {
                    engine::evict_unready(table, &player_ids);
                    if engine::all_funded_ready(table) {
                        let hand_id = self.ids.next_hand_id();
                        engine::start_hand(table, &mut self.rng, hand_id, now)?;
                    } else {
                        table.phase = TablePhase::Waiting;
                        table.phase_started_at = now;
                    }
                }

                TimeoutDecision::ForceAction { player_id, kind, .. } => {
                    info!(player = player_id, action = %kind, "действие за игрока по таймауту");
                    engine::apply_action(table, player_id, kind, now)?;
                }

                TimeoutDecision::SettleReveal => {
                    engine::settle_after_reveal(table, now)?;
                }
            }

            changed = true;
        }

        Ok(changed)
    }

    /// Присоединиться к столу. Повторный join ничего не меняет.
    /// Id наблюдателя занят и игроку не достаётся.
    pub fn join(&mut self, player_id: PlayerId, now: Timestamp) -> Result<TableView, ServiceError> {
        if player_id == OBSERVER {
            return Err(EngineError::IllegalAction.into());
        }
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        engine::join_table(&mut table, player_id);
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Занять место.
    pub fn take_seat(
        &mut self,
        player_id: PlayerId,
        seat: SeatIndex,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        engine::take_seat(&mut table, player_id, seat)?;
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Отметиться готовым. Когда готовы все сидящие с фишками,
    /// раздача стартует сразу, в этой же операции.
    pub fn mark_ready(
        &mut self,
        player_id: PlayerId,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        let all_ready = engine::mark_ready(&mut table, player_id, now)?;
        if all_ready {
            let hand_id = self.ids.next_hand_id();
            engine::start_hand(&mut table, &mut self.rng, hand_id, now)?;
        }
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Снять отметку готовности.
    pub fn unmark_ready(
        &mut self,
        player_id: PlayerId,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        engine::unmark_ready(&mut table, player_id)?;
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Докупить фишек. Работает только вне живой раздачи, так что
    /// опустевший игрок может вернуться в игру к следующей раздаче.
    pub fn add_chips(
        &mut self,
        player_id: PlayerId,
        amount: Chips,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        engine::add_chips(&mut table, player_id, amount)?;
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Запустить раздачу вручную с новым конфигом стола.
    pub fn start_hand(
        &mut self,
        config: TableConfig,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        table.config = config;
        let hand_id = self.ids.next_hand_id();
        engine::start_hand(&mut table, &mut self.rng, hand_id, now)?;
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, OBSERVER))
    }

    /// Действие игрока в раздаче.
    pub fn apply_action(
        &mut self,
        player_id: PlayerId,
        kind: PlayerActionKind,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        engine::apply_action(&mut table, player_id, kind, now)?;
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Подтвердить результат раздачи.
    pub fn confirm_result(
        &mut self,
        player_id: PlayerId,
        now: Timestamp,
    ) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        self.sweep_timeouts(&mut table, now)?;
        engine::confirm_result(&mut table, player_id, now)?;
        self.store.save(self.table_key, &table, version)?;
        Ok(build_table_view(&table, player_id))
    }

    /// Посмотреть стол глазами `viewer`.
    ///
    /// Чтение тоже прогоняет дедлайны: снимок сохраняется, только если
    /// они что-то изменили.
    pub fn inspect(&mut self, viewer: PlayerId, now: Timestamp) -> Result<TableView, ServiceError> {
        let (mut table, version) = self.load_or_create()?;
        let changed = self.sweep_timeouts(&mut table, now)?;
        if changed {
            self.store.save(self.table_key, &table, version)?;
        }
        Ok(build_table_view(&table, viewer))
    }
}
