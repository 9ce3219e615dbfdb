//! Движок стола техасского холдема.
//!
//! Слои сверху вниз:
//! - `api` — сервис стола и срезы состояния для клиента;
//! - `engine` — правила раздачи: торговля, улицы, сайд-поты, расчёт;
//! - `eval` — оценка лучшей пятёрки из 7 карт;
//! - `time_ctrl` — чистые правила дедлайнов (готовность, ход, показ);
//! - `domain` — карты, фишки, игроки, стол;
//! - `infra` — хранилище снимков, RNG, генерация ID.
//!
//! Весь движок детерминирован: время приходит параметром `now`,
//! случайность — через `engine::RandomSource`. Один и тот же снимок
//! стола с одним и тем же входом даёт один и тот же результат.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod time_ctrl;
