// src/time_ctrl/clock.rs
//! Арифметика времени: миллисекунды unix-эпохи, дедлайны и их проверка.

use crate::domain::Timestamp;

/// Сколько миллисекунд прошло от `start` до `now` (не бывает отрицательным).
pub fn elapsed_ms(start: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(start)
}

/// Момент, когда истекает окно длиной `window_ms`, начатое в `start`.
pub fn deadline(start: Timestamp, window_ms: u64) -> Timestamp {
    start.saturating_add(window_ms)
}

/// Истёк ли дедлайн. Сравнение строгое: ровно на границе окно ещё живо.
pub fn expired(start: Timestamp, window_ms: u64, now: Timestamp) -> bool {
    now > deadline(start, window_ms)
}
