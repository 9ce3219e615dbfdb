use crate::domain::{PlayerId, SeatIndex};

use thiserror::Error;

/// Ошибки движка. Любая из них отклоняет операцию, не меняя состояние стола.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Игрок {0} не сидит за столом")]
    NotSeated(PlayerId),

    #[error("Место {0} уже занято")]
    SeatOccupied(SeatIndex),

    #[error("Операция недоступна в текущей фазе стола")]
    WrongPhase,

    #[error("Сейчас не ход игрока с id={0}")]
    NotYourTurn(PlayerId),

    #[error("Игрок {0} уже сделал это")]
    AlreadyActed(PlayerId),

    #[error("Недостаточно фишек для этой ставки")]
    InsufficientChips,

    #[error("Размер рейза меньше минимального")]
    BelowMinimumRaise,

    #[error("Недостаточно игроков с фишками для раздачи")]
    InsufficientPlayers,

    #[error("В колоде закончились карты")]
    DeckExhausted,

    #[error("Недопустимое действие в текущем состоянии")]
    IllegalAction,
}
