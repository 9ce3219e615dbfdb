use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Chips;

/// Действие игрока в раунде торговли.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    Fold,
    Check,
    Call,
    /// Поднять ставку ДО указанной суммы (не "на"). Когда текущей ставки
    /// нет, это открывающий бет: минимум равен big blind.
    Raise(Chips),
    /// Поставить весь стек. Если итоговая ставка выше текущей, считается
    /// рейзом (полным или коротким), иначе коллом "на сколько хватило".
    AllIn,
}

impl fmt::Display for PlayerActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerActionKind::Fold => write!(f, "fold"),
            PlayerActionKind::Check => write!(f, "check"),
            PlayerActionKind::Call => write!(f, "call"),
            PlayerActionKind::Raise(to) => write!(f, "raise to {}", to.0),
            PlayerActionKind::AllIn => write!(f, "all-in"),
        }
    }
}
