use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// Игрок стола. Создаётся при первом join и живёт через все раздачи;
/// внутрираздачное состояние (карты, ставки, флаги) сбрасывается при
/// каждой новой раздаче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Текущий стек. Никогда не уходит в минус.
    pub chip_stack: Chips,
    /// Занятое место (None — игрок в лобби, без места).
    pub seat: Option<SeatIndex>,
    /// Карманные карты: пусто вне раздачи, ровно 2 внутри.
    pub hole_cards: Vec<Card>,
    /// Ставка в текущем раунде торговли.
    pub current_round_bet: Chips,
    /// Сколько всего внесено в банк за раздачу (все улицы). База для сайд-потов.
    pub hand_cumulative_investment: Chips,
    pub folded: bool,
    pub all_in: bool,
    /// Статистика по завершённым раздачам.
    pub wins: u32,
    pub losses: u32,
}

impl Player {
    pub fn new(id: PlayerId, chip_stack: Chips) -> Self {
        Self {
            id,
            chip_stack,
            seat: None,
            hole_cards: Vec::new(),
            current_round_bet: Chips::ZERO,
            hand_cumulative_investment: Chips::ZERO,
            folded: false,
            all_in: false,
            wins: 0,
            losses: 0,
        }
    }

    pub fn is_seated(&self) -> bool {
        self.seat.is_some()
    }

    /// Участвует ли в текущей раздаче (раздали карты и ещё не сфолдил).
    pub fn is_in_hand(&self) -> bool {
        !self.hole_cards.is_empty() && !self.folded
    }

    /// Может ли ещё делать ставки: в раздаче, не в олл-ине и с фишками.
    pub fn is_actionable(&self) -> bool {
        self.is_in_hand() && !self.all_in && !self.chip_stack.is_zero()
    }

    /// Полный сброс внутрираздачного состояния (перед новой раздачей).
    pub fn reset_for_new_hand(&mut self) {
        self.hole_cards.clear();
        self.current_round_bet = Chips::ZERO;
        self.hand_cumulative_investment = Chips::ZERO;
        self.folded = false;
        self.all_in = false;
    }

    /// Сброс денежных полей при расчёте раздачи. Карты и флаг фолда
    /// остаются до следующей раздачи — их показывает вью в hand_ended.
    pub fn settle_hand_state(&mut self) {
        self.current_round_bet = Chips::ZERO;
        self.hand_cumulative_investment = Chips::ZERO;
        self.all_in = false;
    }
}
