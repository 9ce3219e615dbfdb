use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::PlayerId;

/// Улица раздачи (раунд торговли).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

/// Категория покерной руки по силе (0 = старшая карта .. 9 = роял-флеш).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

/// Сайд-пот: часть банка, на которую претендуют не все игроки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    /// Кто может выиграть этот пот (не сфолдившие, вложившие >= threshold).
    pub eligible_players: BTreeSet<PlayerId>,
    /// Уровень вклада, который закрывает этот пот.
    pub investment_threshold: Chips,
}

/// Как завершилась раздача.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandResultKind {
    /// Все, кроме одного, сфолдили — банк ушёл без вскрытия.
    SingleWinner,
    /// Вскрытие с оценкой рук и разбором сайд-потов.
    Showdown,
}

/// Выигрыш одного игрока по итогам раздачи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandWinner {
    pub player_id: PlayerId,
    /// Сколько фишек забрал из банка (по всем потам).
    pub amount_won: Chips,
    /// Выигрыш минус собственные вложения за раздачу.
    pub net_gain: i64,
    /// Категория руки (None при победе без вскрытия).
    pub hand_category: Option<HandCategory>,
}

/// Итог раздачи: победители и вскрытые руки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandResult {
    pub kind: HandResultKind,
    pub winners: Vec<HandWinner>,
    /// Категории всех дошедших до вскрытия рук (пусто при SingleWinner).
    pub all_revealed_hands: BTreeMap<PlayerId, HandCategory>,
}
