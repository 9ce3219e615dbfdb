use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandResult, SidePot, Street};
use crate::domain::player::Player;
use crate::domain::{HandId, PlayerId, Timestamp};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Фаза жизни стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TablePhase {
    /// Стол ждёт игроков, никто не нажал "готов".
    Waiting,
    /// Кто-то готов; остальным тикает ready-таймаут.
    ReadyPhase,
    /// Идёт раздача, торговля по улицам.
    Playing,
    /// Ранний олл-ин: борд раскрыт, тикает окно показа перед расчётом.
    Showdown,
    /// Раздача рассчитана; ждём подтверждений участников.
    HandEnded,
}

/// Конфиг стола: блайнды, бай-ин и таймауты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (обычно 2–9).
    pub max_seats: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Стартовый стек, выдаваемый при первом join.
    pub buy_in_amount: Chips,
    /// Сколько миллисекунд даётся на ход.
    pub action_timeout_ms: u64,
    /// Сколько миллисекунд живёт ready-фаза до выкидывания неготовых.
    pub ready_timeout_ms: u64,
    /// Длительность окна показа борда при раннем олл-ине.
    pub reveal_delay_ms: u64,
}

impl TableConfig {
    /// Стандартный кеш-стол: 50/100, бай-ин 10k, 30 сек на ход.
    pub fn default_cash() -> Self {
        Self {
            max_seats: 9,
            small_blind: Chips::new(50),
            big_blind: Chips::new(100),
            buy_in_amount: Chips::new(10_000),
            action_timeout_ms: 30_000,
            ready_timeout_ms: 30_000,
            reveal_delay_ms: 5_000,
        }
    }
}

/// Основное состояние стола — агрегат, который хранилище грузит и
/// сохраняет целиком. Всё внутрираздачное состояние живёт здесь же.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    /// Все игроки, когда-либо присоединившиеся (и с местом, и без).
    pub players: BTreeMap<PlayerId, Player>,
    pub phase: TablePhase,
    /// Место дилерской кнопки. Двигается по итогам каждой раздачи.
    pub dealer_seat: SeatIndex,
    /// Чей сейчас ход (только в Playing).
    pub current_actor_seat: Option<SeatIndex>,
    pub betting_round: Street,
    /// Общие карты борда (0–5 карт).
    pub community_cards: Vec<Card>,
    pub pot_total: Chips,
    /// Разбивка банка по сайд-потам. Заполняется при расчёте.
    pub side_pots: Vec<SidePot>,
    /// Минимальная повышающая часть рейза на текущей улице.
    pub min_raise_increment: Chips,
    /// Кто уже походил после последнего полного рейза (явное состояние,
    /// не реконструируется).
    pub acted_since_last_raise: BTreeSet<SeatIndex>,
    /// Кто нажал "готов" перед раздачей.
    pub ready_set: BTreeSet<PlayerId>,
    /// Кому раздали карты в текущей/последней раздаче.
    pub hand_participants: BTreeSet<PlayerId>,
    /// Кто подтвердил результат в HandEnded.
    pub result_confirmations: BTreeSet<PlayerId>,
    /// Когда началась текущая фаза (ready-таймаут, окно показа).
    pub phase_started_at: Timestamp,
    /// Когда начался ход текущего игрока (action-таймаут).
    pub action_started_at: Timestamp,
    /// ID текущей/последней раздачи.
    pub hand_id: Option<HandId>,
    /// Живая колода текущей раздачи; вне раздачи пустая.
    pub deck: Deck,
    /// Итог последней раздачи (показывается в HandEnded).
    pub last_result: Option<HandResult>,
    pub config: TableConfig,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(config: TableConfig) -> Self {
        Self {
            players: BTreeMap::new(),
            phase: TablePhase::Waiting,
            dealer_seat: 0,
            current_actor_seat: None,
            betting_round: Street::Preflop,
            community_cards: Vec::new(),
            pot_total: Chips::ZERO,
            side_pots: Vec::new(),
            min_raise_increment: Chips::ZERO,
            acted_since_last_raise: BTreeSet::new(),
            ready_set: BTreeSet::new(),
            hand_participants: BTreeSet::new(),
            result_confirmations: BTreeSet::new(),
            phase_started_at: 0,
            action_started_at: 0,
            hand_id: None,
            deck: Deck::empty(),
            last_result: None,
            config,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    /// Игрок на конкретном месте.
    pub fn player_at_seat(&self, seat: SeatIndex) -> Option<&Player> {
        self.players.values().find(|p| p.seat == Some(seat))
    }

    pub fn player_at_seat_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        self.players.values_mut().find(|p| p.seat == Some(seat))
    }

    pub fn seat_occupied(&self, seat: SeatIndex) -> bool {
        self.player_at_seat(seat).is_some()
    }

    pub fn seated_count(&self) -> usize {
        self.players.values().filter(|p| p.is_seated()).count()
    }

    /// Сколько сидящих игроков с фишками (кандидаты на раздачу).
    pub fn funded_seated_count(&self) -> usize {
        self.players
            .values()
            .filter(|p| p.is_seated() && !p.chip_stack.is_zero())
            .count()
    }

    /// Текущая максимальная ставка раунда по всем игрокам.
    /// Отдельного поля нет, значение всегда выводится из ставок.
    pub fn max_round_bet(&self) -> Chips {
        self.players
            .values()
            .map(|p| p.current_round_bet)
            .max()
            .unwrap_or(Chips::ZERO)
    }

    /// Не сфолдившие участники раздачи.
    pub fn players_in_hand(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.is_in_hand())
    }

    pub fn players_in_hand_count(&self) -> usize {
        self.players_in_hand().count()
    }

    /// Сколько игроков ещё могут делать ставки.
    pub fn actionable_count(&self) -> usize {
        self.players.values().filter(|p| p.is_actionable()).count()
    }

    /// Сумма фишек на руках у сидящих (для инвариантов в тестах и расчёте).
    pub fn total_seated_chips(&self) -> Chips {
        self.players
            .values()
            .filter(|p| p.is_seated())
            .map(|p| p.chip_stack)
            .sum()
    }
}
