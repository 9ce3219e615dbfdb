// src/time_ctrl/time_rules.rs
//! Чистые правила таймаутов стола.
//!
//! Здесь нет состояния и нет часов: решение выводится только из снимка
//! стола, текущего момента и конфига. Один и тот же вход всегда даёт одно
//! и то же решение, поэтому правила гоняются в тестах без реального времени.

use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, SeatIndex, Table, TableConfig, TablePhase, Timestamp};
use crate::engine::actions::PlayerActionKind;

use super::clock::expired;

/// Что должен сделать внешний слой по просроченному дедлайну.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeoutDecision {
    /// Ready-дедлайн вышел: выгнать всех сидящих без отметки готовности.
    EvictUnready { player_ids: Vec<PlayerId> },
    /// Дедлайн хода вышел: принудительное действие за текущего актёра.
    ForceAction {
        player_id: PlayerId,
        seat: SeatIndex,
        kind: PlayerActionKind,
    },
    /// Окно показа раннего олл-ина закрылось: пора рассчитать раздачу.
    SettleReveal,
}

/// Просроченный дедлайн текущей фазы, если он есть.
///
/// Все сравнения строгие: ровно в момент дедлайна решение ещё не выдаётся.
pub fn timeout_decision(
    table: &Table,
    now: Timestamp,
    config: &TableConfig,
) -> Option<TimeoutDecision> {
    match table.phase {
        TablePhase::ReadyPhase => {
            if !expired(table.phase_started_at, config.ready_timeout_ms, now) {
                return None;
            }
            let player_ids: Vec<PlayerId> = table
                .players
                .values()
                .filter(|p| p.is_seated() && !table.ready_set.contains(&p.id))
                .map(|p| p.id)
                .collect();
            Some(TimeoutDecision::EvictUnready { player_ids })
        }

        TablePhase::Playing => {
            if !expired(table.action_started_at, config.action_timeout_ms, now) {
                return None;
            }
            let seat = table.current_actor_seat?;
            let player = table.player_at_seat(seat)?;
            // Бесплатный чек, иначе фолд: фишки за игрока не тратим.
            let kind = if player.current_round_bet == table.max_round_bet() {
                PlayerActionKind::Check
            } else {
                PlayerActionKind::Fold
            };
            Some(TimeoutDecision::ForceAction {
                player_id: player.id,
                seat,
                kind,
            })
        }

        TablePhase::Showdown => {
            if expired(table.phase_started_at, config.reveal_delay_ms, now) {
                Some(TimeoutDecision::SettleReveal)
            } else {
                None
            }
        }

        TablePhase::Waiting | TablePhase::HandEnded => None,
    }
}
