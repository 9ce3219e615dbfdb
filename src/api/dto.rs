use serde::{Deserialize, Serialize};

use crate::domain::{
    Card, Chips, HandId, HandResult, PlayerId, SeatIndex, SidePot, Street, Table, TablePhase,
    Timestamp,
};
use crate::engine::betting::amount_to_call;
use crate::time_ctrl::clock::deadline;

/// Представление игрока в срезе стола.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub seat: Option<SeatIndex>,
    pub chip_stack: Chips,
    pub current_round_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub is_ready: bool,
    /// Карманные карты: свои видны всегда, чужие только на вскрытии.
    pub hole_cards: Option<Vec<Card>>,
    pub wins: u32,
    pub losses: u32,
}

/// Срез стола глазами одного зрителя.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableView {
    pub phase: TablePhase,
    pub betting_round: Street,
    pub community_cards: Vec<Card>,
    pub pot_total: Chips,
    pub side_pots: Vec<SidePot>,
    pub dealer_seat: SeatIndex,
    pub current_actor_seat: Option<SeatIndex>,
    /// Сколько текущему актёру осталось добавить до колла.
    pub to_call: Option<Chips>,
    pub players: Vec<PlayerView>,
    pub hand_id: Option<HandId>,
    /// Итог последней раздачи, заполняется только в фазе hand_ended.
    pub last_result: Option<HandResult>,
    pub ready_deadline: Option<Timestamp>,
    pub action_deadline: Option<Timestamp>,
    pub reveal_deadline: Option<Timestamp>,
}

/// Собрать срез стола для зрителя `viewer`.
///
/// Правило скрытия: свои карманные карты зритель видит всегда, чужие
/// открываются только в фазах showdown / hand_ended и только у тех, кто
/// не сбросил.
pub fn build_table_view(table: &Table, viewer: PlayerId) -> TableView {
    let reveal_phase = matches!(table.phase, TablePhase::Showdown | TablePhase::HandEnded);

    let players: Vec<PlayerView> = table
        .players
        .values()
        .map(|p| {
            let show = p.id == viewer || (reveal_phase && !p.folded);
            PlayerView {
                player_id: p.id,
                seat: p.seat,
                chip_stack: p.chip_stack,
                current_round_bet: p.current_round_bet,
                folded: p.folded,
                all_in: p.all_in,
                is_ready: table.ready_set.contains(&p.id),
                hole_cards: if show && !p.hole_cards.is_empty() {
                    Some(p.hole_cards.clone())
                } else {
                    None
                },
                wins: p.wins,
                losses: p.losses,
            }
        })
        .collect();

    let to_call = match table.phase {
        TablePhase::Playing => table
            .current_actor_seat
            .and_then(|seat| table.player_at_seat(seat))
            .map(|p| amount_to_call(table, p)),
        _ => None,
    };

    let ready_deadline = match table.phase {
        TablePhase::ReadyPhase => Some(deadline(
            table.phase_started_at,
            table.config.ready_timeout_ms,
        )),
        _ => None,
    };
    let action_deadline = match (table.phase, table.current_actor_seat) {
        (TablePhase::Playing, Some(_)) => Some(deadline(
            table.action_started_at,
            table.config.action_timeout_ms,
        )),
        _ => None,
    };
    let reveal_deadline = match table.phase {
        TablePhase::Showdown => Some(deadline(
            table.phase_started_at,
            table.config.reveal_delay_ms,
        )),
        _ => None,
    };

    let last_result = if table.phase == TablePhase::HandEnded {
        table.last_result.clone()
    } else {
        None
    };

    TableView {
        phase: table.phase,
        betting_round: table.betting_round,
        community_cards: table.community_cards.clone(),
        pot_total: table.pot_total,
        side_pots: table.side_pots.clone(),
        dealer_seat: table.dealer_seat,
        current_actor_seat: table.current_actor_seat,
        to_call,
        players,
        hand_id: table.hand_id,
        last_result,
        ready_deadline,
        action_deadline,
        reveal_deadline,
    }
}
