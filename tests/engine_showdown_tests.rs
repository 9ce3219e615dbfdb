//! Тесты расчёта раздачи: вскрытие по чек-дауну, делёж при равных
//! руках с неделимым остатком, окно показа при раннем олл-ине,
//! статистика и перенос кнопки.

use holdem_engine::domain::{
    card::Card,
    chips::Chips,
    hand::{HandCategory, HandResultKind, Street},
    table::{Table, TableConfig, TablePhase},
};
use holdem_engine::engine::{
    self, actions::PlayerActionKind, errors::EngineError, RandomSource,
};

const NOW: u64 = 1_000;

struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

fn test_config() -> TableConfig {
    TableConfig {
        max_seats: 9,
        small_blind: Chips::new(50),
        big_blind: Chips::new(100),
        buy_in_amount: Chips::new(10_000),
        action_timeout_ms: 30_000,
        ready_timeout_ms: 30_000,
        reveal_delay_ms: 5_000,
    }
}

fn seated_table(stacks: &[u64]) -> Table {
    let mut table = Table::new(test_config());
    for (seat, &stack) in stacks.iter().enumerate() {
        let id = seat as u64 + 1;
        engine::join_table(&mut table, id);
        engine::take_seat(&mut table, id, seat as u8).expect("место должно быть свободно");
        if let Some(p) = table.players.get_mut(&id) {
            p.chip_stack = Chips::new(stack);
        }
    }
    table
}

fn started(stacks: &[u64]) -> Table {
    let mut table = seated_table(stacks);
    engine::start_hand(&mut table, &mut DummyRng, 1, NOW).expect("старт раздачи");
    table
}

fn cards(text: &str) -> Vec<Card> {
    text.split_whitespace()
        .map(|s| s.parse().expect("битая карта в тесте"))
        .collect()
}

/// Вручную собранный ривер: карты и вклады задаются напрямую,
/// ставки раунда закрыты, ходить осталось последнему месту.
/// `entries[i]` = (карманные карты места i, суммарный вклад в банк).
fn crafted_river(entries: &[(&str, u64)], board: &str) -> Table {
    let stacks: Vec<u64> = entries.iter().map(|&(_, inv)| 10_000 - inv).collect();
    let mut table = seated_table(&stacks);

    table.phase = TablePhase::Playing;
    table.betting_round = Street::River;
    table.community_cards = cards(board);
    table.min_raise_increment = Chips::new(100);
    table.pot_total = Chips::new(entries.iter().map(|&(_, inv)| inv).sum());

    for (seat, &(hole, inv)) in entries.iter().enumerate() {
        let id = seat as u64 + 1;
        table.hand_participants.insert(id);
        let p = table.players.get_mut(&id).unwrap();
        p.hole_cards = cards(hole);
        p.hand_cumulative_investment = Chips::new(inv);
    }

    // Все, кроме последнего места, уже чекнули.
    for seat in 0..entries.len() - 1 {
        table.acted_since_last_raise.insert(seat as u8);
    }
    table.current_actor_seat = Some(entries.len() as u8 - 1);
    table.action_started_at = NOW;
    table
}

#[test]
fn checked_down_hand_settles_on_river() {
    let mut table = started(&[10_000, 10_000]);

    // Префлоп: SB доплачивает, BB пользуется опцией.
    engine::apply_action(&mut table, 2, PlayerActionKind::Call, NOW + 10).expect("колл SB");
    engine::apply_action(&mut table, 1, PlayerActionKind::Check, NOW + 20).expect("чек BB");

    // Флоп, тёрн и ривер прочекиваются.
    for (street, base) in [(Street::Flop, 30), (Street::Turn, 50), (Street::River, 70)] {
        assert_eq!(table.betting_round, street);
        engine::apply_action(&mut table, 2, PlayerActionKind::Check, NOW + base).expect("чек");
        engine::apply_action(&mut table, 1, PlayerActionKind::Check, NOW + base + 10)
            .expect("чек");
    }

    // Неперемешанная колода: у обоих стрит-флеш, у кнопки старше.
    assert_eq!(table.community_cards, cards("Ts 9s 8s 7s 6s"));
    assert_eq!(table.phase, TablePhase::HandEnded);
    assert_eq!(table.pot_total, Chips::ZERO);
    assert_eq!(table.current_actor_seat, None);

    let result = table.last_result.as_ref().expect("итог раздачи");
    assert_eq!(result.kind, HandResultKind::Showdown);
    assert_eq!(result.winners.len(), 1);

    let winner = &result.winners[0];
    assert_eq!(winner.player_id, 1);
    assert_eq!(winner.amount_won, Chips::new(200));
    assert_eq!(winner.net_gain, 100);
    assert_eq!(winner.hand_category, Some(HandCategory::StraightFlush));

    // На вскрытии видны категории всех дошедших.
    assert_eq!(
        result.all_revealed_hands.get(&2),
        Some(&HandCategory::StraightFlush)
    );

    assert_eq!(table.player_at_seat(0).unwrap().chip_stack, Chips::new(10_100));
    assert_eq!(table.player_at_seat(1).unwrap().chip_stack, Chips::new(9_900));

    // Разбивка банка сохранена для вью.
    assert_eq!(table.side_pots.len(), 1);
    assert_eq!(table.side_pots[0].amount, Chips::new(200));

    // Карты не стираются до следующей раздачи.
    assert_eq!(table.player_at_seat(1).unwrap().hole_cards.len(), 2);
}

#[test]
fn split_pot_gives_odd_chip_to_first_winner_after_button() {
    // Двое с одинаковыми двумя парами, третий слабее. Банк 2199
    // не делится на два: лишняя фишка уходит месту 1.
    let mut table = crafted_river(
        &[("2c 3d", 733), ("Ah Kc", 733), ("Ad Ks", 733)],
        "Kh Qd 7c 7d 2s",
    );

    engine::apply_action(&mut table, 3, PlayerActionKind::Check, NOW + 10).expect("чек закрытия");

    assert_eq!(table.phase, TablePhase::HandEnded);

    let result = table.last_result.as_ref().expect("итог раздачи");
    assert_eq!(result.kind, HandResultKind::Showdown);
    assert_eq!(result.winners.len(), 2);

    let w2 = &result.winners[0];
    assert_eq!(w2.player_id, 2);
    assert_eq!(w2.amount_won, Chips::new(1_100));
    assert_eq!(w2.net_gain, 367);

    let w3 = &result.winners[1];
    assert_eq!(w3.player_id, 3);
    assert_eq!(w3.amount_won, Chips::new(1_099));
    assert_eq!(w3.net_gain, 366);

    assert_eq!(table.players.get(&2).unwrap().chip_stack, Chips::new(10_367));
    assert_eq!(table.players.get(&3).unwrap().chip_stack, Chips::new(10_366));
    assert_eq!(table.players.get(&1).unwrap().chip_stack, Chips::new(9_267));

    // Фишки не появились и не исчезли.
    assert_eq!(table.total_seated_chips(), Chips::new(30_000));

    // Проигравший тоже во вскрытых руках.
    assert_eq!(
        result.all_revealed_hands.get(&1),
        Some(&HandCategory::TwoPair)
    );
    assert_eq!(table.players.get(&1).unwrap().losses, 1);
    assert_eq!(table.players.get(&2).unwrap().wins, 1);
    assert_eq!(table.players.get(&3).unwrap().wins, 1);
}

#[test]
fn reveal_window_settles_on_demand() {
    // Олл-ин на блайндах: стол замирает в окне показа.
    let mut table = started(&[60, 50]);
    assert_eq!(table.phase, TablePhase::Showdown);

    engine::settle_after_reveal(&mut table, NOW + 10).expect("расчёт после показа");

    assert_eq!(table.phase, TablePhase::HandEnded);

    // Кнопка (место 0) ставила BB 60: главный пот 100 и сайд-пот 10.
    assert_eq!(table.side_pots.len(), 2);
    assert_eq!(table.side_pots[0].amount, Chips::new(100));
    assert_eq!(table.side_pots[1].amount, Chips::new(10));

    // Стрит-флеш кнопки забирает оба пота.
    let result = table.last_result.as_ref().expect("итог раздачи");
    assert_eq!(result.winners.len(), 1);
    assert_eq!(result.winners[0].player_id, 1);
    assert_eq!(result.winners[0].amount_won, Chips::new(110));

    assert_eq!(table.players.get(&1).unwrap().chip_stack, Chips::new(110));
    assert_eq!(table.players.get(&2).unwrap().chip_stack, Chips::ZERO);
}

#[test]
fn settle_after_reveal_needs_showdown_phase() {
    let mut table = started(&[10_000, 10_000]);
    let err = engine::settle_after_reveal(&mut table, NOW + 10).unwrap_err();
    assert!(matches!(err, EngineError::WrongPhase));

    let mut idle = Table::new(test_config());
    let err = engine::settle_after_reveal(&mut idle, NOW).unwrap_err();
    assert!(matches!(err, EngineError::WrongPhase));
}

#[test]
fn button_moves_and_confirmations_reopen_the_table() {
    let mut table = started(&[10_000, 10_000]);
    assert_eq!(table.dealer_seat, 0);

    engine::apply_action(&mut table, 2, PlayerActionKind::Fold, NOW + 10).expect("фолд SB");
    assert_eq!(table.phase, TablePhase::HandEnded);

    // Кнопка уехала на следующее играющее место.
    assert_eq!(table.dealer_seat, 1);

    engine::confirm_result(&mut table, 1, NOW + 20).expect("подтверждение");
    assert_eq!(table.phase, TablePhase::HandEnded);

    engine::confirm_result(&mut table, 2, NOW + 30).expect("подтверждение");
    assert_eq!(table.phase, TablePhase::Waiting);
    assert!(table.result_confirmations.is_empty());
    assert!(table.ready_set.is_empty());
    assert_eq!(table.phase_started_at, NOW + 30);
}

#[test]
fn confirmations_wipe_hand_remnants_from_the_table() {
    let mut table = started(&[10_000, 10_000]);
    engine::apply_action(&mut table, 2, PlayerActionKind::Fold, NOW + 10).expect("фолд SB");

    // В hand_ended следы раздачи ещё на столе: победитель открыт.
    assert_eq!(table.players.get(&1).unwrap().hole_cards.len(), 2);
    assert!(table.players.get(&2).unwrap().folded);

    engine::confirm_result(&mut table, 1, NOW + 20).expect("подтверждение");
    engine::confirm_result(&mut table, 2, NOW + 30).expect("подтверждение");
    assert_eq!(table.phase, TablePhase::Waiting);

    // После возврата в ожидание от раздачи не остаётся ничего:
    // ни карманных карт, ни флагов, ни борда, ни сайд-потов.
    for id in [1u64, 2] {
        let p = table.players.get(&id).unwrap();
        assert!(p.hole_cards.is_empty(), "карты игрока {} не стёрты", id);
        assert!(!p.folded);
        assert!(!p.all_in);
    }
    assert!(table.community_cards.is_empty());
    assert!(table.side_pots.is_empty());
    assert!(table.hand_participants.is_empty());
}
