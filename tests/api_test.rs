use holdem_engine::api::{PlayerView, ServiceError, TableService, TableView};
use holdem_engine::domain::{
    chips::Chips,
    hand::{HandCategory, HandResultKind, Street},
    table::{TableConfig, TablePhase},
    PlayerId,
};
use holdem_engine::engine::{actions::PlayerActionKind, errors::EngineError, RandomSource};
use holdem_engine::infra::InMemoryTableStore;

const NOW: u64 = 1_000;

struct DummyRng;

impl RandomSource for DummyRng {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

/// Утилита: конфиг стола 50/100 с бай-ином 10 000.
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

/// Утилита: сервис с пустым in-memory хранилищем и ручным RNG.
fn service() -> TableService<InMemoryTableStore, DummyRng> {
    TableService::new(InMemoryTableStore::new(), DummyRng, 1, test_config())
}

/// Утилита: сервис с двумя севшими игроками (id 1 на месте 0, id 2 на месте 1).
fn seated_service() -> TableService<InMemoryTableStore, DummyRng> {
    let mut svc = service();
    svc.join(1, NOW).expect("join первого игрока");
    svc.take_seat(1, 0, NOW).expect("место 0 свободно");
    svc.join(2, NOW).expect("join второго игрока");
    svc.take_seat(2, 1, NOW).expect("место 1 свободно");
    svc
}

/// Утилита: сервис с запущенной хедз-ап раздачей (обе готовности в NOW).
fn playing_service() -> TableService<InMemoryTableStore, DummyRng> {
    let mut svc = seated_service();
    svc.mark_ready(1, NOW).expect("готовность первого");
    svc.mark_ready(2, NOW).expect("готовность второго");
    svc
}

/// Утилита: найти игрока в срезе по id.
fn view_player(view: &TableView, id: PlayerId) -> &PlayerView {
    view.players
        .iter()
        .find(|p| p.player_id == id)
        .expect("игрок должен присутствовать в срезе")
}

// ----------------------
// tests для service.rs: лобби
// ----------------------

#[test]
fn join_and_take_seat_reflected_in_view() {
    let mut svc = service();

    let view = svc.join(1, NOW).expect("join");
    assert_eq!(view.phase, TablePhase::Waiting);
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.hand_id, None);

    let p = view_player(&view, 1);
    assert_eq!(p.seat, None);
    assert_eq!(p.chip_stack, Chips::new(10_000), "бай-ин начисляется при входе");
    assert!(!p.is_ready);

    let view = svc.take_seat(1, 0, NOW).expect("take_seat");
    assert_eq!(view_player(&view, 1).seat, Some(0));
}

#[test]
fn repeat_join_does_not_add_second_buy_in() {
    let mut svc = service();
    svc.join(1, NOW).expect("первый join");
    let view = svc.join(1, NOW).expect("повторный join");

    assert_eq!(view.players.len(), 1);
    assert_eq!(view_player(&view, 1).chip_stack, Chips::new(10_000));
}

#[test]
fn mark_ready_of_last_player_starts_hand_immediately() {
    let mut svc = seated_service();

    let view = svc.mark_ready(1, NOW).expect("готовность первого");
    assert_eq!(view.phase, TablePhase::ReadyPhase);
    assert_eq!(view.hand_id, None);
    assert_eq!(view.ready_deadline, Some(NOW + 30_000));
    assert!(view_player(&view, 1).is_ready);
    assert!(!view_player(&view, 2).is_ready);

    // Вторая готовность закрывает набор, раздача стартует в той же операции.
    let view = svc.mark_ready(2, NOW).expect("готовность второго");
    assert_eq!(view.phase, TablePhase::Playing);
    assert_eq!(view.betting_round, Street::Preflop);
    assert_eq!(view.hand_id, Some(1));
    assert_eq!(view.pot_total, Chips::new(150));
    assert_eq!(view.ready_deadline, None);
    assert_eq!(view.action_deadline, Some(NOW + 30_000));
}

#[test]
fn unmark_ready_rolls_phase_back_to_waiting() {
    let mut svc = seated_service();
    svc.mark_ready(1, NOW).expect("готовность");

    let view = svc.unmark_ready(1, NOW).expect("снятие готовности");
    assert_eq!(view.phase, TablePhase::Waiting);
    assert_eq!(view.ready_deadline, None);
    assert!(!view_player(&view, 1).is_ready);
}

#[test]
fn manual_start_hand_applies_new_config() {
    let mut svc = seated_service();
    let raised_stakes = TableConfig {
        small_blind: Chips::new(100),
        big_blind: Chips::new(200),
        ..test_config()
    };

    // Ручной запуск не требует готовностей и отдаёт срез наблюдателя.
    let view = svc.start_hand(raised_stakes, NOW).expect("ручной старт");
    assert_eq!(view.phase, TablePhase::Playing);
    assert_eq!(view.hand_id, Some(1));
    assert_eq!(view.pot_total, Chips::new(300), "блайнды уже по новому конфигу");
    assert!(view.players.iter().all(|p| p.hole_cards.is_none()));
}

// ----------------------
// tests для dto.rs: скрытие карт и подсказки актёру
// ----------------------

#[test]
fn hole_cards_visible_only_to_their_owner_during_hand() {
    let mut svc = playing_service();

    let view = svc.inspect(1, NOW).expect("срез глазами первого");
    assert_eq!(
        view_player(&view, 1).hole_cards.as_ref().map(Vec::len),
        Some(2)
    );
    assert!(view_player(&view, 2).hole_cards.is_none());

    let view = svc.inspect(2, NOW).expect("срез глазами второго");
    assert!(view_player(&view, 1).hole_cards.is_none());
    assert_eq!(
        view_player(&view, 2).hole_cards.as_ref().map(Vec::len),
        Some(2)
    );

    // Наблюдатель без места не видит ничьих карт.
    let view = svc.inspect(0, NOW).expect("срез наблюдателя");
    assert!(view.players.iter().all(|p| p.hole_cards.is_none()));
}

#[test]
fn to_call_accompanies_current_actor() {
    let mut svc = playing_service();

    // Хедз-ап: баттон (место 0) на большом блайнде, первым ходит место 1.
    let view = svc.inspect(0, NOW).expect("срез");
    assert_eq!(view.current_actor_seat, Some(1));
    assert_eq!(view.to_call, Some(Chips::new(50)));

    let view = svc
        .apply_action(2, PlayerActionKind::Call, NOW)
        .expect("колл малого блайнда");
    assert_eq!(view.current_actor_seat, Some(0));
    assert_eq!(view.to_call, Some(Chips::ZERO), "опция большого блайнда");
}

// ----------------------
// tests для service.rs: таймауты через sweep
// ----------------------

#[test]
fn ready_timeout_evicts_silent_players_via_inspect() {
    let mut svc = seated_service();
    svc.mark_ready(1, NOW).expect("готовность первого");

    // Ровно на границе окно ещё живо.
    let view = svc.inspect(0, NOW + 30_000).expect("срез на границе");
    assert_eq!(view.phase, TablePhase::ReadyPhase);

    let view = svc.inspect(0, NOW + 30_001).expect("срез после дедлайна");
    assert_eq!(view.phase, TablePhase::Waiting, "одних готовых мало для старта");
    assert_eq!(view_player(&view, 2).seat, None, "молчуна сняли с места");
    assert_eq!(view_player(&view, 2).chip_stack, Chips::ZERO);
    assert_eq!(view_player(&view, 1).seat, Some(0));
    assert!(view_player(&view, 1).is_ready, "отметка готовности переживает откат");
}

#[test]
fn action_timeout_folds_the_slow_actor() {
    let mut svc = playing_service();

    // Малый блайнд (место 1) не успел уравнять — принудительный фолд.
    let view = svc.inspect(0, NOW + 30_001).expect("срез после дедлайна хода");
    assert_eq!(view.phase, TablePhase::HandEnded);

    let result = view.last_result.as_ref().expect("итог раздачи");
    assert_eq!(result.kind, HandResultKind::SingleWinner);
    assert_eq!(result.winners.len(), 1);
    assert_eq!(result.winners[0].player_id, 1);
    assert_eq!(result.winners[0].amount_won, Chips::new(150));
    assert_eq!(result.winners[0].net_gain, 50);
    assert_eq!(result.winners[0].hand_category, None);

    assert_eq!(view_player(&view, 1).chip_stack, Chips::new(10_050));
    assert_eq!(view_player(&view, 2).chip_stack, Chips::new(9_950));
    assert!(view_player(&view, 2).folded);
    // Несбросивший победитель открыт даже наблюдателю.
    assert_eq!(
        view_player(&view, 1).hole_cards.as_ref().map(Vec::len),
        Some(2)
    );
    assert!(view_player(&view, 2).hole_cards.is_none());
}

#[test]
fn reveal_window_settles_by_deadline() {
    let mut svc = playing_service();

    svc.apply_action(2, PlayerActionKind::AllIn, NOW)
        .expect("олл-ин малого блайнда");
    let view = svc
        .apply_action(1, PlayerActionKind::Call, NOW)
        .expect("колл на весь стек");

    // Оба в олл-ине: доска докатана, стол стоит в окне показа.
    assert_eq!(view.phase, TablePhase::Showdown);
    assert_eq!(view.betting_round, Street::River);
    assert_eq!(view.community_cards.len(), 5);
    assert_eq!(view.pot_total, Chips::new(20_000));
    assert_eq!(view.current_actor_seat, None);
    assert_eq!(view.to_call, None);
    assert_eq!(view.reveal_deadline, Some(NOW + 5_000));

    let observer = svc.inspect(0, NOW).expect("срез наблюдателя");
    assert!(
        observer.players.iter().all(|p| p.hole_cards.is_some()),
        "в окне показа обе руки открыты и наблюдателю"
    );

    let view = svc.inspect(0, NOW + 5_000).expect("срез на границе окна");
    assert_eq!(view.phase, TablePhase::Showdown);

    let view = svc.inspect(0, NOW + 5_001).expect("срез после окна");
    assert_eq!(view.phase, TablePhase::HandEnded);

    let result = view.last_result.as_ref().expect("итог раздачи");
    assert_eq!(result.kind, HandResultKind::Showdown);
    assert_eq!(result.winners.len(), 1);
    assert_eq!(result.winners[0].player_id, 1);
    assert_eq!(result.winners[0].amount_won, Chips::new(20_000));
    assert_eq!(result.winners[0].net_gain, 10_000);
    assert_eq!(
        result.winners[0].hand_category,
        Some(HandCategory::StraightFlush)
    );
    assert_eq!(result.all_revealed_hands.len(), 2);

    assert_eq!(view.side_pots.len(), 1);
    assert_eq!(view.side_pots[0].amount, Chips::new(20_000));
    assert_eq!(view_player(&view, 1).chip_stack, Chips::new(20_000));
    assert_eq!(view_player(&view, 2).chip_stack, Chips::ZERO);
}

#[test]
fn engine_rejection_passes_through_service() {
    let mut svc = playing_service();

    // Ходит место 1, а действие шлёт игрок с места 0.
    let err = svc
        .apply_action(1, PlayerActionKind::Call, NOW)
        .expect_err("ход вне очереди");
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::NotYourTurn(1))
    ));

    // Ошибка случилась до сохранения: снимок в хранилище не тронут.
    let view = svc.inspect(0, NOW).expect("срез");
    assert_eq!(view.betting_round, Street::Preflop);
    assert_eq!(view.pot_total, Chips::new(150));
    assert_eq!(view.current_actor_seat, Some(1));
}

#[test]
fn confirmations_return_table_to_waiting() {
    let mut svc = playing_service();
    svc.apply_action(2, PlayerActionKind::Fold, NOW)
        .expect("фолд малого блайнда");

    let view = svc.confirm_result(1, NOW).expect("первое подтверждение");
    assert_eq!(view.phase, TablePhase::HandEnded);
    assert!(view.last_result.is_some());

    let view = svc.confirm_result(2, NOW).expect("второе подтверждение");
    assert_eq!(view.phase, TablePhase::Waiting);
    assert_eq!(view.last_result, None, "итог показывается только в hand_ended");
    assert!(!view_player(&view, 1).is_ready);
    assert!(!view_player(&view, 2).is_ready);
    assert_eq!(view_player(&view, 1).chip_stack, Chips::new(10_050));
    assert_eq!(view_player(&view, 2).chip_stack, Chips::new(9_950));
}

#[test]
fn waiting_view_after_confirmations_shows_no_hand_remnants() {
    let mut svc = playing_service();

    // Ранний олл-ин: борд докатан, после дедлайна показа — расчёт.
    svc.apply_action(2, PlayerActionKind::AllIn, NOW).expect("олл-ин");
    svc.apply_action(1, PlayerActionKind::Call, NOW).expect("колл");
    svc.inspect(0, NOW + 5_001).expect("расчёт по дедлайну показа");

    svc.confirm_result(1, NOW + 5_100).expect("первое подтверждение");
    let view = svc.confirm_result(2, NOW + 5_200).expect("второе подтверждение");
    assert_eq!(view.phase, TablePhase::Waiting);

    // Прошлая раздача не просвечивает: ни борда, ни сайд-потов.
    assert!(view.community_cards.is_empty());
    assert!(view.side_pots.is_empty());

    // Даже своих карт победитель в ожидании не видит — их больше нет.
    let view = svc.inspect(1, NOW + 5_300).expect("срез глазами победителя");
    assert!(view.players.iter().all(|p| p.hole_cards.is_none()));
    assert!(view.players.iter().all(|p| !p.folded && !p.all_in));
}

#[test]
fn join_rejects_reserved_observer_id() {
    let mut svc = service();

    let err = svc.join(0, NOW).expect_err("id наблюдателя занят");
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::IllegalAction)
    ));

    // Игрок с id 0 не появился даже в срезе наблюдателя.
    let view = svc.inspect(0, NOW).expect("срез");
    assert!(view.players.is_empty());
}

#[test]
fn add_chips_refills_stack_between_hands() {
    let mut svc = seated_service();

    let view = svc
        .add_chips(1, Chips::new(5_000), NOW)
        .expect("докупка в ожидании");
    assert_eq!(view_player(&view, 1).chip_stack, Chips::new(15_000));

    // Посреди раздачи стек трогать нельзя.
    svc.mark_ready(1, NOW).expect("готовность первого");
    svc.mark_ready(2, NOW).expect("готовность второго");
    let err = svc
        .add_chips(1, Chips::new(1_000), NOW)
        .expect_err("докупка в раздаче");
    assert!(matches!(err, ServiceError::Engine(EngineError::WrongPhase)));
}
