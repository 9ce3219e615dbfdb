// src/bin/holdem_dev_cli.rs
//
// Локальный прогон стола без сети: сценарии с ботами поверх
// TableService + InMemoryTableStore. Время симулируется переменной
// `now`, поэтому тут же видно работу дедлайнов.

use holdem_engine::api::{TableService, TableView};
use holdem_engine::domain::{Chips, PlayerId, TableConfig, TablePhase, Timestamp};
use holdem_engine::engine::PlayerActionKind;
use holdem_engine::infra::{DeterministicRng, IdGenerator, InMemoryTableStore};
use tracing_subscriber::EnvFilter;

type Svc = TableService<InMemoryTableStore, DeterministicRng>;

const MAX_STEPS: u32 = 200;

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(env_filter)
        .compact()
        .try_init();

    println!("holdem_dev_cli: локальный прогон стола...");

    run_basic_hand();
    run_allin_reveal();
    run_timeout_demo();

    println!("[CLI] Завершение работы dev-CLI.");
}

fn new_service(ids: &IdGenerator, seed: u64) -> Svc {
    TableService::new(
        InMemoryTableStore::new(),
        DeterministicRng::from_seed(seed),
        ids.next_table_id(),
        TableConfig::default_cash(),
    )
}

/// Сценарий 1: три игрока, рейз на первом шаге, дальше чек/колл до вскрытия.
fn run_basic_hand() {
    println!();
    println!("================ СЦЕНАРИЙ 1: РЕЙЗ И ВСКРЫТИЕ =================");

    let ids = IdGenerator::new();
    let mut svc = new_service(&ids, 42);
    let mut now: Timestamp = 1_000;

    let players: Vec<PlayerId> = (0..3).map(|_| ids.next_player_id()).collect();
    for (seat, pid) in players.iter().enumerate() {
        if let Err(e) = svc.join(*pid, now) {
            println!("[CLI] ОШИБКА join({}): {}", pid, e);
            return;
        }
        if let Err(e) = svc.take_seat(*pid, seat as u8, now) {
            println!("[CLI] ОШИБКА take_seat({}): {}", pid, e);
            return;
        }
    }

    // Первый игрок отмечается и тут же передумывает: стол откатывается
    // из ready-фазы обратно в ожидание.
    now += 100;
    if let Err(e) = svc.mark_ready(players[0], now) {
        println!("[CLI] ОШИБКА mark_ready({}): {}", players[0], e);
        return;
    }
    now += 100;
    match svc.unmark_ready(players[0], now) {
        Ok(v) => println!(
            "[CLI] игрок {} снял готовность, фаза снова {:?}",
            players[0], v.phase
        ),
        Err(e) => {
            println!("[CLI] ОШИБКА unmark_ready({}): {}", players[0], e);
            return;
        }
    }

    // Последний mark_ready стартует раздачу.
    let mut view = None;
    for pid in &players {
        now += 200;
        match svc.mark_ready(*pid, now) {
            Ok(v) => view = Some(v),
            Err(e) => {
                println!("[CLI] ОШИБКА mark_ready({}): {}", pid, e);
                return;
            }
        }
    }
    let view = match view {
        Some(v) => v,
        None => return,
    };
    print_view("после старта", &view);

    let view = play_until_done(&mut svc, view, &mut now, true);
    finish_hand(&mut svc, &view, &players, &mut now);
}

/// Сценарий 2: хедз-ап, олл-ин на префлопе, окно показа и доезд борда.
fn run_allin_reveal() {
    println!();
    println!("================ СЦЕНАРИЙ 2: ОЛЛ-ИН И ОКНО ПОКАЗА =================");

    let ids = IdGenerator::new();
    let mut svc = new_service(&ids, 7);
    let mut now: Timestamp = 5_000;

    let players: Vec<PlayerId> = (0..2).map(|_| ids.next_player_id()).collect();
    for (seat, pid) in players.iter().enumerate() {
        let _ = svc.join(*pid, now);
        if let Err(e) = svc.take_seat(*pid, seat as u8, now) {
            println!("[CLI] ОШИБКА take_seat({}): {}", pid, e);
            return;
        }
    }

    // Ручной старт: готовность не нужна, конфиг задаётся явно.
    now += 200;
    let view = match svc.start_hand(TableConfig::default_cash(), now) {
        Ok(v) => v,
        Err(e) => {
            println!("[CLI] ОШИБКА start_hand: {}", e);
            return;
        }
    };
    print_view("после ручного старта", &view);

    let mut view = view;
    let mut step = 0u32;
    while view.phase == TablePhase::Playing {
        step += 1;
        if step > MAX_STEPS {
            println!("[CLI] Превышен лимит шагов ({MAX_STEPS}), выходим.");
            return;
        }
        let (pid, _) = match pick_action(&view, false, step) {
            Some(x) => x,
            None => break,
        };
        now += 300;
        println!("[CLI][step={}] игрок {} -> all-in", step, pid);
        view = match svc.apply_action(pid, PlayerActionKind::AllIn, now) {
            Ok(v) => v,
            Err(e) => {
                println!("[CLI] ОШИБКА apply_action: {}", e);
                return;
            }
        };
        print_view("после действия", &view);
    }

    // Окно показа: ждём дедлайн и даём сервису рассчитать раздачу.
    if view.phase == TablePhase::Showdown {
        if let Some(deadline) = view.reveal_deadline {
            now = deadline + 1;
        }
        view = match svc.inspect(players[0], now) {
            Ok(v) => v,
            Err(e) => {
                println!("[CLI] ОШИБКА inspect: {}", e);
                return;
            }
        };
        print_view("после расчёта по дедлайну показа", &view);
    }

    finish_hand(&mut svc, &view, &players, &mut now);

    // Проигравший остался без фишек: докупка возвращает его в игру.
    if let Some(busted) = view
        .players
        .iter()
        .find(|p| p.chip_stack.is_zero() && p.seat.is_some())
    {
        now += 100;
        match svc.add_chips(busted.player_id, Chips::new(5_000), now) {
            Ok(v) => {
                let stack = v
                    .players
                    .iter()
                    .find(|p| p.player_id == busted.player_id)
                    .map(|p| p.chip_stack.0)
                    .unwrap_or(0);
                println!(
                    "[CLI] игрок {} докупил 5000, стек теперь {}",
                    busted.player_id, stack
                );
            }
            Err(e) => println!("[CLI] ОШИБКА add_chips({}): {}", busted.player_id, e),
        }
    }
}

/// Сценарий 3: дедлайны. Сначала выселение не готовых, затем авто-фолд.
fn run_timeout_demo() {
    println!();
    println!("================ СЦЕНАРИЙ 3: ДЕДЛАЙНЫ =================");

    let ids = IdGenerator::new();
    let mut svc = new_service(&ids, 99);
    let mut now: Timestamp = 10_000;

    let ready_one = ids.next_player_id();
    let silent_one = ids.next_player_id();
    for (seat, pid) in [ready_one, silent_one].iter().enumerate() {
        let _ = svc.join(*pid, now);
        let _ = svc.take_seat(*pid, seat as u8, now);
    }

    let view = match svc.mark_ready(ready_one, now) {
        Ok(v) => v,
        Err(e) => {
            println!("[CLI] ОШИБКА mark_ready: {}", e);
            return;
        }
    };
    println!(
        "[CLI] игрок {} готов, игрок {} молчит, дедлайн готовности = {:?}",
        ready_one, silent_one, view.ready_deadline
    );

    if let Some(deadline) = view.ready_deadline {
        now = deadline + 1;
    }
    match svc.inspect(ready_one, now) {
        Ok(v) => print_view("после выселения по таймауту", &v),
        Err(e) => {
            println!("[CLI] ОШИБКА inspect: {}", e);
            return;
        }
    }

    // Вторая часть: раздача стартует, но никто не ходит.
    let mut svc = new_service(&ids, 100);
    let first = ids.next_player_id();
    let second = ids.next_player_id();
    for (seat, pid) in [first, second].iter().enumerate() {
        let _ = svc.join(*pid, now);
        let _ = svc.take_seat(*pid, seat as u8, now);
    }
    let _ = svc.mark_ready(first, now);
    let view = match svc.mark_ready(second, now) {
        Ok(v) => v,
        Err(e) => {
            println!("[CLI] ОШИБКА mark_ready: {}", e);
            return;
        }
    };
    print_view("раздача идёт, никто не ходит", &view);

    if let Some(deadline) = view.action_deadline {
        now = deadline + 1;
    }
    match svc.inspect(first, now) {
        Ok(v) => print_view("после авто-действия за молчуна", &v),
        Err(e) => println!("[CLI] ОШИБКА inspect: {}", e),
    }
}

/// Прогон раздачи ботами до конца фазы Playing.
fn play_until_done(svc: &mut Svc, mut view: TableView, now: &mut Timestamp, raise_first: bool) -> TableView {
    let mut step = 0u32;
    while view.phase == TablePhase::Playing {
        step += 1;
        if step > MAX_STEPS {
            println!("[CLI] Превышен лимит шагов ({MAX_STEPS}), выходим.");
            break;
        }
        let (pid, kind) = match pick_action(&view, raise_first, step) {
            Some(x) => x,
            None => break,
        };
        *now += 500;
        println!(
            "[CLI][step={}] street={:?} игрок {} -> {}",
            step, view.betting_round, pid, kind
        );
        view = match svc.apply_action(pid, kind, *now) {
            Ok(v) => v,
            Err(e) => {
                println!("[CLI] ОШИБКА apply_action: {}", e);
                break;
            }
        };
    }
    view
}

/// Базовая стратегия бота: чек без долга, колл по средствам, иначе олл-ин.
/// На первом шаге сценария с рейзом — рейз до 300.
fn pick_action(view: &TableView, raise_first: bool, step: u32) -> Option<(PlayerId, PlayerActionKind)> {
    let seat = view.current_actor_seat?;
    let actor = view.players.iter().find(|p| p.seat == Some(seat))?;

    if raise_first && step == 1 {
        return Some((actor.player_id, PlayerActionKind::Raise(Chips::new(300))));
    }

    let to_call = view.to_call.unwrap_or(Chips::ZERO);
    let kind = if to_call.is_zero() {
        PlayerActionKind::Check
    } else if actor.chip_stack <= to_call {
        PlayerActionKind::AllIn
    } else {
        PlayerActionKind::Call
    };
    Some((actor.player_id, kind))
}

/// Подтверждения результата и итоговый JSON.
fn finish_hand(svc: &mut Svc, view: &TableView, players: &[PlayerId], now: &mut Timestamp) {
    if view.phase != TablePhase::HandEnded {
        print_view("итог (раздача не дошла до конца)", view);
        return;
    }

    print_view("итог раздачи", view);
    if let Some(result) = &view.last_result {
        let json = serde_json::to_string_pretty(result)
            .unwrap_or_else(|_| "<ошибка сериализации>".to_string());
        println!("=== РЕЗУЛЬТАТ РАЗДАЧИ ===");
        println!("{}", json);
    }

    for pid in players {
        *now += 100;
        match svc.confirm_result(*pid, *now) {
            Ok(v) => {
                if v.phase == TablePhase::Waiting {
                    println!("[CLI] все подтвердили, стол снова в ожидании");
                }
            }
            Err(e) => println!("[CLI] confirm_result({}): {}", pid, e),
        }
    }
}

fn print_view(tag: &str, view: &TableView) {
    let board: Vec<String> = view.community_cards.iter().map(|c| c.to_string()).collect();
    println!("---------------- {} ----------------", tag);
    println!(
        "phase={:?} street={:?} pot={} board=[{}] dealer={} actor={:?} to_call={:?}",
        view.phase,
        view.betting_round,
        view.pot_total.0,
        board.join(" "),
        view.dealer_seat,
        view.current_actor_seat,
        view.to_call.map(|c| c.0),
    );
    for p in &view.players {
        let cards = match &p.hole_cards {
            Some(cs) => cs.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "),
            None => "--".to_string(),
        };
        println!(
            "  id={} seat={:?} stack={} bet={} folded={} all_in={} ready={} cards=[{}] w/l={}/{}",
            p.player_id,
            p.seat,
            p.chip_stack.0,
            p.current_round_bet.0,
            p.folded,
            p.all_in,
            p.is_ready,
            cards,
            p.wins,
            p.losses,
        );
    }
}
