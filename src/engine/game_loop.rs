use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::domain::{
    Chips, Deck, HandId, HandResult, HandResultKind, HandWinner, PlayerId, SeatIndex, Street,
    Table, TablePhase, Timestamp,
};
use crate::domain::player::Player;
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::{is_round_complete, register_full_raise};
use crate::engine::errors::EngineError;
use crate::engine::positions::{funded_seats_from, next_actionable_seat, next_funded_seat};
use crate::engine::side_pots::compute_side_pots;
use crate::engine::validation::validate_action;
use crate::engine::RandomSource;
use crate::eval::evaluate_best_hand;
use crate::eval::hand_rank::HandRank;

//
// Лобби: join, выбор места, готовность.
//

/// Присоединить игрока к столу. Первый join выдаёт стартовый стек
/// из конфига; повторный join ничего не меняет.
pub fn join_table(table: &mut Table, player_id: PlayerId) {
    let buy_in = table.config.buy_in_amount;
    table
        .players
        .entry(player_id)
        .or_insert_with(|| Player::new(player_id, buy_in));
}

/// Занять место за столом. Разрешено только между раздачами.
pub fn take_seat(
    table: &mut Table,
    player_id: PlayerId,
    seat: SeatIndex,
) -> Result<(), EngineError> {
    if !matches!(table.phase, TablePhase::Waiting | TablePhase::ReadyPhase) {
        return Err(EngineError::WrongPhase);
    }
    if seat >= table.max_seats() {
        return Err(EngineError::IllegalAction);
    }
    if table.seat_occupied(seat) {
        return Err(EngineError::SeatOccupied(seat));
    }

    let player = table
        .players
        .get_mut(&player_id)
        .ok_or(EngineError::NotSeated(player_id))?;
    player.seat = Some(seat);
    Ok(())
}

/// Готовы ли к раздаче все сидящие с фишками (и их не меньше двух).
pub fn all_funded_ready(table: &Table) -> bool {
    table.funded_seated_count() >= 2
        && table
            .players
            .values()
            .filter(|p| p.is_seated() && !p.chip_stack.is_zero())
            .all(|p| table.ready_set.contains(&p.id))
}

/// Отметить игрока готовым. Первый готовый открывает ready-фазу.
///
/// Возвращает `true`, когда готовы все сидящие с фишками и пора
/// запускать раздачу (этим занимается вызывающий слой, у него RNG).
pub fn mark_ready(
    table: &mut Table,
    player_id: PlayerId,
    now: Timestamp,
) -> Result<bool, EngineError> {
    if !matches!(table.phase, TablePhase::Waiting | TablePhase::ReadyPhase) {
        return Err(EngineError::WrongPhase);
    }

    let player = table
        .players
        .get(&player_id)
        .ok_or(EngineError::NotSeated(player_id))?;
    if !player.is_seated() {
        return Err(EngineError::NotSeated(player_id));
    }
    if player.chip_stack.is_zero() {
        return Err(EngineError::IllegalAction);
    }

    if !table.ready_set.insert(player_id) {
        return Err(EngineError::AlreadyActed(player_id));
    }

    if table.phase == TablePhase::Waiting {
        table.phase = TablePhase::ReadyPhase;
        table.phase_started_at = now;
    }

    Ok(all_funded_ready(table))
}

/// Снять отметку готовности. Когда готовых не остаётся, стол
/// возвращается в ожидание.
pub fn unmark_ready(table: &mut Table, player_id: PlayerId) -> Result<(), EngineError> {
    if !matches!(table.phase, TablePhase::Waiting | TablePhase::ReadyPhase) {
        return Err(EngineError::WrongPhase);
    }
    if !table.ready_set.remove(&player_id) {
        return Err(EngineError::IllegalAction);
    }
    if table.ready_set.is_empty() && table.phase == TablePhase::ReadyPhase {
        table.phase = TablePhase::Waiting;
    }
    Ok(())
}

/// Выгнать не отметившихся готовыми по ready-таймауту. Место
/// освобождается, стек сгорает: единственное место, где фишки
/// покидают стол.
pub fn evict_unready(table: &mut Table, player_ids: &[PlayerId]) {
    for id in player_ids {
        if let Some(p) = table.players.get_mut(id) {
            p.seat = None;
            p.chip_stack = Chips::ZERO;
        }
        table.ready_set.remove(id);
    }
    if !player_ids.is_empty() {
        info!(evicted = player_ids.len(), "не готовые игроки выгнаны по таймауту");
    }
}

/// Докупка фишек. Разрешена любому вошедшему игроку, но только вне
/// живой раздачи: посреди торговли стек трогать нельзя. Нулевая
/// сумма отклоняется.
pub fn add_chips(
    table: &mut Table,
    player_id: PlayerId,
    amount: Chips,
) -> Result<(), EngineError> {
    if matches!(table.phase, TablePhase::Playing | TablePhase::Showdown) {
        return Err(EngineError::WrongPhase);
    }
    if amount.is_zero() {
        return Err(EngineError::IllegalAction);
    }

    let player = table
        .players
        .get_mut(&player_id)
        .ok_or(EngineError::NotSeated(player_id))?;
    player.chip_stack += amount;

    info!(player = player_id, amount = amount.0, "докупка фишек");
    Ok(())
}

//
// Раздача: старт, действия, переход улиц.
//

/// Старт новой раздачи:
/// - сброс внутрираздачного состояния;
/// - свежая перемешанная колода;
/// - по 2 карты каждому сидящему с фишками;
/// - блайнды с двух мест после кнопки (не больше стека);
/// - первый ход у места за BB.
pub fn start_hand<R: RandomSource>(
    table: &mut Table,
    rng: &mut R,
    hand_id: HandId,
    now: Timestamp,
) -> Result<(), EngineError> {
    if !matches!(table.phase, TablePhase::Waiting | TablePhase::ReadyPhase) {
        return Err(EngineError::WrongPhase);
    }
    if table.funded_seated_count() < 2 {
        return Err(EngineError::InsufficientPlayers);
    }

    for player in table.players.values_mut() {
        player.reset_for_new_hand();
    }
    table.community_cards.clear();
    table.pot_total = Chips::ZERO;
    table.side_pots.clear();
    table.acted_since_last_raise.clear();
    table.result_confirmations.clear();
    table.ready_set.clear();
    table.last_result = None;
    table.betting_round = Street::Preflop;
    table.hand_id = Some(hand_id);

    // Кнопка обязана стоять на играющем месте.
    let dealer_funded = table
        .player_at_seat(table.dealer_seat)
        .map(|p| !p.chip_stack.is_zero())
        .unwrap_or(false);
    if !dealer_funded {
        if let Some(seat) = next_funded_seat(table, table.dealer_seat) {
            table.dealer_seat = seat;
        }
    }
    let dealer = table.dealer_seat;

    let mut deck = Deck::standard_52();
    rng.shuffle(&mut deck.cards);
    table.deck = deck;

    // Порядок раздачи и блайндов: по кругу от места слева от кнопки.
    let first = next_funded_seat(table, dealer).ok_or(EngineError::InsufficientPlayers)?;
    let order = funded_seats_from(table, first);

    let mut participants = BTreeSet::new();
    for &seat in &order {
        if let Some(p) = table.player_at_seat(seat) {
            participants.insert(p.id);
        }
    }
    table.hand_participants = participants;

    // Два круга по одной карте.
    for _round in 0..2 {
        for &seat in &order {
            let card = table.deck.draw_one().ok_or(EngineError::DeckExhausted)?;
            if let Some(p) = table.player_at_seat_mut(seat) {
                p.hole_cards.push(card);
            }
        }
    }

    // Блайнды: SB на первом играющем месте после кнопки, BB следом.
    // В хедз-апе это значит, что кнопка ставит BB.
    let sb = table.config.small_blind;
    let bb = table.config.big_blind;
    let sb_seat = order[0];
    let bb_seat = order[1];
    post_blind(table, sb_seat, sb);
    post_blind(table, bb_seat, bb);
    table.min_raise_increment = bb;

    table.phase = TablePhase::Playing;
    table.phase_started_at = now;
    table.current_actor_seat = next_actionable_seat(table, bb_seat);
    table.action_started_at = now;

    info!(
        hand_id,
        dealer,
        players = order.len(),
        pot = table.pot_total.0,
        "раздача началась"
    );

    // Все могли уйти в олл-ин уже на блайндах.
    if is_round_complete(table) {
        advance_after_complete_round(table, now)?;
    }

    Ok(())
}

/// Поставить блайнд, не больше стека. Короткий стек уходит в олл-ин.
fn post_blind(table: &mut Table, seat: SeatIndex, amount: Chips) {
    let paid = match table.player_at_seat_mut(seat) {
        Some(p) => {
            let paid = amount.min(p.chip_stack);
            p.chip_stack -= paid;
            p.current_round_bet += paid;
            p.hand_cumulative_investment += paid;
            if p.chip_stack.is_zero() {
                p.all_in = true;
            }
            paid
        }
        None => Chips::ZERO,
    };
    table.pot_total += paid;
}

/// Применить действие игрока.
///
/// Порядок проверок важен для кода ошибки: сфолдивший/олл-ин игрок
/// получает `AlreadyActed` раньше, чем `NotYourTurn`, а экономика
/// действия проверяется последней.
pub fn apply_action(
    table: &mut Table,
    player_id: PlayerId,
    kind: PlayerActionKind,
    now: Timestamp,
) -> Result<(), EngineError> {
    if table.phase != TablePhase::Playing {
        return Err(EngineError::WrongPhase);
    }

    let seat = {
        let player = table
            .players
            .get(&player_id)
            .ok_or(EngineError::NotSeated(player_id))?;
        let seat = player.seat.ok_or(EngineError::NotSeated(player_id))?;
        if !table.hand_participants.contains(&player_id) {
            return Err(EngineError::IllegalAction);
        }
        if player.folded || player.all_in {
            return Err(EngineError::AlreadyActed(player_id));
        }
        if table.current_actor_seat != Some(seat) {
            return Err(EngineError::NotYourTurn(player_id));
        }
        validate_action(table, player, &kind)?;
        seat
    };

    let max_bet_before = table.max_round_bet();

    match kind {
        PlayerActionKind::Fold => {
            if let Some(p) = table.players.get_mut(&player_id) {
                p.folded = true;
            }
        }

        PlayerActionKind::Check => {
            // Ставка уже уравнена, фишки не двигаются.
            table.acted_since_last_raise.insert(seat);
        }

        PlayerActionKind::Call => {
            let mut pay = Chips::ZERO;
            if let Some(p) = table.players.get_mut(&player_id) {
                pay = max_bet_before
                    .saturating_sub(p.current_round_bet)
                    .min(p.chip_stack);
                p.chip_stack -= pay;
                p.current_round_bet += pay;
                p.hand_cumulative_investment += pay;
                if p.chip_stack.is_zero() {
                    p.all_in = true;
                }
            }
            table.pot_total += pay;
            table.acted_since_last_raise.insert(seat);
        }

        PlayerActionKind::Raise(to) => {
            let mut delta = Chips::ZERO;
            let mut new_bet = Chips::ZERO;
            if let Some(p) = table.players.get_mut(&player_id) {
                delta = to - p.current_round_bet;
                p.chip_stack -= delta;
                p.current_round_bet = to;
                p.hand_cumulative_investment += delta;
                if p.chip_stack.is_zero() {
                    p.all_in = true;
                }
                new_bet = p.current_round_bet;
            }
            table.pot_total += delta;

            let increment = new_bet - max_bet_before;
            if increment >= table.min_raise_increment {
                register_full_raise(table, seat, increment);
            } else {
                // Короткий олл-ин-рейз: торговля не переоткрывается.
                table.acted_since_last_raise.insert(seat);
            }
        }

        PlayerActionKind::AllIn => {
            let mut delta = Chips::ZERO;
            let mut new_bet = Chips::ZERO;
            if let Some(p) = table.players.get_mut(&player_id) {
                delta = p.chip_stack;
                p.chip_stack = Chips::ZERO;
                p.current_round_bet += delta;
                p.hand_cumulative_investment += delta;
                p.all_in = true;
                new_bet = p.current_round_bet;
            }
            table.pot_total += delta;

            if new_bet > max_bet_before {
                let increment = new_bet - max_bet_before;
                if increment >= table.min_raise_increment {
                    register_full_raise(table, seat, increment);
                } else {
                    table.acted_since_last_raise.insert(seat);
                }
            } else {
                // Колл "на сколько хватило".
                table.acted_since_last_raise.insert(seat);
            }
        }
    }

    debug!(player = player_id, action = %kind, pot = table.pot_total.0, "действие применено");

    // Остался один не сфолдивший — банк уходит ему без вскрытия.
    if table.players_in_hand_count() == 1 {
        settle_single_winner(table, now);
        return Ok(());
    }

    if is_round_complete(table) {
        advance_after_complete_round(table, now)?;
    } else {
        match next_actionable_seat(table, seat) {
            Some(next) => {
                table.current_actor_seat = Some(next);
                table.action_started_at = now;
            }
            None => advance_after_complete_round(table, now)?,
        }
    }

    Ok(())
}

/// Переход после закрытого раунда торговли: следующая улица, ранний
/// доезд борда или расчёт.
fn advance_after_complete_round(table: &mut Table, now: Timestamp) -> Result<(), EngineError> {
    // Раундовые ставки уже учтены в банке и вкладах — обнуляем поля раунда.
    for p in table.players.values_mut() {
        p.current_round_bet = Chips::ZERO;
    }
    table.acted_since_last_raise.clear();
    table.min_raise_increment = table.config.big_blind;

    if table.betting_round == Street::River {
        settle_showdown(table, now);
        return Ok(());
    }

    if table.actionable_count() <= 1 {
        // Торговли больше не будет: доезжаем борд и открываем окно показа.
        while table.community_cards.len() < 5 {
            let card = table.deck.draw_one().ok_or(EngineError::DeckExhausted)?;
            table.community_cards.push(card);
        }
        table.betting_round = Street::River;
        table.phase = TablePhase::Showdown;
        table.phase_started_at = now;
        table.current_actor_seat = None;
        info!(pot = table.pot_total.0, "ранний олл-ин, борд открыт до вскрытия");
        return Ok(());
    }

    let (street, count) = match table.betting_round {
        Street::Preflop => (Street::Flop, 3),
        Street::Flop => (Street::Turn, 1),
        _ => (Street::River, 1),
    };
    for _ in 0..count {
        let card = table.deck.draw_one().ok_or(EngineError::DeckExhausted)?;
        table.community_cards.push(card);
    }
    table.betting_round = street;

    // Постфлоп первым ходит ближайший к кнопке способный ходить.
    table.current_actor_seat = next_actionable_seat(table, table.dealer_seat);
    table.action_started_at = now;

    debug!(street = ?street, board = table.community_cards.len(), "улица открыта");
    Ok(())
}

//
// Расчёт раздачи.
//

/// Закрыть окно показа раннего олл-ина и рассчитать раздачу.
pub fn settle_after_reveal(table: &mut Table, now: Timestamp) -> Result<(), EngineError> {
    if table.phase != TablePhase::Showdown {
        return Err(EngineError::WrongPhase);
    }
    settle_showdown(table, now);
    Ok(())
}

/// Банк без вскрытия: все сфолдили, остался один.
fn settle_single_winner(table: &mut Table, now: Timestamp) {
    let pot = table.pot_total;

    let winner_id = match table.players_in_hand().next() {
        Some(p) => p.id,
        None => return,
    };

    let mut invested = Chips::ZERO;
    if let Some(p) = table.players.get_mut(&winner_id) {
        invested = p.hand_cumulative_investment;
        p.chip_stack += pot;
    }

    info!(winner = winner_id, pot = pot.0, "банк ушёл без вскрытия");

    let result = HandResult {
        kind: HandResultKind::SingleWinner,
        winners: vec![HandWinner {
            player_id: winner_id,
            amount_won: pot,
            net_gain: pot.0 as i64 - invested.0 as i64,
            hand_category: None,
        }],
        all_revealed_hands: BTreeMap::new(),
    };

    finish_hand(table, result, now);
}

/// Вскрытие: оценка рук, сайд-поты, делёж каждого пота.
fn settle_showdown(table: &mut Table, now: Timestamp) {
    let mut ranks: BTreeMap<PlayerId, HandRank> = BTreeMap::new();
    for p in table.players_in_hand() {
        ranks.insert(p.id, evaluate_best_hand(&p.hole_cards, &table.community_cards));
    }

    let pots = compute_side_pots(table);
    table.side_pots = pots.clone();

    // Каждый пот разыгрывается независимо между своими претендентами.
    let mut won: BTreeMap<PlayerId, Chips> = BTreeMap::new();
    for pot in &pots {
        let mut best: Option<HandRank> = None;
        let mut pot_winners: Vec<PlayerId> = Vec::new();

        for id in &pot.eligible_players {
            let rank = match ranks.get(id) {
                Some(r) => r.clone(),
                None => continue,
            };
            let better = best.as_ref().map_or(true, |b| rank > *b);
            let equal = best.as_ref().map_or(false, |b| rank == *b);
            if better {
                best = Some(rank);
                pot_winners.clear();
                pot_winners.push(*id);
            } else if equal {
                pot_winners.push(*id);
            }
        }

        if pot_winners.is_empty() {
            continue;
        }

        let share = Chips(pot.amount.0 / pot_winners.len() as u64);
        let remainder = Chips(pot.amount.0 % pot_winners.len() as u64);

        // Неделимый остаток уходит первому победителю по кругу от кнопки.
        let first = first_winner_after_dealer(table, &pot_winners);
        for id in &pot_winners {
            let mut prize = share;
            if Some(*id) == first {
                prize += remainder;
            }
            *won.entry(*id).or_insert(Chips::ZERO) += prize;
        }
    }

    for (id, amount) in &won {
        if let Some(p) = table.players.get_mut(id) {
            p.chip_stack += *amount;
        }
    }

    let winners: Vec<HandWinner> = won
        .iter()
        .map(|(id, amount)| {
            let invested = table
                .players
                .get(id)
                .map(|p| p.hand_cumulative_investment)
                .unwrap_or(Chips::ZERO);
            HandWinner {
                player_id: *id,
                amount_won: *amount,
                net_gain: amount.0 as i64 - invested.0 as i64,
                hand_category: ranks.get(id).map(|r| r.category),
            }
        })
        .collect();

    info!(
        pots = pots.len(),
        winners = winners.len(),
        "раздача рассчитана по вскрытию"
    );

    let result = HandResult {
        kind: HandResultKind::Showdown,
        winners,
        all_revealed_hands: ranks.iter().map(|(id, r)| (*id, r.category)).collect(),
    };

    finish_hand(table, result, now);
}

/// Первый победитель в порядке мест по кругу после кнопки.
fn first_winner_after_dealer(table: &Table, winners: &[PlayerId]) -> Option<PlayerId> {
    let max = table.max_seats() as usize;
    if max == 0 {
        return winners.first().copied();
    }

    let start = table.dealer_seat as usize;
    for step in 1..=max {
        let seat = ((start + step) % max) as SeatIndex;
        if let Some(p) = table.player_at_seat(seat) {
            if winners.contains(&p.id) {
                return Some(p.id);
            }
        }
    }

    winners.first().copied()
}

/// Общий эпилог раздачи: статистика, перенос кнопки, переход в hand_ended.
fn finish_hand(table: &mut Table, result: HandResult, now: Timestamp) {
    let winner_ids: BTreeSet<PlayerId> = result.winners.iter().map(|w| w.player_id).collect();

    let participants = table.hand_participants.clone();
    for id in participants {
        if let Some(p) = table.players.get_mut(&id) {
            if winner_ids.contains(&id) {
                p.wins += 1;
            } else {
                p.losses += 1;
            }
            p.settle_hand_state();
        }
    }

    table.pot_total = Chips::ZERO;
    table.current_actor_seat = None;
    table.acted_since_last_raise.clear();
    table.min_raise_increment = Chips::ZERO;
    table.deck = Deck::empty();
    table.result_confirmations.clear();
    table.last_result = Some(result);

    // Кнопка уходит к следующему сидящему с фишками.
    if let Some(seat) = next_funded_seat(table, table.dealer_seat) {
        table.dealer_seat = seat;
    }

    table.phase = TablePhase::HandEnded;
    table.phase_started_at = now;
}

/// Стереть следы раздачи со стола. Карты, флаг фолда, борд и
/// сайд-поты живут до возврата в ожидание и не дальше: вью в фазе
/// waiting не должно показывать ничего из прошлой раздачи.
fn clear_hand_remnants(table: &mut Table) {
    for p in table.players.values_mut() {
        p.reset_for_new_hand();
    }
    table.community_cards.clear();
    table.side_pots.clear();
    table.hand_participants.clear();
}

/// Подтвердить результат раздачи. Когда подтвердили все участники,
/// стол очищается от следов раздачи и возвращается в ожидание.
pub fn confirm_result(
    table: &mut Table,
    player_id: PlayerId,
    now: Timestamp,
) -> Result<(), EngineError> {
    if table.phase != TablePhase::HandEnded {
        return Err(EngineError::WrongPhase);
    }
    if !table.hand_participants.contains(&player_id) {
        return Err(EngineError::IllegalAction);
    }
    if !table.result_confirmations.insert(player_id) {
        return Err(EngineError::AlreadyActed(player_id));
    }

    if table.result_confirmations.is_superset(&table.hand_participants) {
        clear_hand_remnants(table);
        table.phase = TablePhase::Waiting;
        table.phase_started_at = now;
        table.ready_set.clear();
        table.result_confirmations.clear();
    }
    Ok(())
}
