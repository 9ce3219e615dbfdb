use crate::domain::{Chips, Player, SeatIndex, Table};

/// Сколько фишек игроку нужно добавить до уравнивания текущей ставки.
/// Больше стека не требуем: колл на весь остаток становится олл-ином.
pub fn amount_to_call(table: &Table, player: &Player) -> Chips {
    table
        .max_round_bet()
        .saturating_sub(player.current_round_bet)
        .min(player.chip_stack)
}

/// Зафиксировать полный рейз: новая планка повышения и торговля
/// открывается заново — походившим считается только сам рейзер.
/// Короткий олл-ин сюда не попадает, он торговлю не переоткрывает.
pub fn register_full_raise(table: &mut Table, raiser: SeatIndex, increment: Chips) {
    table.min_raise_increment = increment;
    table.acted_since_last_raise.clear();
    table.acted_since_last_raise.insert(raiser);
}

/// Завершён ли раунд торговли.
///
/// Раунд закрыт, когда каждый не сфолдивший участник раздачи:
///   - либо в олл-ине,
///   - либо уже походил после последнего полного рейза (или старта
///     раунда) И его ставка равна максимальной за столом.
///
/// Блайнды ходами не считаются, поэтому BB на префлопе получает
/// свою "опцию" даже без рейзов.
pub fn is_round_complete(table: &Table) -> bool {
    let max_bet = table.max_round_bet();

    table
        .players
        .values()
        .filter(|p| p.is_in_hand())
        .all(|p| {
            if p.all_in {
                return true;
            }
            p.seat.map_or(true, |seat| {
                table.acted_since_last_raise.contains(&seat) && p.current_round_bet == max_bet
            })
        })
}
