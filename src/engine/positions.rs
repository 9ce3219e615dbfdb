use crate::domain::{Player, SeatIndex, Table};

/// Общий обход мест по кругу: первый seat после `from`, чей игрок
/// проходит предикат. Полный круг включает и сам `from` (последним).
fn scan_from<F>(table: &Table, from: SeatIndex, pred: F) -> Option<SeatIndex>
where
    F: Fn(&Player) -> bool,
{
    let max = table.max_seats() as usize;
    if max == 0 {
        return None;
    }

    let mut idx = from as usize % max;
    for _ in 0..max {
        idx = (idx + 1) % max;
        let seat = idx as SeatIndex;
        if let Some(p) = table.player_at_seat(seat) {
            if pred(p) {
                return Some(seat);
            }
        }
    }

    None
}

/// Следующее место, игрок которого ещё может делать ставки:
/// не сфолдил, не в олл-ине, с фишками. `None` — торговать больше некому.
pub fn next_actionable_seat(table: &Table, from: SeatIndex) -> Option<SeatIndex> {
    scan_from(table, from, Player::is_actionable)
}

/// Следующее место с ненулевым стеком (для переноса кнопки).
pub fn next_funded_seat(table: &Table, from: SeatIndex) -> Option<SeatIndex> {
    scan_from(table, from, |p| !p.chip_stack.is_zero())
}

/// Места сидящих игроков с фишками по кругу, начиная с `start` (включая его).
/// Порядок раздачи карт и постановки блайндов.
pub fn funded_seats_from(table: &Table, start: SeatIndex) -> Vec<SeatIndex> {
    let max = table.max_seats() as usize;
    let mut seats = Vec::new();
    if max == 0 {
        return seats;
    }

    let mut idx = start as usize % max;
    for _ in 0..max {
        let seat = idx as SeatIndex;
        if let Some(p) = table.player_at_seat(seat) {
            if !p.chip_stack.is_zero() {
                seats.push(seat);
            }
        }
        idx = (idx + 1) % max;
    }

    seats
}
