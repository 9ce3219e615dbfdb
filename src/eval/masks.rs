//! Битовые маски рангов для поиска стрита.

/// Битовая маска рангов.
///
/// Используем 13 бит (от 2 до A): бит 0 = двойка, бит 12 = туз.
pub type RankMask = u16;

/// Маска колеса A2345: туз играет как единица.
const WHEEL_MASK: RankMask = (1 << 12) | 0b1111;

/// Бит для ранга по его числовому значению (2..=14).
pub fn value_bit(value: u8) -> RankMask {
    1u16 << (value - 2)
}

/// Старшая карта стрита в маске, если стрит есть.
///
/// Возвращает числовое значение старшей карты (5..=14).
/// Колесо A2345 считается стритом со старшей пятёркой.
pub fn straight_high(mask: RankMask) -> Option<u8> {
    // Пять подряд идущих битов, проверяем от бродвея вниз.
    for high in (6u8..=14).rev() {
        let run = 0b1_1111u16 << (high - 6);
        if mask & run == run {
            return Some(high);
        }
    }
    if mask & WHEEL_MASK == WHEEL_MASK {
        return Some(5);
    }
    None
}
