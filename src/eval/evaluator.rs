use crate::domain::card::{Card, Suit};
use crate::domain::hand::HandCategory;

use super::hand_rank::HandRank;
use super::masks::{straight_high, value_bit, RankMask};

/// Главная функция: вычислить лучшую 5-карточную руку из hole + board.
///
/// Ожидается:
///   - `hole.len() == 2`
///   - `board.len()` от 3 до 5 (обычно 5)
///
/// Но в целом функция корректно работает для любых 5–7 карт.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> HandRank {
    let mut cards = Vec::with_capacity(hole.len() + board.len());
    cards.extend_from_slice(hole);
    cards.extend_from_slice(board);

    assert!(
        (5..=7).contains(&cards.len()),
        "evaluate_best_hand ожидает от 5 до 7 карт"
    );

    best_five_of(&cards)
}

/// Перебираем все пятёрки из N карт (N=5..7, максимум 21 вариант)
/// и выбираем сильнейшую.
fn best_five_of(cards: &[Card]) -> HandRank {
    let n = cards.len();
    let mut best: Option<HandRank> = None;

    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let rank = evaluate_five(&five);
                        if best.as_ref().map_or(true, |cur| rank > *cur) {
                            best = Some(rank);
                        }
                    }
                }
            }
        }
    }

    best.expect("хотя бы одна пятёрка карт должна существовать")
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_five(cards: &[Card; 5]) -> HandRank {
    let mut suit_counts = [0u8; 4]; // 0:clubs,1:diamonds,2:hearts,3:spades
    let mut value_counts = [0u8; 15]; // индексы 2..=14
    let mut mask: RankMask = 0;

    for card in cards.iter() {
        let suit_idx = match card.suit {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        };
        suit_counts[suit_idx] += 1;

        let value = card.rank.value();
        value_counts[value as usize] += 1;
        mask |= value_bit(value);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight = straight_high(mask);

    // Группы одинаковых рангов: (количество, значение),
    // отсортированные по количеству, затем по значению, по убыванию.
    let mut groups: Vec<(u8, u8)> = Vec::with_capacity(5);
    for value in (2u8..=14).rev() {
        let count = value_counts[value as usize];
        if count > 0 {
            groups.push((count, value));
        }
    }
    groups.sort_by(|a, b| b.cmp(a));

    // Форма руки: [4,1], [3,2], [3,1,1], [2,2,1], [2,1,1,1] или [1;5].
    let shape: Vec<u8> = groups.iter().map(|&(count, _)| count).collect();

    if is_flush {
        if let Some(high) = straight {
            // Роял от стрит-флеша отделяем: все роялы равны между собой.
            if high == 14 {
                return HandRank::new(HandCategory::RoyalFlush, Vec::new());
            }
            return HandRank::new(HandCategory::StraightFlush, vec![high]);
        }
    }

    if shape == [4, 1] {
        return HandRank::new(HandCategory::FourOfAKind, vec![groups[0].1, groups[1].1]);
    }

    if shape == [3, 2] {
        return HandRank::new(HandCategory::FullHouse, vec![groups[0].1, groups[1].1]);
    }

    if is_flush {
        // Все пять карт одной масти: кикеры — ранги по убыванию.
        let mut values: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        return HandRank::new(HandCategory::Flush, values);
    }

    if let Some(high) = straight {
        return HandRank::new(HandCategory::Straight, vec![high]);
    }

    if shape == [3, 1, 1] {
        return HandRank::new(
            HandCategory::ThreeOfAKind,
            vec![groups[0].1, groups[1].1, groups[2].1],
        );
    }

    if shape == [2, 2, 1] {
        return HandRank::new(
            HandCategory::TwoPair,
            vec![groups[0].1, groups[1].1, groups[2].1],
        );
    }

    if shape == [2, 1, 1, 1] {
        return HandRank::new(
            HandCategory::OnePair,
            vec![groups[0].1, groups[1].1, groups[2].1, groups[3].1],
        );
    }

    // Старшая карта: группы уже отсортированы по значению.
    let values: Vec<u8> = groups.iter().map(|&(_, value)| value).collect();
    HandRank::new(HandCategory::HighCard, values)
}
