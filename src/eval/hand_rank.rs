use serde::{Deserialize, Serialize};

use crate::domain::hand::HandCategory;

/// Сила пятикарточной комбинации.
///
/// Сравнение производное: сначала категория, затем вектор кикеров
/// лексикографически. Вектор минимальный: в нём только те ранги,
/// которые реально различают руки внутри категории.
///
/// Примеры:
///   - фулл-хаус: `[ранг сета, ранг пары]`
///   - стрит: `[старшая карта]` (колесо A2345 даёт `[5]`)
///   - роял-флеш: пустой вектор, все роялы равны
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandRank {
    pub category: HandCategory,
    /// Числовые значения рангов (2..=14) в порядке значимости.
    pub tiebreaks: Vec<u8>,
}

impl HandRank {
    pub fn new(category: HandCategory, tiebreaks: Vec<u8>) -> Self {
        Self {
            category,
            tiebreaks,
        }
    }
}

/// Человеческое описание комбинации.
/// (Детально раскрашивать по картам можно позже на уровне фронта).
pub fn describe_hand(rank: &HandRank) -> String {
    match rank.category {
        HandCategory::HighCard => "High card".to_string(),
        HandCategory::OnePair => "One pair".to_string(),
        HandCategory::TwoPair => "Two pair".to_string(),
        HandCategory::ThreeOfAKind => "Three of a kind".to_string(),
        HandCategory::Straight => "Straight".to_string(),
        HandCategory::Flush => "Flush".to_string(),
        HandCategory::FullHouse => "Full house".to_string(),
        HandCategory::FourOfAKind => "Four of a kind".to_string(),
        HandCategory::StraightFlush => "Straight flush".to_string(),
        HandCategory::RoyalFlush => "Royal flush".to_string(),
    }
}
