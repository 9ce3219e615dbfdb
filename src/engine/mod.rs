//! Движок раздачи: торговля, позиции, сайд-поты и жизненный цикл стола.

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod positions;
pub mod side_pots;
pub mod validation;

pub use actions::PlayerActionKind;
pub use errors::EngineError;
pub use game_loop::{
    add_chips, all_funded_ready, apply_action, confirm_result, evict_unready, join_table,
    mark_ready, settle_after_reveal, start_hand, take_seat, unmark_ready,
};
pub use side_pots::compute_side_pots;

/// Источник случайности для перемешивания колоды.
///
/// Движок не выбирает генератор сам: в тестах подставляется
/// детерминированная заглушка, в рантайме — системный RNG.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
