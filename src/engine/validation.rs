use crate::domain::{Player, Table};
use crate::engine::actions::PlayerActionKind;
use crate::engine::errors::EngineError;

/// Экономическая проверка действия: суммы, планки рейза, стек.
/// Фазу стола, очерёдность и участие в раздаче проверяет game_loop
/// ДО вызова, здесь их уже считаем выполненными.
pub fn validate_action(
    table: &Table,
    player: &Player,
    kind: &PlayerActionKind,
) -> Result<(), EngineError> {
    let max_bet = table.max_round_bet();

    match kind {
        PlayerActionKind::Fold => Ok(()),

        PlayerActionKind::Check => {
            if player.current_round_bet == max_bet {
                Ok(())
            } else {
                Err(EngineError::IllegalAction)
            }
        }

        // Колл легален всегда: при нуле к доплате он эквивалентен чеку,
        // при нехватке стека превращается в олл-ин-колл.
        PlayerActionKind::Call => Ok(()),

        PlayerActionKind::Raise(to) => {
            if *to <= max_bet {
                return Err(EngineError::IllegalAction);
            }

            // Сколько реально придётся доложить до целевой суммы.
            let needed = *to - player.current_round_bet;
            if needed > player.chip_stack {
                return Err(EngineError::InsufficientChips);
            }

            let increment = *to - max_bet;
            let is_all_in = needed == player.chip_stack;
            if increment < table.min_raise_increment && !is_all_in {
                return Err(EngineError::BelowMinimumRaise);
            }

            Ok(())
        }

        PlayerActionKind::AllIn => {
            if player.chip_stack.is_zero() {
                return Err(EngineError::IllegalAction);
            }
            Ok(())
        }
    }
}
