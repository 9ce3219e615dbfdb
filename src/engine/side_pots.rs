use std::collections::BTreeSet;

use crate::domain::{Chips, PlayerId, SidePot, Table};

/// Разбить банк на сайд-поты по суммарным вкладам участников раздачи.
///
/// На вход идут ВСЕ вложившиеся участники, включая сфолдивших: их фишки
/// уже лежат в банке и обязаны попасть в уровни, иначе сумма потов
/// разойдётся с общим банком. Претендовать на пот могут только
/// не сфолдившие, чей вклад дотянулся до уровня пота.
///
/// Поты идут от младшего уровня к старшему.
pub fn compute_side_pots(table: &Table) -> Vec<SidePot> {
    let mut entries: Vec<(PlayerId, Chips, bool)> = table
        .players
        .values()
        .filter(|p| table.hand_participants.contains(&p.id))
        .filter(|p| !p.hand_cumulative_investment.is_zero())
        .map(|p| (p.id, p.hand_cumulative_investment, p.folded))
        .collect();

    if entries.is_empty() {
        return Vec::new();
    }

    // Уровни — различные значения вкладов по возрастанию.
    entries.sort_by_key(|&(_, invested, _)| invested);

    let mut pots = Vec::new();
    let mut prev_level = Chips::ZERO;

    for &(_, level, _) in entries.iter() {
        if level == prev_level {
            continue;
        }
        let slice = level - prev_level;

        // Долю в этот пот внесли все, чей вклад не меньше уровня.
        let contributors = entries.iter().filter(|&&(_, inv, _)| inv >= level).count();

        let eligible: BTreeSet<PlayerId> = entries
            .iter()
            .filter(|&&(_, inv, folded)| inv >= level && !folded)
            .map(|&(id, _, _)| id)
            .collect();

        pots.push(SidePot {
            amount: Chips(slice.0 * contributors as u64),
            eligible_players: eligible,
            investment_threshold: level,
        });

        prev_level = level;
    }

    pots
}
