use serde::Serialize;

use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsResult {
    pub active_percent: f32,
    pub completed_percent: f32,
}

/// Percentages of active and completed tasks. An absent or empty list
/// yields zero for both.
pub fn active_and_completed_stats(tasks: Option<&[Task]>) -> StatsResult {
    match tasks {
        Some(tasks) if !tasks.is_empty() => {
            let total = tasks.len() as f32;
            let active = tasks.iter().filter(|t| t.is_active()).count() as f32;
            StatsResult {
                active_percent: 100.0 * active / total,
                completed_percent: 100.0 * (total - active) / total,
            }
        }
        _ => StatsResult { active_percent: 0.0, completed_percent: 0.0 },
    }
}
