use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TasksFilterType {
    #[default]
    All,
    Active,
    Completed,
}

impl TasksFilterType {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TasksFilterType::All => true,
            TasksFilterType::Active => task.is_active(),
            TasksFilterType::Completed => task.is_completed,
        }
    }

    pub fn apply(self, tasks: Vec<Task>) -> Vec<Task> {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}

impl FromStr for TasksFilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TasksFilterType::All),
            "active" => Ok(TasksFilterType::Active),
            "completed" => Ok(TasksFilterType::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Task> {
        vec![Task::new("T1", "D1"), Task::new("T2", "D2").completed(), Task::new("T3", "D3")]
    }

    #[test]
    fn filters_keep_order() {
        let tasks = sample();
        let active = TasksFilterType::Active.apply(tasks.clone());
        assert_eq!(active.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), ["T1", "T3"]);
        let completed = TasksFilterType::Completed.apply(tasks.clone());
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "T2");
        assert_eq!(TasksFilterType::All.apply(tasks.clone()), tasks);
    }

    #[test]
    fn parses_query_values() {
        assert_eq!("active".parse::<TasksFilterType>(), Ok(TasksFilterType::Active));
        assert!("done".parse::<TasksFilterType>().is_err());
    }
}
