use anyhow::Result;
use chrono::Utc;

use crate::models::{KanbanTask, TaskStatus};
use crate::store::{JsonStore, TASKS_KEY};

/// Owns the kanban task collection. Same write-through discipline as the
/// job repository, under its own storage key, with no seed data (an empty
/// board is a valid first run).
pub struct KanbanStore {
    store: JsonStore,
    tasks: Vec<KanbanTask>,
    seq: u64,
}

impl KanbanStore {
    pub fn load(store: JsonStore) -> Self {
        let tasks = store.load(TASKS_KEY).unwrap_or_default();
        Self {
            store,
            tasks,
            seq: 0,
        }
    }

    pub fn tasks(&self) -> &[KanbanTask] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&KanbanTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in one column, in insertion order.
    pub fn column(&self, status: TaskStatus) -> Vec<&KanbanTask> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Creates a task in the "todo" column. Blank text is rejected here as
    /// well as at the UI, so a careless caller cannot persist an empty card.
    pub fn add_task(&mut self, text: &str) -> Result<Option<&KanbanTask>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.seq += 1;
        let task = KanbanTask {
            id: format!("task-{}-{}", Utc::now().timestamp_millis(), self.seq),
            text: text.to_string(),
            status: TaskStatus::Todo,
        };
        self.tasks.push(task);
        self.store.save(TASKS_KEY, &self.tasks)?;
        Ok(self.tasks.last())
    }

    /// Sets the matching task's status. Unknown ids and self-transitions
    /// are no-ops; all six cross-column transitions are allowed.
    pub fn move_task(&mut self, id: &str, to: TaskStatus) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if task.status == to {
            return Ok(false);
        }
        task.status = to;
        self.store.save(TASKS_KEY, &self.tasks)?;
        Ok(true)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.store.save(TASKS_KEY, &self.tasks)?;
        Ok(true)
    }
}
