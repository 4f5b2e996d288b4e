use serde::{Deserialize, Serialize};

/// A titled group of tasks, embedded in its owning user.
///
/// `id` is assigned by the client and is not checked for uniqueness here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
}

impl Section {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Next free task id within this section (max + 1, starting at 1)
    pub fn next_task_id(&self) -> i64 {
        self.tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
    }

    pub fn task_mut(&mut self, task_id: i64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    /// Append a task and return its id
    pub fn push_task(&mut self, text: impl Into<String>) -> i64 {
        let id = self.next_task_id();
        self.tasks.push(Task::new(id, text));
        id
    }

    /// Remove the first task with `task_id`; returns whether one was removed
    pub fn remove_task(&mut self, task_id: i64) -> bool {
        match self.tasks.iter().position(|t| t.id == task_id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }
}

impl Task {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            notes: String::new(),
        }
    }
}

/// Next free section id across a plan (max + 1, starting at 1)
pub fn next_section_id(sections: &[Section]) -> i64 {
    sections.iter().map(|s| s.id).max().map_or(1, |max| max + 1)
}
