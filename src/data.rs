use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::model::{
    new_id, now_stamp, today_stamp, Grade, Message, NewGrade, NewMessage, NewStudent, NewTask,
    Student, Task,
};
use crate::storage::{self, StateStorage};

pub const DATA_STORAGE_NAME: &str = "data-storage";

/// Immutable view of all four collections at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    pub students: Vec<Student>,
    pub tasks: Vec<Task>,
    pub grades: Vec<Grade>,
    pub messages: Vec<Message>,
}

impl DataSnapshot {
    pub fn seed() -> Self {
        let student = |id: &str, name: &str, email: &str, parent: &str, overall: f64| Student {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            grade: "10th Grade".into(),
            parent_email: Some(parent.into()),
            avatar: None,
            overall_grade: overall,
        };

        Self {
            students: vec![
                student("1", "Alice Johnson", "alice@example.com", "parent.alice@example.com", 88.0),
                student("2", "Bob Smith", "bob@example.com", "parent.bob@example.com", 92.0),
                student("3", "Carol Davis", "carol@example.com", "parent.carol@example.com", 85.0),
            ],
            tasks: vec![
                Task {
                    id: "1".into(),
                    title: "Math Assignment - Algebra".into(),
                    description: "Complete exercises 1-20 from chapter 5".into(),
                    due_date: "2024-07-20".into(),
                    subject: "Mathematics".into(),
                    assigned_to: vec!["1".into(), "2".into(), "3".into()],
                    created_by: "teacher1".into(),
                    created_at: "2024-07-12".into(),
                },
                Task {
                    id: "2".into(),
                    title: "Science Project - Solar System".into(),
                    description: "Create a presentation about planets".into(),
                    due_date: "2024-07-25".into(),
                    subject: "Science".into(),
                    assigned_to: vec!["1".into(), "2".into()],
                    created_by: "teacher1".into(),
                    created_at: "2024-07-10".into(),
                },
            ],
            grades: vec![Grade {
                id: "1".into(),
                student_id: "1".into(),
                task_id: "1".into(),
                grade: 85.0,
                feedback: "Good work! Pay attention to decimal places.".into(),
                graded_by: "teacher1".into(),
                graded_at: "2024-07-13".into(),
            }],
            messages: Vec::new(),
        }
    }
}

/// Append-only record store.
///
/// Every mutator builds a fresh snapshot and swaps it in, so an `Arc` handed
/// out by [`DataStore::snapshot`] never changes underneath its holder.
pub struct DataStore {
    snapshot: Arc<DataSnapshot>,
    storage: Rc<dyn StateStorage>,
}

impl DataStore {
    pub fn load(storage: Rc<dyn StateStorage>) -> Self {
        let snapshot = match storage::load_state::<DataSnapshot>(storage.as_ref(), DATA_STORAGE_NAME) {
            Ok(Some(s)) => s,
            Ok(None) => DataSnapshot::seed(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "ignoring persisted data, using seed");
                DataSnapshot::seed()
            }
        };
        Self {
            snapshot: Arc::new(snapshot),
            storage,
        }
    }

    pub fn snapshot(&self) -> Arc<DataSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn add_student(&mut self, fields: NewStudent) -> Student {
        let student = Student {
            id: new_id(),
            name: fields.name,
            email: fields.email,
            grade: fields.grade,
            parent_email: fields.parent_email,
            avatar: fields.avatar,
            overall_grade: fields.overall_grade.unwrap_or(0.0),
        };
        debug!(id = %student.id, "student added");
        let mut next = (*self.snapshot).clone();
        next.students.push(student.clone());
        self.commit(next);
        student
    }

    pub fn add_task(&mut self, fields: NewTask) -> Task {
        let task = Task {
            id: new_id(),
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            subject: fields.subject,
            assigned_to: fields.assigned_to,
            created_by: fields.created_by,
            created_at: today_stamp(),
        };
        debug!(id = %task.id, assignees = task.assigned_to.len(), "task added");
        let mut next = (*self.snapshot).clone();
        next.tasks.push(task.clone());
        self.commit(next);
        task
    }

    pub fn add_grade(&mut self, fields: NewGrade) -> Grade {
        let grade = Grade {
            id: new_id(),
            student_id: fields.student_id,
            task_id: fields.task_id,
            grade: fields.grade,
            feedback: fields.feedback,
            graded_by: fields.graded_by,
            graded_at: now_stamp(),
        };
        debug!(id = %grade.id, task_id = %grade.task_id, "grade added");
        let mut next = (*self.snapshot).clone();
        next.grades.push(grade.clone());
        self.commit(next);
        grade
    }

    pub fn send_message(&mut self, fields: NewMessage) -> Message {
        let message = Message {
            id: new_id(),
            from: fields.from,
            to: fields.to,
            subject: fields.subject,
            content: fields.content,
            student_id: fields.student_id,
            sent_at: now_stamp(),
            read: false,
        };
        debug!(id = %message.id, "message sent");
        let mut next = (*self.snapshot).clone();
        next.messages.push(message.clone());
        self.commit(next);
        message
    }

    /// Returns whether a message with `id` exists. Unknown ids leave the
    /// store (and storage) untouched.
    pub fn mark_message_as_read(&mut self, id: &str) -> bool {
        let Some(pos) = self.snapshot.messages.iter().position(|m| m.id == id) else {
            return false;
        };
        if self.snapshot.messages[pos].read {
            return true;
        }
        let mut next = (*self.snapshot).clone();
        next.messages[pos].read = true;
        self.commit(next);
        true
    }

    fn commit(&mut self, next: DataSnapshot) {
        self.snapshot = Arc::new(next);
        if let Err(e) = storage::save_state(self.storage.as_ref(), DATA_STORAGE_NAME, &*self.snapshot) {
            warn!(error = %format!("{e:#}"), "failed to persist data");
        }
    }
}
