//! Presentation aggregates computed from a [`DataSnapshot`] on demand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::DataSnapshot;
use crate::model::{Grade, Message, Student, Task};

const RECENT_LIMIT: usize = 3;
pub const UNKNOWN_TASK_TITLE: &str = "Unknown Task";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeBand {
    High,
    Mid,
    Low,
}

pub fn grade_band(value: f64) -> GradeBand {
    if value >= 90.0 {
        GradeBand::High
    } else if value >= 80.0 {
        GradeBand::Mid
    } else {
        GradeBand::Low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Overdue,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDashboard {
    pub student_count: usize,
    pub active_task_count: usize,
    pub graded_count: usize,
    pub unread_message_count: usize,
    pub recent_students: Vec<Student>,
    pub recent_tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeWithTask {
    #[serde(flatten)]
    pub grade: Grade,
    pub task_title: String,
    pub band: GradeBand,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub student_id: String,
    pub task_count: usize,
    pub grade_count: usize,
    /// Rounded mean of the student's grades; `None` when ungraded.
    pub average_grade: Option<i64>,
    pub upcoming_count: usize,
    pub recent_tasks: Vec<Task>,
    pub recent_grades: Vec<GradeWithTask>,
}

pub fn teacher_dashboard(data: &DataSnapshot) -> TeacherDashboard {
    TeacherDashboard {
        student_count: data.students.len(),
        active_task_count: data.tasks.len(),
        graded_count: data.grades.len(),
        unread_message_count: data.messages.iter().filter(|m| !m.read).count(),
        recent_students: data.students.iter().take(RECENT_LIMIT).cloned().collect(),
        recent_tasks: data.tasks.iter().take(RECENT_LIMIT).cloned().collect(),
    }
}

pub fn student_dashboard(data: &DataSnapshot, student_id: &str, today: NaiveDate) -> StudentDashboard {
    let my_tasks: Vec<&Task> = data
        .tasks
        .iter()
        .filter(|t| t.assigned_to.iter().any(|s| s == student_id))
        .collect();
    let my_grades: Vec<&Grade> = data
        .grades
        .iter()
        .filter(|g| g.student_id == student_id)
        .collect();

    let average_grade = if my_grades.is_empty() {
        None
    } else {
        let sum: f64 = my_grades.iter().map(|g| g.grade).sum();
        Some((sum / my_grades.len() as f64).round() as i64)
    };

    // Unparseable due dates never count as upcoming.
    let upcoming_count = my_tasks
        .iter()
        .filter(|t| parse_date(&t.due_date).is_some_and(|d| d > today))
        .count();

    let recent_grades = my_grades
        .iter()
        .take(RECENT_LIMIT)
        .map(|g| GradeWithTask {
            task_title: data
                .tasks
                .iter()
                .find(|t| t.id == g.task_id)
                .map(|t| t.title.clone())
                .unwrap_or_else(|| UNKNOWN_TASK_TITLE.to_string()),
            band: grade_band(g.grade),
            grade: (*g).clone(),
        })
        .collect();

    StudentDashboard {
        student_id: student_id.to_string(),
        task_count: my_tasks.len(),
        grade_count: my_grades.len(),
        average_grade,
        upcoming_count,
        recent_tasks: my_tasks.iter().take(RECENT_LIMIT).map(|t| (*t).clone()).collect(),
        recent_grades,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Accept both plain dates and full timestamps.
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// The term is matched as given; surrounding whitespace is significant.
pub fn search_students<'a>(data: &'a DataSnapshot, term: &str) -> Vec<&'a Student> {
    let needle = term.to_lowercase();
    data.students
        .iter()
        .filter(|s| needle.is_empty() || contains_ci(&s.name, &needle) || contains_ci(&s.email, &needle))
        .collect()
}

pub fn task_status(data: &DataSnapshot, task: &Task, student_id: &str, today: NaiveDate) -> TaskStatus {
    let graded = data
        .grades
        .iter()
        .any(|g| g.task_id == task.id && g.student_id == student_id);
    if graded {
        return TaskStatus::Completed;
    }
    match parse_date(&task.due_date) {
        Some(due) if due < today => TaskStatus::Overdue,
        _ => TaskStatus::Pending,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Only meaningful together with `assigned_to`.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.and_then(|s| if s.trim().is_empty() { None } else { Some(s) })
}

impl TaskFilter {
    /// Blank string fields count as absent, matching the other list filters.
    pub fn normalized(self) -> Self {
        Self {
            assigned_to: blank_to_none(self.assigned_to).map(|s| s.trim().to_string()),
            subject: blank_to_none(self.subject).map(|s| s.trim().to_string()),
            search: blank_to_none(self.search),
            status: self.status,
        }
    }
}

pub fn filter_tasks<'a>(data: &'a DataSnapshot, filter: &TaskFilter, today: NaiveDate) -> Vec<&'a Task> {
    let needle = filter
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    data.tasks
        .iter()
        .filter(|t| match &filter.assigned_to {
            Some(sid) => t.assigned_to.iter().any(|s| s == sid),
            None => true,
        })
        .filter(|t| match &filter.subject {
            Some(subject) => t.subject.eq_ignore_ascii_case(subject),
            None => true,
        })
        .filter(|t| needle.is_empty() || contains_ci(&t.title, &needle) || contains_ci(&t.subject, &needle))
        .filter(|t| match (&filter.status, &filter.assigned_to) {
            (Some(status), Some(sid)) => task_status(data, t, sid, today) == *status,
            _ => true,
        })
        .collect()
}

pub fn filter_grades<'a>(
    data: &'a DataSnapshot,
    student_id: Option<&str>,
    task_id: Option<&str>,
) -> Vec<&'a Grade> {
    data.grades
        .iter()
        .filter(|g| student_id.map_or(true, |s| g.student_id == s))
        .filter(|g| task_id.map_or(true, |t| g.task_id == t))
        .collect()
}

pub fn inbox<'a>(data: &'a DataSnapshot, recipient: Option<&str>, unread_only: bool) -> Vec<&'a Message> {
    data.messages
        .iter()
        .filter(|m| recipient.map_or(true, |r| m.to == r))
        .filter(|m| !unread_only || !m.read)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn teacher_dashboard_counts_seed() {
        let mut data = DataSnapshot::seed();
        data.messages.push(Message {
            id: "m1".into(),
            from: "a".into(),
            to: "b".into(),
            subject: "s".into(),
            content: "c".into(),
            student_id: None,
            sent_at: "2024-07-14T00:00:00.000Z".into(),
            read: false,
        });
        let mut read = data.messages[0].clone();
        read.id = "m2".into();
        read.read = true;
        data.messages.push(read);

        let d = teacher_dashboard(&data);
        assert_eq!(d.student_count, 3);
        assert_eq!(d.active_task_count, 2);
        assert_eq!(d.graded_count, 1);
        assert_eq!(d.unread_message_count, 1);
        assert_eq!(d.recent_students.len(), 3);
        assert_eq!(d.recent_tasks.len(), 2);
    }

    #[test]
    fn student_dashboard_for_seeded_alice() {
        let data = DataSnapshot::seed();
        let d = student_dashboard(&data, "1", day("2024-07-21"));
        assert_eq!(d.task_count, 2);
        assert_eq!(d.grade_count, 1);
        assert_eq!(d.average_grade, Some(85));
        // Only the science project is still ahead.
        assert_eq!(d.upcoming_count, 1);
        assert_eq!(d.recent_grades[0].task_title, "Math Assignment - Algebra");
        assert_eq!(d.recent_grades[0].band, GradeBand::Mid);
    }

    #[test]
    fn student_dashboard_without_grades_has_no_average() {
        let data = DataSnapshot::seed();
        let d = student_dashboard(&data, "3", day("2024-07-01"));
        assert_eq!(d.task_count, 1);
        assert_eq!(d.average_grade, None);
        assert_eq!(d.upcoming_count, 1);
    }

    #[test]
    fn average_rounds_to_nearest() {
        let mut data = DataSnapshot::seed();
        let mut extra = data.grades[0].clone();
        extra.id = "2".into();
        extra.grade = 90.0;
        data.grades.push(extra);
        // (85 + 90) / 2 = 87.5
        assert_eq!(student_dashboard(&data, "1", day("2024-01-01")).average_grade, Some(88));
    }

    #[test]
    fn missing_task_title_is_reported_as_unknown() {
        let mut data = DataSnapshot::seed();
        data.grades[0].task_id = "gone".into();
        let d = student_dashboard(&data, "1", day("2024-01-01"));
        assert_eq!(d.recent_grades[0].task_title, UNKNOWN_TASK_TITLE);
    }

    #[test]
    fn search_matches_name_or_email_case_insensitive() {
        let data = DataSnapshot::seed();
        let hits: Vec<_> = search_students(&data, "ALICE").iter().map(|s| s.id.clone()).collect();
        assert_eq!(hits, vec!["1"]);
        assert_eq!(search_students(&data, "bob@").len(), 1);
        assert_eq!(search_students(&data, "").len(), 3);
        assert!(search_students(&data, "zed").is_empty());
    }

    #[test]
    fn search_term_is_not_trimmed() {
        let data = DataSnapshot::seed();
        assert!(search_students(&data, "Alice ").is_empty());
        assert_eq!(search_students(&data, "Alice J").len(), 1);
    }

    #[test]
    fn blank_task_filter_fields_are_ignored() {
        let data = DataSnapshot::seed();
        let filter = TaskFilter {
            assigned_to: Some("".into()),
            subject: Some("  ".into()),
            search: Some(" ".into()),
            status: None,
        }
        .normalized();
        assert!(filter.assigned_to.is_none());
        assert!(filter.subject.is_none());
        assert!(filter.search.is_none());
        assert_eq!(filter_tasks(&data, &filter, day("2024-07-01")).len(), 2);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(grade_band(90.0), GradeBand::High);
        assert_eq!(grade_band(89.9), GradeBand::Mid);
        assert_eq!(grade_band(80.0), GradeBand::Mid);
        assert_eq!(grade_band(79.0), GradeBand::Low);
    }

    #[test]
    fn task_filters_compose() {
        let data = DataSnapshot::seed();
        let today = day("2024-07-22");

        let only_carol = TaskFilter {
            assigned_to: Some("3".into()),
            ..Default::default()
        };
        assert_eq!(filter_tasks(&data, &only_carol, today).len(), 1);

        let science = TaskFilter {
            search: Some("solar".into()),
            ..Default::default()
        };
        assert_eq!(filter_tasks(&data, &science, today)[0].id, "2");

        let math_subject = TaskFilter {
            subject: Some("mathematics".into()),
            ..Default::default()
        };
        assert_eq!(filter_tasks(&data, &math_subject, today).len(), 1);

        let alice_done = TaskFilter {
            assigned_to: Some("1".into()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let done = filter_tasks(&data, &alice_done, today);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "1");
    }

    #[test]
    fn task_status_by_grade_and_due_date() {
        let data = DataSnapshot::seed();
        let math = &data.tasks[0];
        let science = &data.tasks[1];
        assert_eq!(task_status(&data, math, "1", day("2024-08-01")), TaskStatus::Completed);
        assert_eq!(task_status(&data, math, "2", day("2024-08-01")), TaskStatus::Overdue);
        assert_eq!(task_status(&data, science, "2", day("2024-07-25")), TaskStatus::Pending);
    }

    #[test]
    fn grade_and_message_filters() {
        let data = DataSnapshot::seed();
        assert_eq!(filter_grades(&data, Some("1"), None).len(), 1);
        assert_eq!(filter_grades(&data, Some("2"), None).len(), 0);
        assert_eq!(filter_grades(&data, None, Some("1")).len(), 1);
        assert!(inbox(&data, Some("x"), false).is_empty());
    }
}
