use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Grade level label, e.g. "10th Grade".
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub overall_grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub subject: String,
    pub assigned_to: Vec<String>,
    pub created_by: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub student_id: String,
    pub task_id: String,
    pub grade: f64,
    pub feedback: String,
    pub graded_by: String,
    pub graded_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    pub sent_at: String,
    pub read: bool,
}

// Insert payloads: the record minus the fields the store assigns.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub grade: String,
    #[serde(default)]
    pub parent_email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub overall_grade: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub subject: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub student_id: String,
    pub task_id: String,
    pub grade: f64,
    #[serde(default)]
    pub feedback: String,
    pub graded_by: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub student_id: Option<String>,
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn today_stamp() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Current UTC instant, millisecond precision, `Z` suffix.
pub fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn student_uses_camel_case_and_omits_missing_optionals() {
        let s = Student {
            id: "9".into(),
            name: "Dan".into(),
            email: "dan@x.com".into(),
            grade: "10th".into(),
            parent_email: None,
            avatar: None,
            overall_grade: 0.0,
        };
        let v = serde_json::to_value(&s).expect("serialize");
        assert_eq!(v["overallGrade"], json!(0.0));
        assert!(v.get("parentEmail").is_none());
        assert!(v.get("avatar").is_none());
    }

    #[test]
    fn role_is_lowercase_on_the_wire() {
        let r: Role = serde_json::from_value(json!("teacher")).expect("role");
        assert_eq!(r, Role::Teacher);
        assert_eq!(serde_json::to_value(Role::Student).unwrap(), json!("student"));
        assert!(serde_json::from_value::<Role>(json!("admin")).is_err());
    }

    #[test]
    fn stamps_have_expected_shape() {
        let d = today_stamp();
        assert_eq!(d.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").is_ok());
        let t = now_stamp();
        assert!(t.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&t).is_ok());
    }

    #[test]
    fn ids_are_distinct() {
        assert_ne!(new_id(), new_id());
    }
}
