pub mod auth;
pub mod core;
pub mod dashboard;
pub mod grades;
pub mod messages;
pub mod students;
pub mod tasks;
