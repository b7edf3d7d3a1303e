use serde::{Deserialize, Serialize};

use crate::domain::{Course, CourseId};

pub const COURSES_ROUTE: &str = "/api/courses";

pub fn course_route(id: &CourseId) -> String {
    format!("{COURSES_ROUTE}/{id}")
}

/// Envelope the backend wraps list responses in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload<T> {
    pub payload: T,
}

pub type CourseListResponse = Payload<Vec<Course>>;
