//! In-memory `CoursesApi` used across the client_core tests.

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use shared::domain::{Category, Course, CourseChanges, CourseId};
use tokio::sync::{oneshot, Mutex, Notify};

use crate::{api::CoursesApi, error::NetworkError};

pub fn course(id: &str, category: Category, seq_no: i64) -> Course {
    Course {
        id: CourseId::new(id),
        description: format!("Course {id}"),
        category,
        long_description: format!("Long description of course {id}"),
        released_at: Some(
            chrono::DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
                .expect("timestamp")
                .with_timezone(&chrono::Utc),
        ),
        seq_no,
    }
}

pub fn sample_courses() -> Vec<Course> {
    vec![
        course("1", Category::Beginner, 3),
        course("2", Category::Advanced, 2),
        course("3", Category::Beginner, 1),
        course("4", Category::Advanced, 1),
        course("5", Category::Beginner, 2),
    ]
}

#[derive(Default)]
pub struct FakeCoursesApi {
    courses: Mutex<Vec<Course>>,
    load_responses: Mutex<VecDeque<Result<Vec<Course>, NetworkError>>>,
    load_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    save_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    save_failure: Mutex<Option<NetworkError>>,
    saved: Mutex<Vec<(CourseId, CourseChanges)>>,
    load_calls: AtomicUsize,
    save_calls: AtomicUsize,
    pub load_started: Notify,
    pub save_started: Notify,
}

impl FakeCoursesApi {
    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            courses: Mutex::new(courses),
            ..Self::default()
        }
    }

    /// Queues the response for the next load; unqueued loads return the
    /// current course list.
    pub async fn push_load_response(&self, response: Result<Vec<Course>, NetworkError>) {
        self.load_responses.lock().await.push_back(response);
    }

    /// Holds the next load until the returned sender fires or is dropped.
    pub async fn hold_next_load(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.load_gates.lock().await.push_back(rx);
        tx
    }

    /// Holds the next save until the returned sender fires or is dropped.
    pub async fn hold_next_save(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.save_gates.lock().await.push_back(rx);
        tx
    }

    pub async fn fail_saves_with(&self, err: NetworkError) {
        *self.save_failure.lock().await = Some(err);
    }

    pub async fn clear_save_failure(&self) {
        *self.save_failure.lock().await = None;
    }

    pub async fn saved(&self) -> Vec<(CourseId, CourseChanges)> {
        self.saved.lock().await.clone()
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CoursesApi for FakeCoursesApi {
    async fn load_all(&self) -> Result<Vec<Course>, NetworkError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.load_gates.lock().await.pop_front();
        let response = self.load_responses.lock().await.pop_front();
        self.load_started.notify_one();

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match response {
            Some(response) => response,
            None => Ok(self.courses.lock().await.clone()),
        }
    }

    async fn save(&self, id: &CourseId, changes: &CourseChanges) -> Result<Course, NetworkError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.save_gates.lock().await.pop_front();
        self.save_started.notify_one();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if let Some(err) = self.save_failure.lock().await.clone() {
            return Err(err);
        }

        self.saved.lock().await.push((id.clone(), changes.clone()));

        let mut courses = self.courses.lock().await;
        let course = courses
            .iter_mut()
            .find(|course| &course.id == id)
            .ok_or_else(|| NetworkError::http(404, format!("course {id} not found")))?;
        changes.apply_to(course);
        Ok(course.clone())
    }
}
