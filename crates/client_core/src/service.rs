use std::sync::Arc;

use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use shared::domain::{Course, CourseChanges, CourseId};
use tracing::{error, info};

use crate::{api::CoursesApi, error::NetworkError};

/// A course list request shared by every clone of the handle.
///
/// The request is sent on first poll. Clones awaited while it is in flight
/// wait on the same response; clones awaited afterwards resolve immediately
/// with the cached result.
pub type CourseListLoad = Shared<BoxFuture<'static, Result<Arc<Vec<Course>>, NetworkError>>>;

/// A single course update, shared the same way as [`CourseListLoad`].
pub type CourseSave = Shared<BoxFuture<'static, Result<Course, NetworkError>>>;

#[derive(Clone)]
pub struct CoursesService {
    api: Arc<dyn CoursesApi>,
}

impl CoursesService {
    pub fn new(api: Arc<dyn CoursesApi>) -> Self {
        Self { api }
    }

    /// Starts a fresh load. Never retried; failures surface to every awaiter.
    pub fn load_all(&self) -> CourseListLoad {
        let api = Arc::clone(&self.api);
        async move {
            match api.load_all().await {
                Ok(courses) => {
                    info!(count = courses.len(), "courses: loaded");
                    Ok(Arc::new(courses))
                }
                Err(err) => {
                    error!("courses: load failed: {err}");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }

    pub fn save(&self, id: CourseId, changes: CourseChanges) -> CourseSave {
        let api = Arc::clone(&self.api);
        async move {
            match api.save(&id, &changes).await {
                Ok(course) => {
                    info!(course = %id, "courses: saved");
                    Ok(course)
                }
                Err(err) => {
                    error!(course = %id, "courses: save failed: {err}");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }
}
