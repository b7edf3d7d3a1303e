//! Course catalog client: REST access to the courses backend plus the
//! observable state (loading flag, error banner, course store) a catalog
//! screen renders from.

use std::{sync::Arc, time::Duration};

use url::Url;

pub mod api;
pub mod dialog;
pub mod error;
pub mod home;
pub mod loading;
pub mod messages;
pub mod service;
pub mod store;

pub use api::{CoursesApi, HttpCoursesApi};
pub use dialog::{CourseDialog, CourseForm, DialogOutcome, DialogState, FormField};
pub use error::{DialogError, NetworkError};
pub use home::HomeView;
pub use loading::LoadingIndicator;
pub use messages::MessagesNotifier;
pub use service::{CourseListLoad, CourseSave, CoursesService};
pub use store::{Collection, CollectionSnapshot, CoursesStore, LoadTicket};

pub const LOAD_COURSES_ERROR: &str = "Could not load courses";
pub const SAVE_COURSE_ERROR: &str = "Could not save course";

/// Shared state handed to every screen and dialog. Cloning shares the same
/// underlying flag, banner and store.
#[derive(Clone)]
pub struct CatalogContext {
    pub service: CoursesService,
    pub loading: LoadingIndicator,
    pub messages: MessagesNotifier,
    pub store: CoursesStore,
}

impl CatalogContext {
    pub fn new(api: Arc<dyn CoursesApi>) -> Self {
        Self {
            service: CoursesService::new(api),
            loading: LoadingIndicator::new(),
            messages: MessagesNotifier::new(),
            store: CoursesStore::new(),
        }
    }

    pub fn http(base_url: Url, timeout: Option<Duration>) -> Result<Self, NetworkError> {
        let api = HttpCoursesApi::with_timeout(base_url, timeout)?;
        Ok(Self::new(Arc::new(api)))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
