use std::sync::Arc;

use shared::domain::{sort_courses_by_seq_no, Category, Course};
use tokio_stream::Stream;
use tracing::{error, info, warn};

use crate::{
    dialog::{CourseDialog, DialogOutcome},
    error::NetworkError,
    loading::LoadingIndicator,
    store::{CoursesStore, LoadTicket},
    CatalogContext, LOAD_COURSES_ERROR,
};

/// Top-level catalog screen: loads courses into the store, exposes the
/// per-category lists, and opens the edit dialog.
#[derive(Clone)]
pub struct HomeView {
    ctx: CatalogContext,
}

impl HomeView {
    pub fn new(ctx: CatalogContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CatalogContext {
        &self.ctx
    }

    pub async fn init(&self) -> Result<Arc<Vec<Course>>, NetworkError> {
        self.reload_courses().await
    }

    /// Loads the catalog, sorted by `seq_no`, and publishes it to the store.
    ///
    /// The loading flag stays on while this or any other reload is still
    /// outstanding. A failure is reported to the messages banner, published to
    /// the store, and returned. A reload whose result arrives after a newer
    /// one has published touches neither the store nor the banner.
    pub async fn reload_courses(&self) -> Result<Arc<Vec<Course>>, NetworkError> {
        let ticket = self.ctx.store.begin_load();
        self.ctx.loading.on();
        let _finally = ReloadGuard {
            loading: &self.ctx.loading,
            store: &self.ctx.store,
            ticket,
        };

        let result = self.ctx.service.load_all().await.map(|courses| {
            let mut sorted = courses.as_ref().clone();
            sort_courses_by_seq_no(&mut sorted);
            Arc::new(sorted)
        });

        if !self.ctx.store.complete(ticket, result.clone()) {
            warn!(
                generation = ticket.generation(),
                "home: discarded result of superseded reload"
            );
            return result;
        }

        match &result {
            Ok(courses) => info!(count = courses.len(), "home: courses reloaded"),
            Err(err) => {
                error!("{LOAD_COURSES_ERROR}: {err}");
                self.ctx.messages.report_error(LOAD_COURSES_ERROR);
            }
        }
        result
    }

    pub fn courses_by_category(
        &self,
        category: Category,
    ) -> impl Stream<Item = Result<Vec<Course>, NetworkError>> + Send + Unpin + 'static {
        self.ctx.store.by_category(category)
    }

    pub fn beginner_courses(
        &self,
    ) -> impl Stream<Item = Result<Vec<Course>, NetworkError>> + Send + Unpin + 'static {
        self.courses_by_category(Category::Beginner)
    }

    pub fn advanced_courses(
        &self,
    ) -> impl Stream<Item = Result<Vec<Course>, NetworkError>> + Send + Unpin + 'static {
        self.courses_by_category(Category::Advanced)
    }

    pub fn edit_course(&self, course: Course) -> CourseDialog {
        CourseDialog::open(
            course,
            self.ctx.service.clone(),
            self.ctx.messages.clone(),
        )
    }

    /// Reloads after a save; a cancelled dialog changes nothing.
    pub async fn handle_dialog_outcome(
        &self,
        outcome: &DialogOutcome,
    ) -> Result<Option<Arc<Vec<Course>>>, NetworkError> {
        match outcome {
            DialogOutcome::Saved(course) => {
                info!(course = %course.id, "home: course edited, reloading");
                self.reload_courses().await.map(Some)
            }
            DialogOutcome::Cancelled => Ok(None),
        }
    }
}

/// Hands the ticket back when a reload settles or is dropped, and switches the
/// loading flag off once no reload is outstanding.
struct ReloadGuard<'a> {
    loading: &'a LoadingIndicator,
    store: &'a CoursesStore,
    ticket: LoadTicket,
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        if self.store.finish_load(self.ticket) {
            self.loading.off();
        }
    }
}

#[cfg(test)]
#[path = "tests/home_tests.rs"]
mod tests;
