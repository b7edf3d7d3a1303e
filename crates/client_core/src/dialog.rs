use chrono::{DateTime, Utc};
use shared::domain::{Category, Course, CourseChanges};
use tracing::{error, info, warn};

use crate::{
    error::{DialogError, NetworkError},
    loading::LoadingIndicator,
    messages::MessagesNotifier,
    service::CoursesService,
    SAVE_COURSE_ERROR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Category,
    ReleasedAt,
    LongDescription,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Description => "description",
            FormField::Category => "category",
            FormField::ReleasedAt => "release date",
            FormField::LongDescription => "long description",
        }
    }
}

/// Editable copy of a course. All four fields are required; blank text
/// counts as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseForm {
    pub description: String,
    pub category: Option<Category>,
    pub released_at: Option<DateTime<Utc>>,
    pub long_description: String,
}

impl CourseForm {
    pub fn from_course(course: &Course) -> Self {
        Self {
            description: course.description.clone(),
            category: Some(course.category),
            released_at: course.released_at,
            long_description: course.long_description.clone(),
        }
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.description.trim().is_empty() {
            missing.push(FormField::Description);
        }
        if self.category.is_none() {
            missing.push(FormField::Category);
        }
        if self.released_at.is_none() {
            missing.push(FormField::ReleasedAt);
        }
        if self.long_description.trim().is_empty() {
            missing.push(FormField::LongDescription);
        }
        missing
    }

    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Every form value, ready to send.
    pub fn to_changes(&self) -> Result<CourseChanges, DialogError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(DialogError::Invalid(missing));
        }
        Ok(CourseChanges {
            description: Some(self.description.clone()),
            category: self.category,
            long_description: Some(self.long_description.clone()),
            released_at: self.released_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Saved(Course),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    /// Form is editable. `last_error` holds the failure of the previous save.
    Editing { last_error: Option<NetworkError> },
    Saving,
    Closed(DialogOutcome),
}

impl DialogState {
    fn name(&self) -> &'static str {
        match self {
            DialogState::Editing { .. } => "editing",
            DialogState::Saving => "saving",
            DialogState::Closed(_) => "closed",
        }
    }
}

/// Modal editor for a single course.
pub struct CourseDialog {
    course: Course,
    form: CourseForm,
    state: DialogState,
    service: CoursesService,
    messages: MessagesNotifier,
    loading: LoadingIndicator,
}

impl CourseDialog {
    pub fn open(course: Course, service: CoursesService, messages: MessagesNotifier) -> Self {
        let form = CourseForm::from_course(&course);
        Self {
            course,
            form,
            state: DialogState::Editing { last_error: None },
            service,
            messages,
            loading: LoadingIndicator::new(),
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn form(&self) -> &CourseForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> Result<&mut CourseForm, DialogError> {
        self.ensure_editing("edit")?;
        Ok(&mut self.form)
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DialogState::Closed(_))
    }

    pub fn outcome(&self) -> Option<&DialogOutcome> {
        match &self.state {
            DialogState::Closed(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// On while a save is in flight. Scoped to this dialog.
    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Sends the form to the backend.
    ///
    /// An invalid form is rejected without a request. On failure the error is
    /// reported, the dialog goes back to editing with the entered values, and
    /// the error is returned. Dropping the future mid-request also returns the
    /// dialog to editing.
    pub async fn save(&mut self) -> Result<Course, DialogError> {
        self.ensure_editing("save")?;
        let changes = self.form.to_changes()?;

        let id = self.course.id.clone();
        let mut saving = SavingGuard::enter(&mut self.state);
        let result = self
            .loading
            .show_until_completed(self.service.save(id.clone(), changes))
            .await;

        match result {
            Ok(saved) => {
                info!(course = %id, "dialog: closed with saved course");
                saving.settle(DialogState::Closed(DialogOutcome::Saved(saved.clone())));
                Ok(saved)
            }
            Err(err) => {
                error!(course = %id, "{SAVE_COURSE_ERROR}: {err}");
                self.messages.report_error(SAVE_COURSE_ERROR);
                saving.settle(DialogState::Editing {
                    last_error: Some(err.clone()),
                });
                Err(DialogError::Save { id, source: err })
            }
        }
    }

    /// Closes without saving.
    pub fn close(&mut self) -> Result<DialogOutcome, DialogError> {
        self.ensure_editing("close")?;
        self.state = DialogState::Closed(DialogOutcome::Cancelled);
        Ok(DialogOutcome::Cancelled)
    }

    fn ensure_editing(&self, action: &'static str) -> Result<(), DialogError> {
        match self.state {
            DialogState::Editing { .. } => Ok(()),
            _ => Err(DialogError::WrongState {
                action,
                state: self.state.name(),
            }),
        }
    }
}

/// Holds the dialog in `Saving` until settled; if the save is dropped first,
/// the dialog goes back to editing with no error.
struct SavingGuard<'a> {
    state: &'a mut DialogState,
}

impl<'a> SavingGuard<'a> {
    fn enter(state: &'a mut DialogState) -> Self {
        *state = DialogState::Saving;
        Self { state }
    }

    fn settle(&mut self, next: DialogState) {
        *self.state = next;
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        if matches!(*self.state, DialogState::Saving) {
            warn!("dialog: save abandoned, back to editing");
            *self.state = DialogState::Editing { last_error: None };
        }
    }
}

#[cfg(test)]
#[path = "tests/dialog_tests.rs"]
mod tests;
