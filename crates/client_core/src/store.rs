use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc,
};

use shared::domain::{sort_courses_by_seq_no, Category, Course};
use tokio::sync::watch;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};

use crate::error::NetworkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    /// Nothing has finished loading yet.
    Pending,
    Loaded(Arc<Vec<Course>>),
    Failed(NetworkError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSnapshot {
    /// Generation of the load that produced `collection`; 0 before any.
    pub generation: u64,
    pub collection: Collection,
}

/// Proof that a load was started. A ticket may publish into the store until a
/// newer ticket has published, and must be handed back through
/// [`CoursesStore::finish_load`] once the load settles or is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// In-memory holder of the current course collection and its derived views.
///
/// The store never talks to the network; whoever loads courses feeds it.
#[derive(Clone)]
pub struct CoursesStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    issued: AtomicU64,
    in_flight: AtomicUsize,
    state: watch::Sender<CollectionSnapshot>,
}

impl Default for CoursesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CoursesStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CollectionSnapshot {
            generation: 0,
            collection: Collection::Pending,
        });
        Self {
            inner: Arc::new(StoreInner {
                issued: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                state,
            }),
        }
    }

    /// Starts a new load. Its result outranks every earlier ticket's.
    pub fn begin_load(&self) -> LoadTicket {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let generation = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket { generation }
    }

    /// Hands `ticket` back, whether or not its load published anything.
    /// Returns `true` when no other load is still outstanding.
    pub fn finish_load(&self, ticket: LoadTicket) -> bool {
        let previous = self
            .inner
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .unwrap_or(0);
        debug_assert!(previous > 0, "ticket {} finished twice", ticket.generation);
        previous <= 1
    }

    pub fn loads_in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Whether a load started after `ticket` has already published.
    pub fn is_superseded(&self, ticket: LoadTicket) -> bool {
        self.inner.state.borrow().generation > ticket.generation
    }

    /// Publishes the outcome of the load behind `ticket`, replacing the held
    /// collection wholesale. Returns `false` and leaves the store untouched
    /// when a newer load has already published. A newer load that never
    /// publishes (failed over, dropped) does not block an older one.
    pub fn complete(
        &self,
        ticket: LoadTicket,
        result: Result<Arc<Vec<Course>>, NetworkError>,
    ) -> bool {
        let collection = match result {
            Ok(courses) => Collection::Loaded(courses),
            Err(err) => Collection::Failed(err),
        };
        self.inner.state.send_if_modified(|snapshot| {
            if snapshot.generation >= ticket.generation {
                return false;
            }
            *snapshot = CollectionSnapshot {
                generation: ticket.generation,
                collection,
            };
            true
        })
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn courses(&self) -> Option<Arc<Vec<Course>>> {
        match &self.inner.state.borrow().collection {
            Collection::Loaded(courses) => Some(Arc::clone(courses)),
            Collection::Pending | Collection::Failed(_) => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Current `category` view, or `None` while nothing has loaded.
    pub fn courses_in(&self, category: Category) -> Option<Result<Vec<Course>, NetworkError>> {
        category_view(&self.inner.state.borrow().collection, category)
    }

    /// `category` view of the held collection, sorted by `seq_no`. Yields the
    /// current view immediately (once something has loaded) and again after
    /// every replacement. A failed load yields its error.
    pub fn by_category(
        &self,
        category: Category,
    ) -> impl Stream<Item = Result<Vec<Course>, NetworkError>> + Send + Unpin + 'static {
        WatchStream::new(self.inner.state.subscribe())
            .filter_map(move |snapshot| category_view(&snapshot.collection, category))
    }
}

fn category_view(
    collection: &Collection,
    category: Category,
) -> Option<Result<Vec<Course>, NetworkError>> {
    match collection {
        Collection::Pending => None,
        Collection::Loaded(courses) => Some(Ok(filter_by_category(courses, category))),
        Collection::Failed(err) => Some(Err(err.clone())),
    }
}

pub fn filter_by_category(courses: &[Course], category: Category) -> Vec<Course> {
    let mut filtered: Vec<Course> = courses
        .iter()
        .filter(|course| course.category == category)
        .cloned()
        .collect();
    sort_courses_by_seq_no(&mut filtered);
    filtered
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
