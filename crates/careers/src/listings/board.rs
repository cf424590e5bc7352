use tracing::error;

use super::domain::{JobId, JobPosting};
use super::source::{JobListingSource, ListingError};

/// View state behind the careers page. Every transition consumes the board
/// and returns the next value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBoard {
    postings: Vec<JobPosting>,
    loading: bool,
    selected: Option<JobId>,
}

impl JobBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the single load for this board: mark loading, fetch once, apply.
    pub async fn load<S>(source: &S) -> Self
    where
        S: JobListingSource + ?Sized,
    {
        let board = Self::new().begin_loading();
        let result = source.fetch().await;
        board.loaded(result)
    }

    pub fn begin_loading(self) -> Self {
        Self {
            loading: true,
            ..self
        }
    }

    /// Apply the fetch result. Failures are logged and leave the list empty.
    pub fn loaded(self, result: Result<Vec<JobPosting>, ListingError>) -> Self {
        let postings = match result {
            Ok(postings) => postings,
            Err(err) => {
                error!(error = %err, "error fetching job data");
                Vec::new()
            }
        };

        Self {
            postings,
            loading: false,
            selected: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Everything the source returned, inactive rows included.
    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn active_postings(&self) -> impl Iterator<Item = &JobPosting> {
        self.postings.iter().filter(|posting| posting.is_active())
    }

    pub fn find_active(&self, id: &JobId) -> Option<&JobPosting> {
        self.active_postings().find(|posting| &posting.id == id)
    }

    /// Select an active posting; unknown or inactive ids leave the board as is.
    pub fn select(self, id: &JobId) -> Self {
        if self.find_active(id).is_none() {
            return self;
        }
        Self {
            selected: Some(id.clone()),
            ..self
        }
    }

    pub fn clear_selection(self) -> Self {
        Self {
            selected: None,
            ..self
        }
    }

    pub fn selected(&self) -> Option<&JobPosting> {
        self.selected.as_ref().and_then(|id| self.find_active(id))
    }
}
