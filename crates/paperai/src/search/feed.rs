//! Offset-paginated result accumulator behind "load more".

use crate::models::{Paper, SearchResult};

/// Handle for one in-flight page request.
///
/// Only the ticket from the most recent [`ResultFeed::begin`] is accepted, so a
/// slow response for a superseded request cannot overwrite newer results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTicket {
    generation: u64,
    offset: u32,
}

impl FeedTicket {
    /// Offset this ticket was issued for.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

/// Accumulated search results.
#[derive(Debug, Clone)]
pub struct ResultFeed {
    papers: Vec<Paper>,
    offset: u32,
    limit: u32,
    total: i64,
    generation: u64,
}

impl ResultFeed {
    /// Create an empty feed with the given page size.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self { papers: Vec::new(), offset: 0, limit, total: 0, generation: 0 }
    }

    /// Start a request for `offset`, superseding any outstanding ticket.
    pub fn begin(&mut self, offset: u32) -> FeedTicket {
        self.generation += 1;
        FeedTicket { generation: self.generation, offset }
    }

    /// Start a request for the page after the current one.
    pub fn begin_next(&mut self) -> FeedTicket {
        let next = self.next_offset();
        self.begin(next)
    }

    /// Apply a response. Offset 0 replaces the list, later offsets append.
    ///
    /// Returns false and leaves the feed untouched if the ticket is stale.
    pub fn apply(&mut self, ticket: FeedTicket, page: SearchResult) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Dropping superseded search page"
            );
            return false;
        }

        if ticket.offset == 0 {
            self.papers = page.data;
        } else {
            self.papers.extend(page.data);
        }
        self.offset = ticket.offset;
        self.total = page.total;
        true
    }

    /// Offset of the next page.
    #[must_use]
    pub const fn next_offset(&self) -> u32 {
        self.offset + self.limit
    }

    /// Papers accumulated so far.
    #[must_use]
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    /// Total reported by the last applied page.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.total
    }

    /// Offset of the last applied page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}
