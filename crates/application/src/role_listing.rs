//! Role list screen state.
//!
//! Every list request carries a generation. Only the response to the most
//! recently issued request is applied, so a slow response to an old search
//! can never overwrite a newer one.

use steward_core::{AppError, AppResult};
use steward_domain::{Role, RoleListQuery, RolePage, RoleSortField, SortDirection};

use crate::role_service::RoleService;

/// Tag of one issued list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTicket {
    generation: u64,
    query: RoleListQuery,
}

impl ListTicket {
    /// Returns the request generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the query to send.
    #[must_use]
    pub fn query(&self) -> &RoleListQuery {
        &self.query
    }
}

/// Query, results and loading state of the role list.
#[derive(Debug, Clone, Default)]
pub struct RoleListController {
    query: RoleListQuery,
    issued: u64,
    applied: u64,
    loading: bool,
    page: Option<RolePage>,
    last_error: Option<AppError>,
}

impl RoleListController {
    /// Creates a controller with the default query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current query.
    #[must_use]
    pub fn query(&self) -> &RoleListQuery {
        &self.query
    }

    /// Returns whether a request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the last applied page.
    #[must_use]
    pub fn page(&self) -> Option<&RolePage> {
        self.page.as_ref()
    }

    /// Returns the roles of the last applied page.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        self.page.as_ref().map_or(&[], |page| page.roles.as_slice())
    }

    /// Returns the error of the last applied response.
    #[must_use]
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Sets the search text and goes back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        let trimmed = search.trim();
        self.query.search = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self.query.page = 1;
    }

    /// Sorts by a field. Selecting the current field again flips the direction.
    pub fn sort_by(&mut self, field: RoleSortField) {
        if self.query.sort_by == field {
            self.query.sort_order = match self.query.sort_order {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
        } else {
            self.query.sort_by = field;
            self.query.sort_order = SortDirection::Asc;
        }
    }

    /// Moves to a page. Pages start at 1.
    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_limit(&mut self, limit: u32) {
        self.query.limit = limit;
        self.query.page = 1;
    }

    /// Issues a request for the current query, superseding any in flight.
    pub fn begin_request(&mut self) -> ListTicket {
        self.issued += 1;
        self.loading = true;
        ListTicket {
            generation: self.issued,
            query: self.query.clone(),
        }
    }

    /// Applies a response. Responses to superseded requests are discarded.
    ///
    /// Returns whether the response was applied.
    pub fn apply_response(&mut self, ticket: &ListTicket, result: AppResult<RolePage>) -> bool {
        if ticket.generation != self.issued || ticket.generation <= self.applied {
            return false;
        }

        self.applied = ticket.generation;
        self.loading = false;
        match result {
            Ok(page) => {
                self.page = Some(page);
                self.last_error = None;
            }
            Err(error) => self.last_error = Some(error),
        }
        true
    }

    /// Loads the current query through the role service.
    pub async fn refresh(&mut self, service: &RoleService) -> bool {
        let ticket = self.begin_request();
        let result = service.list_roles(ticket.query.clone()).await;
        self.apply_response(&ticket, result)
    }
}
