//! Headless role editor.
//!
//! The editor owns one draft role plus view state (category filter and
//! expanded resources). View state indexes into the catalog and never
//! changes the draft, so the whole workflow can be driven without a
//! rendering layer.

use std::collections::BTreeSet;
use std::sync::Arc;

use steward_core::{AppError, RoleId};
use steward_domain::{PermissionMap, Resource, ResourceCatalog, Role, RoleInput, copy_name};

use crate::role_service::RoleService;

/// Lifecycle of the editor dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Dialog closed, no draft.
    Idle,
    /// Draft loaded and editable.
    Editing,
    /// Draft handed to the store, waiting for the outcome.
    Submitting,
}

/// Whether the draft creates a new role or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    /// Submit creates a role. Used for new and cloned roles.
    Create,
    /// Submit replaces the role with this identifier.
    Edit(RoleId),
}

/// In-progress role being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    /// Create or edit.
    pub mode: DraftMode,
    /// Role name as typed.
    pub name: String,
    /// Complete permission map.
    pub permissions: PermissionMap,
}

/// Checkbox state of a resource's "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceSelection {
    /// No catalog action granted.
    None,
    /// Some but not all catalog actions granted.
    Partial,
    /// Every catalog action granted.
    All,
}

/// Payload of one submission, produced by [`RoleEditor::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    /// Create or edit.
    pub mode: DraftMode,
    /// Pruned payload.
    pub input: RoleInput,
}

/// State machine driving the role create/edit/clone dialog.
#[derive(Debug, Clone)]
pub struct RoleEditor {
    catalog: Arc<ResourceCatalog>,
    state: EditorState,
    draft: Option<RoleDraft>,
    selected_category: Option<String>,
    expanded: BTreeSet<String>,
    last_error: Option<AppError>,
}

impl RoleEditor {
    /// Creates a closed editor over the catalog.
    #[must_use]
    pub fn new(catalog: Arc<ResourceCatalog>) -> Self {
        Self {
            catalog,
            state: EditorState::Idle,
            draft: None,
            selected_category: None,
            expanded: BTreeSet::new(),
            last_error: None,
        }
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Returns the current draft.
    #[must_use]
    pub fn draft(&self) -> Option<&RoleDraft> {
        self.draft.as_ref()
    }

    /// Returns the error of the last failed submission.
    #[must_use]
    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// Returns the message to display for the last failed submission.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(AppError::user_message)
    }

    /// Opens the dialog with an empty draft.
    pub fn open_create(&mut self) -> bool {
        self.open(RoleDraft {
            mode: DraftMode::Create,
            name: String::new(),
            permissions: PermissionMap::new(),
        })
    }

    /// Opens the dialog on an existing role. Grants the catalog no longer
    /// defines are dropped from the draft.
    pub fn open_edit(&mut self, role: &Role) -> bool {
        self.open(RoleDraft {
            mode: DraftMode::Edit(role.id()),
            name: role.name().to_owned(),
            permissions: role.permissions().clone(),
        })
    }

    /// Opens the dialog on a copy of a role, saved as a new role.
    pub fn open_clone(&mut self, role: &Role) -> bool {
        self.open(RoleDraft {
            mode: DraftMode::Create,
            name: copy_name(role.name()),
            permissions: role.permissions().clone(),
        })
    }

    fn open(&mut self, mut draft: RoleDraft) -> bool {
        if self.state == EditorState::Submitting {
            return false;
        }

        draft.permissions = draft.permissions.restricted_to(&self.catalog);
        self.draft = Some(draft);
        self.state = EditorState::Editing;
        self.selected_category = None;
        self.expanded.clear();
        self.last_error = None;
        true
    }

    /// Closes the dialog and discards the draft. Ignored while submitting.
    pub fn close(&mut self) -> bool {
        if self.state == EditorState::Submitting {
            return false;
        }

        self.reset();
        true
    }

    fn reset(&mut self) {
        self.state = EditorState::Idle;
        self.draft = None;
        self.selected_category = None;
        self.expanded.clear();
        self.last_error = None;
    }

    fn editable_draft(&mut self) -> Option<&mut RoleDraft> {
        if self.state != EditorState::Editing {
            return None;
        }
        self.draft.as_mut()
    }

    /// Replaces the draft name.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let Some(draft) = self.editable_draft() else {
            return false;
        };
        draft.name = name.into();
        true
    }

    /// Filters the visible resources to one category, or shows all with `None`.
    ///
    /// Accepted in every editor state, including `Idle` and `Submitting`: the
    /// filter is view state and never touches the draft.
    pub fn select_category(&mut self, category: Option<&str>) {
        self.selected_category = category.map(ToOwned::to_owned);
    }

    /// Returns the selected category.
    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    /// Returns the resources shown under the current category filter.
    #[must_use]
    pub fn visible_resources(&self) -> Vec<&Resource> {
        match self.selected_category.as_deref() {
            Some(category) => self.catalog.resources_by_category(category),
            None => self.catalog.resources().iter().collect(),
        }
    }

    /// Expands or collapses a resource row. Returns whether it is expanded now.
    pub fn toggle_expanded(&mut self, resource: &str) -> bool {
        if self.expanded.remove(resource) {
            false
        } else {
            self.expanded.insert(resource.to_owned());
            true
        }
    }

    /// Returns whether a resource row is expanded.
    #[must_use]
    pub fn is_expanded(&self, resource: &str) -> bool {
        self.expanded.contains(resource)
    }

    /// Flips one action of the draft. Pairs outside the catalog are ignored.
    ///
    /// Returns whether the draft changed.
    pub fn toggle_permission(&mut self, resource: &str, action: &str) -> bool {
        if self.catalog.validate_grant(resource, action).is_err() {
            return false;
        }
        let Some(draft) = self.editable_draft() else {
            return false;
        };

        draft.permissions.toggle(resource, action);
        true
    }

    /// Grants every catalog action of the resource, or clears the resource
    /// when all of them are already granted.
    ///
    /// Returns whether the draft changed.
    pub fn toggle_all_for_resource(&mut self, resource: &str) -> bool {
        let Some(actions) = self
            .catalog
            .get_resource(resource)
            .map(|definition| definition.actions().to_vec())
        else {
            return false;
        };
        let Some(draft) = self.editable_draft() else {
            return false;
        };

        draft.permissions.toggle_all(resource, actions.as_slice());
        true
    }

    /// Returns the select-all checkbox state of a resource.
    #[must_use]
    pub fn selection_state(&self, resource: &str) -> ResourceSelection {
        let (Some(definition), Some(draft)) =
            (self.catalog.get_resource(resource), self.draft.as_ref())
        else {
            return ResourceSelection::None;
        };

        let granted = definition
            .actions()
            .iter()
            .filter(|action| draft.permissions.is_granted(resource, action))
            .count();
        match granted {
            0 => ResourceSelection::None,
            count if count == definition.actions().len() => ResourceSelection::All,
            _ => ResourceSelection::Partial,
        }
    }

    /// Starts a submission.
    ///
    /// Returns `None` when no draft is editable, which includes a submission
    /// already in flight, or when the draft fails validation. In the latter
    /// case the error is kept for display and the editor stays in `Editing`.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        let catalog = Arc::clone(&self.catalog);
        let draft = self.editable_draft()?;
        draft.permissions.prune_empty();

        let input = RoleInput {
            name: draft.name.trim().to_owned(),
            permissions: draft.permissions.clone(),
        };
        let mode = draft.mode;

        if let Err(error) = input.clone().validate(&catalog) {
            self.last_error = Some(error);
            return None;
        }

        self.state = EditorState::Submitting;
        self.last_error = None;
        Some(SubmitTicket { mode, input })
    }

    /// Applies the outcome of the in-flight submission.
    ///
    /// On success the editor closes and the saved role is returned. On
    /// failure the draft is kept and the error surfaced.
    pub fn finish_submit(&mut self, result: Result<Role, AppError>) -> Option<Role> {
        if self.state != EditorState::Submitting {
            return None;
        }

        match result {
            Ok(role) => {
                self.reset();
                Some(role)
            }
            Err(error) => {
                self.state = EditorState::Editing;
                self.last_error = Some(error);
                None
            }
        }
    }

    /// Submits the draft through the role service.
    pub async fn submit(&mut self, service: &RoleService) -> Option<Role> {
        let ticket = self.begin_submit()?;
        let result = service.submit(ticket).await;
        self.finish_submit(result)
    }
}
