//! Application services and ports.

#![forbid(unsafe_code)]

mod navigation_service;
mod role_editor;
mod role_listing;
mod role_ports;
mod role_service;

#[cfg(test)]
mod test_support;

pub use navigation_service::NavigationService;
pub use role_editor::{
    DraftMode, EditorState, ResourceSelection, RoleDraft, RoleEditor, SubmitTicket,
};
pub use role_listing::{ListTicket, RoleListController};
pub use role_ports::RoleRepository;
pub use role_service::RoleService;
