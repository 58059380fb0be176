//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_role_repository;
mod in_memory_role_repository;

pub use http_role_repository::HttpRoleRepository;
pub use in_memory_role_repository::InMemoryRoleRepository;
