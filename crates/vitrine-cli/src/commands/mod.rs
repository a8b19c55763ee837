//! Command handlers, one module per subcommand family.

mod cleanup;
mod content;
mod layout;
mod organize;
mod purge;
mod upload;

pub(crate) use cleanup::handle_cleanup;
pub(crate) use content::{handle_collection, handle_single};
pub(crate) use layout::handle_layout;
pub(crate) use organize::handle_organize;
pub(crate) use purge::handle_purge;
pub(crate) use upload::handle_upload;
