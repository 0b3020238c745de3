//! Column commands

mod add;
mod archive;
mod delete;
mod mv;
mod update;

pub use add::AddColumn;
pub use archive::ArchiveColumn;
pub use delete::DeleteColumn;
pub use mv::MoveColumn;
pub use update::UpdateColumn;
