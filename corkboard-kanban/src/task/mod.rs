//! Task commands

mod add;
mod archive;
mod delete;
mod get;
mod mv;
mod update;

pub use add::AddTask;
pub use archive::ArchiveTask;
pub use delete::DeleteTask;
pub use get::GetTask;
pub use mv::MoveTask;
pub use update::UpdateTask;
