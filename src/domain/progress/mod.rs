//! Module catalog and per-user progress state.

pub mod catalog;
pub mod module_progress;

pub use catalog::{default_modules, Module, ModuleCatalog, Submodule};
pub use module_progress::{ModuleProgress, SubmoduleProgress, SubmoduleStatus};
