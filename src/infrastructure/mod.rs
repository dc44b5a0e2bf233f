// Infrastructure layer
pub mod file_system;
pub mod module_locator;
pub mod monorepo;
pub mod polyfills;

pub use file_system::*;
pub use module_locator::*;
pub use monorepo::*;
pub use polyfills::*;
