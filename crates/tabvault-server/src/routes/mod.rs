mod health_check;
pub use health_check::*;

mod tabs;
pub use tabs::*;

mod import;
pub use import::*;

mod clean;
pub use clean::*;

mod songs;
pub use songs::*;
