pub mod actions;
pub mod selection;
pub mod state;
pub mod update;

pub use selection::Selection;
pub use state::App;
pub use update::run;
