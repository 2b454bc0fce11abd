mod app;
mod effects;
pub mod logging;
mod pick;
mod ui;

pub use app::run_app;
