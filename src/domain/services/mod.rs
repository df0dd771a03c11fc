pub mod actions;
mod app_state;
pub mod events;
mod navigation;
mod pages;
mod resume_submission;
mod session_store;
mod student_fetcher;

pub use app_state::*;
pub use navigation::*;
pub use pages::*;
pub use resume_submission::*;
pub use session_store::*;
pub use student_fetcher::*;
