mod action;
mod backend;
mod client_error;
mod event;
mod notification;
mod route;
mod student;

pub use action::*;
pub use backend::*;
pub use client_error::*;
pub use event::*;
pub use notification::*;
pub use route::*;
pub use student::*;
