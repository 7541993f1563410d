pub mod models;
pub mod studio;

pub use studio::{StudioApiError, VideoStudio};
