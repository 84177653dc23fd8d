//! UI layer for the survey window: app shell and painted widgets.

pub mod app;
pub mod widgets;

pub use app::SurveyApp;
