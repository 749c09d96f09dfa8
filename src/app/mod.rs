//! Page-level glue: the home view, notifications and the route table.

mod home;
mod notify;
mod routes;

pub use home::{CHART_TITLE, DataOrigin, HomeView, LoadState};
pub use notify::{
    LOAD_FAILURE_MESSAGE, Notification, NotificationLevel, Notifier, RecordingNotifier,
    TracingNotifier,
};
pub use routes::Route;
