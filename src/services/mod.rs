pub mod canvas;
pub mod chart_service;
pub mod notifier;
pub mod poller;
pub mod search_service;
pub mod session;

pub use session::Dashboard;
