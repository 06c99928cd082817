pub mod config;
pub mod console;
pub mod context;
pub mod flow;
pub mod notice;

pub use config::AppConfig;
pub use context::AppContext;
pub use flow::{FlowError, OnboardingFlow, Route};
pub use notice::ErrorNotice;
