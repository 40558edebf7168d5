//! Local job-application tracker: a persistent record store over a JSON
//! key-value storage, transient filter state, pure derived views (filtered
//! list, status distribution, calendar, success rates), and the advisory
//! status workflow.

pub mod filter;
pub mod models;
pub mod seed;
pub mod storage;
pub mod store;
pub mod tui;
pub mod views;
pub mod workflow;
