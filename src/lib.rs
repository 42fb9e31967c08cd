// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod cpu_tracker;
pub mod cron_repo;
pub mod history_repo;
pub mod metrics_repo;
pub mod models;
pub mod publisher;
pub mod state_store;
