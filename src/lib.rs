// Library for tests to access modules

pub mod compress;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod routes;
pub mod stats_repo;
pub mod tables;
pub mod version;
