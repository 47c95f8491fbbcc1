pub mod api;
pub mod config;
pub mod filter;
pub mod models;
pub mod sites;
pub mod storage;
