pub mod app;
pub mod cli;
pub mod config;
pub mod discover;
pub mod filters;
pub mod links;
pub mod omdb;
pub mod session;
pub mod storage;
pub mod store;
