pub mod cli;
pub mod commands;
pub mod events;
pub mod oauth;
pub mod report;
pub mod store;
