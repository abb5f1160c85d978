pub mod cli;
pub mod config;
pub mod credentials;
pub mod github;
pub mod output;
pub mod pulls;
pub mod report;
pub mod run;
