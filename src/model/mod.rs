pub mod catalog;
pub mod chart;
pub mod config;
pub mod difficulty;
pub mod mapper;
pub mod note;
