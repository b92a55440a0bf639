//! Core functionality: the article catalog, the edit session, indentation and preview rendering

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod indent;
pub mod render;
pub mod session;
