//! Text front-end pieces standing in for the editor window

pub mod preview;
pub mod sidebar;
