pub mod foreground;
pub mod list;
