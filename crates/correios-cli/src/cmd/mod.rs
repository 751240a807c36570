pub mod add;
pub mod check;
pub mod list;
pub mod remove;
