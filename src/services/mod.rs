pub mod conversation;
pub mod language;
