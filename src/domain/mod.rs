pub mod ai;
pub mod body;
pub mod boss;
pub mod combat;
pub mod entity;
