pub mod entity;
pub mod grid;
pub mod island;
pub mod rules;
pub mod tile;
