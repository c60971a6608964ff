pub mod config;
pub mod field;
pub mod game;
pub mod snake;
pub mod term;
pub mod tick;

pub type TermInt = u16;
pub type Coords = (u16, u16);
