pub mod app;
pub mod generator;
pub mod maze;
