pub mod app;
pub mod storage;
pub mod terminal;
pub mod view;
pub mod weather;
