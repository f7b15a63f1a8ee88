pub mod bar;
pub mod news;
