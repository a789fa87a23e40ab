pub mod roadmap;
pub mod settings;
pub mod study;
