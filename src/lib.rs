pub mod flashcards;
pub mod roadmap;
pub mod settings;

pub use flashcards::{Card, Grade, Rating, StudySession};
pub use roadmap::{layout, RoadmapGraph, RoadmapNode};
pub use settings::AiSettings;
