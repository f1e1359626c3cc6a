/// Core domain types for Soundshelf
mod ids;
mod track;

pub use ids::TrackId;
pub use track::Track;
