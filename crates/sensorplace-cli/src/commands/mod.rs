pub mod place;
pub mod score;
