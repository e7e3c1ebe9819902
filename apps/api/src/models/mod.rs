pub mod like;
pub mod matching;
pub mod profile;
