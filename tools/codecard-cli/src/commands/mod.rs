pub mod fonts;
pub mod generate;
pub mod languages;
