pub mod post;
pub mod search;
pub mod series;
pub mod settings;
