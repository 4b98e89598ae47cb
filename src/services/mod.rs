pub mod movie_view;
pub mod recommendations;
pub mod title_search;

pub use movie_view::{render_movie, ViewSettings};
pub use recommendations::recommend;
pub use title_search::{match_by_starting_letter, resolve_title};
