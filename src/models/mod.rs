mod movie;
mod user;
mod view;

pub use movie::{CatalogPage, Genre, GenreId, MovieDetail, MovieId, MovieSummary};
pub use user::{SearchedMovie, UserRecord};
pub use view::{MovieCard, MovieView, SearchOutcome};
