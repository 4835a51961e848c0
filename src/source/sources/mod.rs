/// Allocine movie-review sentiment builder.
pub mod allocine;
