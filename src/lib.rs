pub mod cli;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod imdb;
pub mod index;
pub mod label;
mod metrics;
pub mod ranking;
pub mod searcher;
pub mod server;
pub mod utils;

pub use config::Opts;
pub use imdb::{IMDB, IMDBBuilder};
