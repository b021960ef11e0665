//! Load time-stepped solver output (`fort.qNNNN` files) into a dense series and
//! render pressure/velocity animations as self-contained HTML.

pub mod animation;
pub mod config;
pub mod error;
pub mod grid;
pub mod ingest;
pub mod renderer;
pub mod series;
