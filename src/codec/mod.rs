pub mod apng_sink;
pub mod gif_source;
