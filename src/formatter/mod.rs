mod markdown;

pub use markdown::{format_function, format_index, format_module};
