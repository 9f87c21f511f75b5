// Verbalization of tag strings and post-processing of the final text.

pub mod post_processing;
pub mod verbalize;

pub use post_processing::{build_post_processor, post_process};
pub use verbalize::build_verbalizer;
