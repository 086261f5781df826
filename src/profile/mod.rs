pub mod document;
mod emit;
pub mod settings;

pub use document::{load_document, merge_into, parse_bytes, remove_model_key, save_document};
pub use settings::clean_settings;
