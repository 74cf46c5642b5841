//! Record files on disk: JSON encoding and prefix search.

mod json;
mod walk;

pub use json::{
    ensure_dir, output_file_name, read_records, records_from_json, records_to_json, write_batch,
};
pub use walk::{find_prefixed_files, PrefixWalker};
