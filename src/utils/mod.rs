pub mod input_source;
mod readers;
mod region;
mod tables;

pub use input_source::InputSource;
pub use readers::{create_output_writer, open_text_reader, write_lines, TextReader};
pub use region::GenomicRegion;
pub use tables::{is_comment_or_blank, read_lines, split_fields, TableLines};

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
