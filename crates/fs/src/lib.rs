mod copy_dir;
mod read_text_file;
mod replace_file;

pub use copy_dir::{copy_dir_recursive, CopyDirError};
pub use read_text_file::{decode_text, read_text_file, DecodeTextError, ReadTextFileError};
pub use replace_file::{replace_file, ReplaceFileError};
