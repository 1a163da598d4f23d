use derive_more::{Display, Error};
use miette::Diagnostic;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Error type of [`decode_text`].
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum DecodeTextError {
    #[display("content is not valid UTF-8")]
    InvalidUtf8,
    #[display("content has a UTF-16 byte order mark but an odd number of bytes")]
    OddUtf16Length,
    #[display("content is not valid UTF-16")]
    InvalidUtf16,
}

/// Error type of [`read_text_file`].
#[derive(Debug, Display, Error, Diagnostic)]
pub enum ReadTextFileError {
    #[display("Failed to read {path:?}: {error}")]
    #[diagnostic(code(webdist_fs::read_file))]
    ReadFile {
        path: PathBuf,
        #[error(source)]
        error: io::Error,
    },

    #[display("Failed to decode {path:?}: {error}")]
    #[diagnostic(code(webdist_fs::decode_file))]
    Decode {
        path: PathBuf,
        #[error(source)]
        error: DecodeTextError,
    },
}

impl ReadTextFileError {
    /// Whether the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ReadTextFileError::ReadFile { error, .. } if error.kind() == io::ErrorKind::NotFound
        )
    }
}

fn decode_utf16(bytes: &[u8], from_bytes: fn([u8; 2]) -> u16) -> Result<String, DecodeTextError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeTextError::OddUtf16Length);
    }
    let units: Vec<u16> =
        bytes.chunks_exact(2).map(|pair| from_bytes([pair[0], pair[1]])).collect();
    String::from_utf16(&units).map_err(|_| DecodeTextError::InvalidUtf16)
}

/// Decode the bytes of a text file.
///
/// The encoding is detected from the byte order mark: UTF-16 LE and BE are recognized,
/// everything else must be UTF-8 (with or without BOM). The BOM is not part of the output.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, DecodeTextError> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return String::from_utf8(rest.to_vec()).map_err(|_| DecodeTextError::InvalidUtf8);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8(bytes).map_err(|_| DecodeTextError::InvalidUtf8)
}

/// Read a whole text file, detecting its encoding.
pub fn read_text_file(path: &Path) -> Result<String, ReadTextFileError> {
    let bytes = fs::read(path)
        .map_err(|error| ReadTextFileError::ReadFile { path: path.to_path_buf(), error })?;
    decode_text(bytes)
        .map_err(|error| ReadTextFileError::Decode { path: path.to_path_buf(), error })
}
