use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every way loading an assembly can fail.
///
/// Any of these is a load failure: the module could not be turned into a [`crate::CilModule`].
/// Queries never produce an error for "nothing found", that case is an ordinary `None`.
///
/// # Error Categories
///
/// ## File Parsing Errors
/// - [`Error::Malformed`] - Corrupted or invalid file structure
/// - [`Error::OutOfBounds`] - Attempted to read beyond file or stream boundaries
/// - [`Error::NotSupported`] - Not a .NET module, or a metadata layout this crate does not read
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::RecursionLimit`] - Signature nesting deeper than any sane compiler emits
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from goblin
///
/// # Examples
///
/// ```rust,no_run
/// use dotinspect::{CilModule, Error};
/// use std::path::Path;
///
/// match CilModule::from_file(Path::new("assembly.dll")) {
///     Ok(module) => println!("Loaded {} types", module.types().len()),
///     Err(Error::NotSupported) => eprintln!("Not a .NET module"),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {}", io_err),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// Carries the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Returned for PE images without a CLI header, and for metadata layouts (uncompressed
    /// tables with pointer indirection) that are not read by this crate.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// A token did not point to a row of the table it was expected to reference.
    #[error("Failed to resolve token - {0}")]
    TokenNotFound(Token),

    /// Recursion limit reached.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_records_location() {
        let error = malformed_error!("broken {} header", "CLI");
        match error {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "broken CLI header");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            _ => panic!("expected Malformed"),
        }
    }

    #[test]
    fn display() {
        assert_eq!(
            Error::TokenNotFound(Token::new(0x0200_0005)).to_string(),
            "Failed to resolve token - 0x02000005"
        );
        assert_eq!(Error::Empty.to_string(), "Provided input was empty");
    }
}
