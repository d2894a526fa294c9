//! Metadata streams (ECMA-335 II.24.2.2)
//!
//! The metadata root lists a handful of named streams. The inspector reads four of them:
//!
//! - **`#~`** (or **`#-`**) - the metadata tables, see [`TablesHeader`]
//! - **`#Strings`** - UTF-8 identifiers such as type and method names, see [`Strings`]
//! - **`#Blob`** - signatures and other binary data, see [`Blob`]
//! - **`#GUID`** - the module version id, see [`Guid`]
//!
//! The `#US` heap holds string literals used by IL code and is not needed here.

mod blob;
mod guid;
mod streamheader;
mod strings;
mod tablesheader;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
