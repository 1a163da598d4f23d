mod identifier;
mod resolve;

pub use identifier::{is_nested_path, Identifier};
pub use resolve::{resolve, IdentifierToNames, NameToIdentifier, Resolution, ResolveError};
