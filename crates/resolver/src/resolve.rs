use crate::{is_nested_path, Identifier};
use derive_more::{Display, Error};
use indexmap::{map::Entry, IndexMap};
use miette::Diagnostic;
use webdist_lockfile::DependencyRecord;

/// Map from dependency name to [`Identifier`], in lockfile order.
pub type NameToIdentifier = IndexMap<String, Identifier>;

/// Map from [`Identifier`] to the names sharing it, both in lockfile order.
pub type IdentifierToNames = IndexMap<Identifier, Vec<String>>;

/// Error type of [`resolve`].
#[derive(Debug, Display, Error, Diagnostic)]
#[non_exhaustive]
pub enum ResolveError {
    #[display("{name:?} module already exists in dependencies")]
    #[diagnostic(
        code(webdist_resolver::duplicate_dependency_name),
        help("Rename the module by hand so that every dependency name is unique.")
    )]
    DuplicateDependencyName { name: String },

    #[display("{name:?} is not a valid dependency directory name")]
    #[diagnostic(
        code(webdist_resolver::unsafe_name),
        help("Dependency names must be relative paths without \".\" or \"..\" segments.")
    )]
    UnsafeName { name: String },

    #[display("Identifier \"{identifier}\" of {name:?} would escape the output directory")]
    #[diagnostic(
        code(webdist_resolver::unsafe_identifier),
        help("The fragment after \"#\" must be a relative path without \".\" or \"..\" segments.")
    )]
    UnsafeIdentifier { name: String, identifier: Identifier },
}

/// The two inverse maps produced by [`resolve`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name_to_identifier: NameToIdentifier,
    /// Every list is non-empty. Dependencies with an empty identifier are absent.
    pub identifier_to_names: IdentifierToNames,
}

impl Resolution {
    /// The dependency whose output is copied for each identifier: the first name that
    /// was resolved to it.
    pub fn representatives(&self) -> impl Iterator<Item = (&'_ Identifier, &'_ str)> {
        self.identifier_to_names
            .iter()
            .filter_map(|(identifier, names)| Some((identifier, names.first()?.as_str())))
    }
}

/// Derive an [`Identifier`] for every non-dev dependency and group names by identifier.
///
/// Fails on the first dependency name that occurs twice, and on any name or identifier
/// that would escape the directory it is joined onto.
pub fn resolve<'a, Records>(records: Records) -> Result<Resolution, ResolveError>
where
    Records: IntoIterator<Item = DependencyRecord<'a>>,
{
    let mut resolution = Resolution::default();

    for DependencyRecord { name, version_spec, is_dev } in records {
        if is_dev {
            continue;
        }

        let identifier = Identifier::derive(name, version_spec);
        tracing::debug!(target: "webdist::resolve", name, %identifier, "Resolved identifier");

        let entry = match resolution.name_to_identifier.entry(name.to_string()) {
            Entry::Occupied(_) => {
                return Err(ResolveError::DuplicateDependencyName { name: name.to_string() });
            }
            Entry::Vacant(entry) => entry,
        };

        // an empty identifier is kept in the manifest but never located nor copied
        let copied = !identifier.is_empty();
        if copied && !is_nested_path(name) {
            return Err(ResolveError::UnsafeName { name: name.to_string() });
        }
        if copied && !is_nested_path(identifier.as_str()) {
            return Err(ResolveError::UnsafeIdentifier { name: name.to_string(), identifier });
        }

        entry.insert(identifier.clone());

        if copied {
            resolution
                .identifier_to_names
                .entry(identifier)
                .or_default()
                .push(name.to_string());
        }
    }

    tracing::info!(
        target: "webdist::resolve",
        dependencies = resolution.name_to_identifier.len(),
        identifiers = resolution.identifier_to_names.len(),
        "Resolved all dependencies"
    );

    Ok(resolution)
}
