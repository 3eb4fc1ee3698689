//! Conversion of `git describe` output into versions

use thiserror::Error;

use crate::{Version, VersionParser, VersionParserError};

/// The tag did not reassemble into a valid version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Not a recognized git version \"{tag}\": {source}")]
pub struct GitConversionError {
    pub tag: String,
    #[source]
    pub source: VersionParserError,
}

/// Convert a `TAG-N-gHASH` description into a version.
///
/// Everything after the first `-` becomes build metadata, so
/// `v1.10.0-123-g0239788` reads as `1.10.0+123.g0239788`. A bare tag
/// converts to itself.
pub fn from_git_describe(tag: &str) -> Result<Version, GitConversionError> {
    let target = match tag.split_once('-') {
        Some((core, rest)) => format!("{}+{}", core, rest.replace('-', ".")),
        None => tag.to_string(),
    };

    VersionParser::new()
        .parse(&target)
        .map_err(|source| GitConversionError {
            tag: tag.to_string(),
            source,
        })
}
