use crate::zoom::InvalidZoom;

/// Errors reported by the parsing and validation functions of this crate.
///
/// Points outside of a projection's domain are not errors. They are reported as NaN
/// coordinates, see [`crate::Location::is_nan`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Textual input could not be parsed. `input` is the offending part of the string.
    #[error("cannot parse {what} from '{input}'")]
    Format { what: &'static str, input: String },

    /// Numeric input which would make the computation degenerate.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("unknown projection '{0}'")]
    UnknownProjection(String),

    #[error(transparent)]
    InvalidZoom(#[from] InvalidZoom),
}

impl Error {
    pub(crate) fn format(what: &'static str, input: &str) -> Self {
        Self::Format {
            what,
            input: input.to_owned(),
        }
    }
}
