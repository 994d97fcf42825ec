//! Controller error types
//!
//! Every error is local: the controller logs it and carries on with the
//! next event.

/// Errors raised while acting on an event or update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoreError {
    /// A `uuid.` or page reference did not resolve
    UnresolvedReference,
    /// An update named an entity no page uses
    UnknownEntity,
    /// A numeric or time field could not be parsed
    MalformedValue,
    /// A page index or value fell outside its valid range
    OutOfRange,
}
