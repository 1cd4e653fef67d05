//! Schema resolution: field roles, dimension and element-type metadata, and
//! the cached field registry of a record type.

pub mod dims;
pub mod element;
pub mod field;
pub mod registry;

use smallvec::SmallVec;

/// An ordered tuple of dimension names.
///
/// Duplicates are permitted and order is preserved exactly as declared.
pub type Dims = SmallVec<[&'static str; 4]>;

/// The role a schema field plays during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A data variable of the container.
    Data,
    /// A coordinate of the container.
    Coord,
    /// A free-form attribute.
    Attr,
    /// The display name of a single-variable container.
    Name,
}
