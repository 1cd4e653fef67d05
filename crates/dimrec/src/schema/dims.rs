//! Type-level dimension names.
//!
//! Dimension names are carried by marker types declared with the [`dims!`]
//! macro. A field's dimension tuple is written as `()` for zero dimensions,
//! a single marker for one, or a tuple of markers for several:
//!
//! ```
//! use dimrec::prelude::*;
//!
//! dims! {
//!     pub dim Time = "time";
//!     pub dim Lat = "lat";
//! }
//!
//! assert_eq!(<(Time, Lat)>::dims().as_slice(), &["time", "lat"]);
//! ```

use crate::schema::Dims;

/// A type-level dimension name.
pub trait Dim {
    const NAME: &'static str;
}

/// The dimension tuple of a `Data` or `Coord` field.
pub trait DimsSpec {
    fn dims() -> Dims;
}

impl DimsSpec for () {
    fn dims() -> Dims {
        Dims::new()
    }
}

/// Declares dimension marker types.
///
/// Each entry defines a unit struct implementing [`Dim`] and [`DimsSpec`],
/// so the marker can be used on its own or inside a tuple.
#[macro_export]
macro_rules! dims {
    ($($(#[$meta:meta])* $vis:vis dim $name:ident = $label:literal;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            $vis struct $name;

            impl $crate::Dim for $name {
                const NAME: &'static str = $label;
            }

            impl $crate::DimsSpec for $name {
                fn dims() -> $crate::Dims {
                    let mut dims = $crate::Dims::new();
                    dims.push($label);
                    dims
                }
            }
        )+
    };
}

macro_rules! impl_dims_spec_tuple {
    ($($dim:ident),+) => {
        impl<$($dim: Dim),+> DimsSpec for ($($dim,)+) {
            fn dims() -> Dims {
                let mut dims = Dims::new();
                $(dims.push($dim::NAME);)+
                dims
            }
        }
    };
}

impl_dims_spec_tuple!(D0);
impl_dims_spec_tuple!(D0, D1);
impl_dims_spec_tuple!(D0, D1, D2);
impl_dims_spec_tuple!(D0, D1, D2, D3);
impl_dims_spec_tuple!(D0, D1, D2, D3, D4);
impl_dims_spec_tuple!(D0, D1, D2, D3, D4, D5);
impl_dims_spec_tuple!(D0, D1, D2, D3, D4, D5, D6);
impl_dims_spec_tuple!(D0, D1, D2, D3, D4, D5, D6, D7);
