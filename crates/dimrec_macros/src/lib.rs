//! Procedural macros for dimrec.
//!
//! This crate only defines the `#[derive(Record)]` macro; see the dimrec
//! crate for documentation and examples.

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod record;

/// Derives the `Record` trait for a struct with named fields.
///
/// The role of each field is read from the outer wrapper of its declared
/// type: `Data`, `Coord`, `Coordof`, `Dataof`, `Attr` or `Name`. Fields of
/// any other type are pass-through fields.
///
/// Supported attributes, all under the `dimrec` namespace:
///
/// - `#[dimrec(dtype = "…")]` on a `Data` or `Coord` field selects the
///   element type by its textual descriptor, e.g. `"uint8"` or
///   `"datetime64[ns]"`. It overrides the type parameter of the wrapper.
/// - `#[dimrec(rename = "…")]` on any field changes the name the field
///   contributes to the registry.
/// - `#[dimrec(flatten)]` on a field whose type derives `Record` splices the
///   fields of that base record in place.
/// - `#[dimrec(factory = SomeFactory)]` on the struct selects the container
///   factory; `SomeFactory` must implement `ContainerFactory + Default`.
#[proc_macro_derive(Record, attributes(dimrec))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    match record::impl_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
