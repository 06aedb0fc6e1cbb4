// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Origin classes: a transform-origin class that depends on the resolved placement.
//!
//! Scale and fade transitions look right only when they grow out of the edge facing the
//! reference. The origin class is picked from the placement through one of:
//!
//! - a fixed class, used for every placement;
//! - a resolver function;
//! - a table keyed by the placement's side;
//! - the built-in Tailwind CSS table ([`tailwindcss_origin_class`]).

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use tether_geometry::{Alignment, Placement, Side};

/// Maps a placement to an origin class.
pub type OriginResolver = Rc<dyn Fn(Placement) -> String>;

/// How the origin class is chosen.
#[derive(Clone)]
pub enum OriginClass {
    /// The same class for every placement.
    Fixed(String),
    /// A caller-supplied resolver.
    Resolver(OriginResolver),
    /// A lookup keyed by the placement's side; unlisted sides get no class.
    BySide(BTreeMap<Side, String>),
}

impl fmt::Debug for OriginClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(class) => f.debug_tuple("Fixed").field(class).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
            Self::BySide(table) => f.debug_tuple("BySide").field(table).finish(),
        }
    }
}

impl From<&str> for OriginClass {
    fn from(class: &str) -> Self {
        Self::Fixed(class.into())
    }
}

impl OriginClass {
    /// Resolver from a plain function.
    pub fn resolver(f: impl Fn(Placement) -> String + 'static) -> Self {
        Self::Resolver(Rc::new(f))
    }

    /// Side table from `(side, class)` pairs.
    pub fn by_side<'a>(entries: impl IntoIterator<Item = (Side, &'a str)>) -> Self {
        Self::BySide(
            entries
                .into_iter()
                .map(|(side, class)| (side, String::from(class)))
                .collect(),
        )
    }

    /// The class for `placement`.
    #[must_use]
    pub fn resolve(&self, placement: Placement) -> String {
        match self {
            Self::Fixed(class) => class.clone(),
            Self::Resolver(f) => f(placement),
            Self::BySide(table) => table.get(&placement.side()).cloned().unwrap_or_default(),
        }
    }
}

/// Tailwind CSS `origin-*` class growing out of the edge that faces the reference.
#[must_use]
pub const fn tailwindcss_origin_class(placement: Placement) -> &'static str {
    match (placement.side(), placement.alignment()) {
        (Side::Top, None) => "origin-bottom",
        (Side::Top, Some(Alignment::Start)) => "origin-bottom-left",
        (Side::Top, Some(Alignment::End)) => "origin-bottom-right",
        (Side::Bottom, None) => "origin-top",
        (Side::Bottom, Some(Alignment::Start)) => "origin-top-left",
        (Side::Bottom, Some(Alignment::End)) => "origin-top-right",
        (Side::Left, None) => "origin-right",
        (Side::Left, Some(Alignment::Start)) => "origin-top-right",
        (Side::Left, Some(Alignment::End)) => "origin-bottom-right",
        (Side::Right, None) => "origin-left",
        (Side::Right, Some(Alignment::Start)) => "origin-top-left",
        (Side::Right, Some(Alignment::End)) => "origin-bottom-left",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn side_table_uses_the_primary_side() {
        let table = OriginClass::by_side([(Side::Top, "origin-bottom"), (Side::Bottom, "origin-top")]);
        assert_eq!(table.resolve(Placement::TopStart), "origin-bottom");
        assert_eq!(table.resolve(Placement::BottomEnd), "origin-top");
        assert_eq!(table.resolve(Placement::Left), "");
    }

    #[test]
    fn resolver_and_fixed() {
        let r = OriginClass::resolver(|p| format!("from-{p}"));
        assert_eq!(r.resolve(Placement::RightEnd), "from-right-end");
        assert_eq!(OriginClass::from("origin-center").resolve(Placement::Top), "origin-center");
    }

    #[test]
    fn tailwind_table_faces_the_reference() {
        assert_eq!(tailwindcss_origin_class(Placement::Top), "origin-bottom");
        assert_eq!(tailwindcss_origin_class(Placement::BottomStart), "origin-top-left");
        assert_eq!(tailwindcss_origin_class(Placement::LeftEnd), "origin-bottom-right");
        assert_eq!(tailwindcss_origin_class(Placement::Right), "origin-left");
    }
}
