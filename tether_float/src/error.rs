// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Usage and configuration errors.

use tether_geometry::ParseError;

/// Errors reported by compositions at construction or configuration time.
///
/// Degenerate render input (missing children) and transient geometry failures
/// (endpoints detached or hidden) are not errors; they render nothing or keep the
/// previous position.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FloatError {
    /// A subcomponent was created outside the context of a `Float` root.
    #[error("<{component} /> must be in the <Float /> component.")]
    MissingContext {
        /// Name of the subcomponent, e.g. `"FloatReference"`.
        component: &'static str,
    },
    /// A placement or strategy given by name was not recognized.
    #[error(transparent)]
    InvalidOption(#[from] ParseError),
}
