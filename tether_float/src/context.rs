// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Values a [`Float`](crate::Float) root hands to its subcomponents.
//!
//! Subcomponents receive a [`ContextScope`] at construction. A scope built outside any
//! root ([`ContextScope::root`]) holds nothing, and constructing a subcomponent from it
//! fails with [`FloatError::MissingContext`] naming the subcomponent.
//!
//! Every root provides the arrow context. Only a composable root provides the reference
//! and floating contexts; an implicit root renders those parts itself.

use tether_geometry::Placement;

use crate::controller::FloatController;
use crate::error::FloatError;
use crate::props::FloatProps;

/// What [`FloatReference`](crate::FloatReference) needs from its root.
#[derive(Clone, Debug)]
pub struct ReferenceContext {
    controller: FloatController,
}

impl ReferenceContext {
    /// The root's controller.
    pub fn controller(&self) -> &FloatController {
        &self.controller
    }

    /// The root's resolved placement.
    pub fn placement(&self) -> Placement {
        self.controller.placement()
    }
}

/// What [`FloatContent`](crate::FloatContent) needs from its root.
#[derive(Clone, Debug)]
pub struct FloatingContext {
    controller: FloatController,
}

impl FloatingContext {
    /// The root's controller.
    pub fn controller(&self) -> &FloatController {
        &self.controller
    }

    /// The root's resolved placement.
    pub fn placement(&self) -> Placement {
        self.controller.placement()
    }
}

/// What [`FloatArrow`](crate::FloatArrow) needs from its root.
#[derive(Clone, Debug)]
pub struct ArrowContext {
    controller: FloatController,
}

impl ArrowContext {
    /// The root's controller.
    pub fn controller(&self) -> &FloatController {
        &self.controller
    }

    /// The root's resolved placement.
    pub fn placement(&self) -> Placement {
        self.controller.placement()
    }
}

/// The contexts visible at some point of a component tree.
#[derive(Clone, Debug, Default)]
pub struct ContextScope {
    reference: Option<ReferenceContext>,
    floating: Option<FloatingContext>,
    arrow: Option<ArrowContext>,
}

impl ContextScope {
    /// The empty scope outside any [`Float`](crate::Float).
    pub fn root() -> Self {
        Self::default()
    }

    /// The scope inside a root driven by `controller`.
    pub(crate) fn provided_by(controller: &FloatController) -> Self {
        let arrow = Some(ArrowContext {
            controller: controller.clone(),
        });
        if !controller.with_props(FloatProps::is_composable) {
            return Self {
                arrow,
                ..Self::default()
            };
        }
        Self {
            reference: Some(ReferenceContext {
                controller: controller.clone(),
            }),
            floating: Some(FloatingContext {
                controller: controller.clone(),
            }),
            arrow,
        }
    }

    /// The reference context.
    pub fn reference(&self) -> Result<&ReferenceContext, FloatError> {
        self.reference.as_ref().ok_or(FloatError::MissingContext {
            component: "FloatReference",
        })
    }

    /// The floating context.
    pub fn floating(&self) -> Result<&FloatingContext, FloatError> {
        self.floating.as_ref().ok_or(FloatError::MissingContext {
            component: "FloatContent",
        })
    }

    /// The arrow context.
    pub fn arrow(&self) -> Result<&ArrowContext, FloatError> {
        self.arrow.as_ref().ok_or(FloatError::MissingContext {
            component: "FloatArrow",
        })
    }

    /// Whether this scope lies inside a root.
    pub fn is_provided(&self) -> bool {
        self.arrow.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;
    use alloc::string::ToString;
    use kurbo::Size;

    #[test]
    fn empty_scope_names_the_component() {
        let scope = ContextScope::root();
        assert!(!scope.is_provided());
        let err = scope.arrow().unwrap_err();
        assert_eq!(
            err.to_string(),
            "<FloatArrow /> must be in the <Float /> component."
        );
        assert!(matches!(
            scope.reference(),
            Err(FloatError::MissingContext {
                component: "FloatReference"
            })
        ));
        assert!(matches!(
            scope.floating(),
            Err(FloatError::MissingContext {
                component: "FloatContent"
            })
        ));
    }

    #[test]
    fn provided_scope_reflects_root_placement() {
        let host = Host::new(Size::new(100.0, 100.0));
        let controller = FloatController::new(
            &host,
            FloatProps {
                placement: Placement::LeftEnd,
                composable: true,
                ..FloatProps::default()
            },
        );
        let scope = ContextScope::provided_by(&controller);
        assert!(scope.is_provided());
        assert_eq!(scope.reference().unwrap().placement(), Placement::LeftEnd);
        assert_eq!(scope.floating().unwrap().placement(), Placement::LeftEnd);
        assert_eq!(scope.arrow().unwrap().placement(), Placement::LeftEnd);
    }

    #[test]
    fn implicit_root_provides_only_the_arrow() {
        let host = Host::new(Size::new(100.0, 100.0));
        let controller = FloatController::new(&host, FloatProps::default());
        let scope = ContextScope::provided_by(&controller);
        assert!(scope.is_provided());
        assert!(scope.arrow().is_ok());
        assert_eq!(
            scope.reference().unwrap_err(),
            FloatError::MissingContext {
                component: "FloatReference"
            }
        );
        assert_eq!(
            scope.floating().unwrap_err(),
            FloatError::MissingContext {
                component: "FloatContent"
            }
        );
    }

    #[test]
    fn dialog_root_provides_every_part() {
        let host = Host::new(Size::new(100.0, 100.0));
        let controller = FloatController::new(
            &host,
            FloatProps {
                dialog: true,
                ..FloatProps::default()
            },
        );
        let scope = ContextScope::provided_by(&controller);
        assert!(scope.reference().is_ok());
        assert!(scope.floating().is_ok());
    }
}
