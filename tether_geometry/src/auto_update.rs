// Copyright 2025 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options for continuous position updates while a floating element is shown.

/// Which layout changes re-trigger a computation while subscribed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoUpdateOptions {
    /// Scrolling of any ancestor of either element.
    pub ancestor_scroll: bool,
    /// Resizing of the viewport or an ancestor.
    pub ancestor_resize: bool,
    /// Resizing of the reference or floating element itself.
    pub element_resize: bool,
    /// The reference moving without a resize (layout shift).
    pub layout_shift: bool,
    /// Poll on every animation frame.
    pub animation_frame: bool,
}

impl Default for AutoUpdateOptions {
    fn default() -> Self {
        Self {
            ancestor_scroll: true,
            ancestor_resize: true,
            element_resize: true,
            layout_shift: true,
            animation_frame: false,
        }
    }
}

/// Why an auto-update subscription is being notified.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UpdateCause {
    /// An ancestor scrolled.
    AncestorScroll,
    /// The viewport or an ancestor resized.
    AncestorResize,
    /// The reference or floating element resized.
    ElementResize,
    /// The reference moved.
    LayoutShift,
    /// An animation frame elapsed.
    AnimationFrame,
}

impl AutoUpdateOptions {
    /// Whether a subscription with these options listens for `cause`.
    #[must_use]
    pub const fn accepts(&self, cause: UpdateCause) -> bool {
        match cause {
            UpdateCause::AncestorScroll => self.ancestor_scroll,
            UpdateCause::AncestorResize => self.ancestor_resize,
            UpdateCause::ElementResize => self.element_resize,
            UpdateCause::LayoutShift => self.layout_shift,
            UpdateCause::AnimationFrame => self.animation_frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listens_to_everything_but_frames() {
        let o = AutoUpdateOptions::default();
        assert!(o.accepts(UpdateCause::AncestorScroll));
        assert!(o.accepts(UpdateCause::ElementResize));
        assert!(!o.accepts(UpdateCause::AnimationFrame));
    }
}
