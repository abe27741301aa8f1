//! Gradient handle drag/merge engine.
//!
//! This crate maintains the set of draggable control points ("draggers") for
//! the gradients of a selection of document items, and implements the
//! interactive behavior around them: coincident points merge into shared
//! handles and split apart again, pointer moves propagate through the
//! dependency rules of linear and radial gradient geometry, and every gesture
//! resolves into exactly one commit for the host's undo stack.
//!
//! The engine is purely in-process and single-threaded: it never renders and
//! never talks to the outside world. The host wires selection and document
//! notifications into [`session::DragSession`] and processes the returned
//! [`session::Action`]s (persist, render, undo).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | [`session::DragSession`]: the dragger arena and move pipeline |
//! | [`dragger`] | One handle and the draggables bound to it |
//! | [`draggable`] | Semantic point bindings and the pairwise merge rule |
//! | [`doc`] | Items, gradient paints, stops, and the coordinate interface |
//! | [`snap`] | Level snapping, angle constraint, and the host snap trait |
//! | [`geom`] | Point math and the zoom mapping for pixel thresholds |
//! | [`input`] | Modifier keys and the gesture state machine |
//! | [`consts`] | Shared numeric constants (merge/snap distances, defaults) |

pub mod consts;
pub mod doc;
pub mod draggable;
pub mod dragger;
pub mod geom;
pub mod input;
pub mod session;
pub mod snap;
