//! # linea-ir
//!
//! The Linea object model and live scene state: drawable objects, the
//! scene graph of visible objects, trackers and parametric bindings, and the
//! declarative script (steps on a timeline) that the animation runner plays.

pub mod axes;
pub mod binding;
pub mod builder;
pub mod object;
pub mod scene_graph;
pub mod script;
pub mod step;
pub mod timeline;
pub mod tracker;
pub mod transition;
pub mod typeset;
pub mod validate;

pub use axes::{Axes, AxesObjects, AxisRange, Plot};
pub use binding::{Binding, BindingRegistry};
pub use builder::ScriptBuilder;
pub use object::{DrawableObject, Shape, Style};
pub use scene_graph::{Presence, SceneEntry, SceneGraph};
pub use script::Script;
pub use step::AnimationStep;
pub use timeline::Timeline;
pub use tracker::{Tracker, TrackerTable};
pub use transition::{StyleProperty, TransformMode, Transition};
pub use typeset::{GlyphExtent, MonospaceTypesetter, Typesetter};
