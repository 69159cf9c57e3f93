#![deny(unsafe_code)]

//! Constraint resolution and cascade for the building configurator.
//!
//! [`resolve_admissible`] computes which catalog entries are valid under the
//! current drivers. [`CascadeController`] owns the [`SelectionState`] and keeps
//! every stored selection inside those admissible sets as drivers change.

pub mod cascade;
pub mod error;
pub mod options;
pub mod persistence;
pub mod resolver;
pub mod state;
pub mod submission;
pub mod widget;

pub use crate::cascade::{CascadeController, CatalogState};
pub use crate::error::{EngineError, ResolveError, Result};
pub use crate::options::{DimensionFallback, EngineOptions, SkylightOverride};
pub use crate::persistence::{SELECTION_RECORD_VERSION, SelectionRecord};
pub use crate::resolver::{Admissible, resolve_admissible, size_class_of};
pub use crate::state::{SelectionSnapshot, SelectionState, Subscriber, SubscriptionId};
pub use crate::submission::SubmissionRecord;
pub use crate::widget::{
    QuantityWidget, SelectionWidget, SingleChoiceWidget, WidgetChange, WidgetEvent, WidgetListener,
};
