//! Interface capabilities injected into the pipeline.
//!
//! The pipeline never looks interface elements up by itself. Whoever owns the
//! form hands it four narrow capabilities instead:
//!
//! - [`FieldAccess`] reads the current values and resets them
//! - [`TriggerControl`] disables and restores the submit trigger
//! - [`FieldErrorView`] shows or clears one field's error
//! - [`BannerView`] shows or clears the single form-level banner
//!
//! [`MemoryForm`] implements all four in memory. It backs headless use and
//! the tests, and records every call as a [`SurfaceEvent`] so ordering can be
//! asserted.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use contact_rs_forms::{FieldName, FieldSet};

/// Label of the trigger when nothing is in flight.
pub const DEFAULT_TRIGGER_LABEL: &str = "Send Message";

/// How many [`SurfaceEvent`]s a [`MemoryForm`] keeps; older ones are dropped.
pub const EVENT_LOG_CAPACITY: usize = 1_024;

/// Style of the form-level banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    /// The submission was accepted.
    Success,
    /// The submission failed.
    Error,
}

impl BannerKind {
    /// Returns the CSS tag class for this kind.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for BannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A banner as currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    /// The banner style.
    pub kind: BannerKind,
    /// The banner text.
    pub message: String,
}

/// Read and reset access to the form values.
pub trait FieldAccess: Send + Sync {
    /// Returns the values as currently entered.
    fn read(&self) -> FieldSet;

    /// Empties every input.
    fn reset(&self);
}

/// Control over the submit trigger.
///
/// The trigger remembers its own resting label; [`restore`](Self::restore)
/// brings it back.
pub trait TriggerControl: Send + Sync {
    /// Disables the trigger and shows `busy_label` on it.
    fn disable(&self, busy_label: &str);

    /// Re-enables the trigger with its original label.
    fn restore(&self);
}

/// Per-field error display.
pub trait FieldErrorView: Send + Sync {
    /// Highlights `field` and shows `message` next to it.
    fn show_error(&self, field: FieldName, message: &str);

    /// Removes any highlight and message from `field`.
    fn clear_error(&self, field: FieldName);
}

/// The single form-level outcome banner.
pub trait BannerView: Send + Sync {
    /// Shows `message` styled as `kind`, replacing any current banner.
    fn show(&self, kind: BannerKind, message: &str);

    /// Hides the banner.
    fn clear(&self);
}

/// One call made against a [`MemoryForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// [`FieldAccess::read`] was called.
    FieldsRead,
    /// [`FieldAccess::reset`] was called.
    FieldsReset,
    /// [`TriggerControl::disable`] was called.
    TriggerDisabled,
    /// [`TriggerControl::restore`] was called.
    TriggerRestored,
    /// [`FieldErrorView::show_error`] was called for this field.
    FieldErrorShown(FieldName),
    /// [`FieldErrorView::clear_error`] was called for this field.
    FieldErrorCleared(FieldName),
    /// [`BannerView::show`] was called with this kind.
    BannerShown(BannerKind),
    /// [`BannerView::clear`] was called.
    BannerCleared,
}

#[derive(Debug)]
struct MemoryFormState {
    fields: FieldSet,
    trigger_enabled: bool,
    trigger_label: String,
    resting_label: String,
    field_errors: BTreeMap<FieldName, String>,
    banner: Option<Banner>,
    events: VecDeque<SurfaceEvent>,
}

impl MemoryFormState {
    fn record(&mut self, event: SurfaceEvent) {
        if self.events.len() == EVENT_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// An in-memory contact form implementing every capability.
///
/// Cloning shares the same underlying form, so a clone can be handed to the
/// pipeline while the original is used for inspection. The call log keeps
/// the most recent [`EVENT_LOG_CAPACITY`] events, so a long-lived headless
/// form does not grow without bound.
///
/// # Examples
///
/// ```
/// use contact_rs_forms::FieldName;
/// use contact_rs_submit::surface::{FieldAccess, MemoryForm, TriggerControl};
///
/// let form = MemoryForm::new();
/// form.set_field(FieldName::Name, "Ada");
/// assert_eq!(form.read().name, "Ada");
///
/// form.disable("Sending...");
/// assert!(!form.trigger_enabled());
/// form.restore();
/// assert_eq!(form.trigger_label(), "Send Message");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryForm {
    state: Arc<Mutex<MemoryFormState>>,
}

impl Default for MemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryForm {
    /// Creates an empty form whose trigger reads "Send Message".
    pub fn new() -> Self {
        Self::with_trigger_label(DEFAULT_TRIGGER_LABEL)
    }

    /// Creates an empty form with a custom resting trigger label.
    pub fn with_trigger_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            state: Arc::new(Mutex::new(MemoryFormState {
                fields: FieldSet::default(),
                trigger_enabled: true,
                trigger_label: label.clone(),
                resting_label: label,
                field_errors: BTreeMap::new(),
                banner: None,
                events: VecDeque::new(),
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryFormState> {
        self.state.lock().expect("MemoryForm lock poisoned")
    }

    /// Types `value` into `field`, as the user would.
    pub fn set_field(&self, field: FieldName, value: impl Into<String>) {
        self.lock().fields.set(field, value);
    }

    /// Replaces every value at once.
    pub fn fill(&self, fields: FieldSet) {
        self.lock().fields = fields;
    }

    /// Returns the current values without recording a read.
    pub fn fields(&self) -> FieldSet {
        self.lock().fields.clone()
    }

    /// Returns `true` if the trigger accepts clicks.
    pub fn trigger_enabled(&self) -> bool {
        self.lock().trigger_enabled
    }

    /// Returns the label currently shown on the trigger.
    pub fn trigger_label(&self) -> String {
        self.lock().trigger_label.clone()
    }

    /// Returns the error currently shown for `field`.
    pub fn field_error(&self, field: FieldName) -> Option<String> {
        self.lock().field_errors.get(&field).cloned()
    }

    /// Returns every field currently showing an error.
    pub fn fields_with_errors(&self) -> Vec<FieldName> {
        self.lock().field_errors.keys().copied().collect()
    }

    /// Returns the banner currently shown.
    pub fn banner(&self) -> Option<Banner> {
        self.lock().banner.clone()
    }

    /// Returns every recorded call, oldest first.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.lock().events.iter().cloned().collect()
    }

    /// Returns and forgets every recorded call.
    pub fn take_events(&self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.lock().events).into()
    }
}

impl FieldAccess for MemoryForm {
    fn read(&self) -> FieldSet {
        let mut state = self.lock();
        state.record(SurfaceEvent::FieldsRead);
        state.fields.clone()
    }

    fn reset(&self) {
        let mut state = self.lock();
        state.fields.clear();
        state.record(SurfaceEvent::FieldsReset);
    }
}

impl TriggerControl for MemoryForm {
    fn disable(&self, busy_label: &str) {
        let mut state = self.lock();
        state.trigger_enabled = false;
        state.trigger_label = busy_label.to_string();
        state.record(SurfaceEvent::TriggerDisabled);
    }

    fn restore(&self) {
        let mut state = self.lock();
        state.trigger_enabled = true;
        state.trigger_label = state.resting_label.clone();
        state.record(SurfaceEvent::TriggerRestored);
    }
}

impl FieldErrorView for MemoryForm {
    fn show_error(&self, field: FieldName, message: &str) {
        let mut state = self.lock();
        state.field_errors.insert(field, message.to_string());
        state.record(SurfaceEvent::FieldErrorShown(field));
    }

    fn clear_error(&self, field: FieldName) {
        let mut state = self.lock();
        state.field_errors.remove(&field);
        state.record(SurfaceEvent::FieldErrorCleared(field));
    }
}

impl BannerView for MemoryForm {
    fn show(&self, kind: BannerKind, message: &str) {
        let mut state = self.lock();
        state.banner = Some(Banner {
            kind,
            message: message.to_string(),
        });
        state.record(SurfaceEvent::BannerShown(kind));
    }

    fn clear(&self) {
        let mut state = self.lock();
        state.banner = None;
        state.record(SurfaceEvent::BannerCleared);
    }
}
