//! DOM-backed submission form located by element ID.

use push_host::{FormFieldIds, SubmissionForm};

use crate::bridge;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Submission form whose controls are looked up by ID on every write.
pub struct DomSubmissionForm {
    ids: FormFieldIds,
}

impl DomSubmissionForm {
    /// Binds the form to the given element IDs.
    pub fn new(ids: FormFieldIds) -> Self {
        Self { ids }
    }
}

impl SubmissionForm for DomSubmissionForm {
    fn set_subscription(&self, value: &str) -> Result<(), String> {
        bridge::set_input_value(&self.ids.subscription, value)
    }

    fn set_submit_enabled(&self, enabled: bool) -> Result<(), String> {
        bridge::set_button_disabled(&self.ids.add, !enabled)
    }

    fn set_magnets(&self, text: &str) -> Result<(), String> {
        bridge::set_text_area_value(&self.ids.magnets, text)
    }

    fn trigger_submit(&self) -> Result<(), String> {
        bridge::click_element(&self.ids.add)
    }
}
