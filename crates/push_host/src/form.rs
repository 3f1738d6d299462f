//! Submission form binding contracts.

use std::{cell::RefCell, rc::Rc};

/// Page form controls the bootstrap writes to.
pub trait SubmissionForm {
    /// Writes the serialized subscription (or an empty value) into the subscription field.
    fn set_subscription(&self, value: &str) -> Result<(), String>;

    /// Sets whether the submit control accepts clicks.
    fn set_submit_enabled(&self, enabled: bool) -> Result<(), String>;

    /// Replaces the magnet text area contents.
    fn set_magnets(&self, text: &str) -> Result<(), String>;

    /// Programmatically activates the submit control.
    fn trigger_submit(&self) -> Result<(), String>;
}

/// One observed form mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Subscription field written.
    Subscription(String),
    /// Submit control enabled or disabled.
    SubmitEnabled(bool),
    /// Magnet text area written.
    Magnets(String),
    /// Submit control triggered.
    Submitted,
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op form for pages without the submission controls.
pub struct NoopSubmissionForm;

impl SubmissionForm for NoopSubmissionForm {
    fn set_subscription(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }

    fn set_submit_enabled(&self, _enabled: bool) -> Result<(), String> {
        Ok(())
    }

    fn set_magnets(&self, _text: &str) -> Result<(), String> {
        Ok(())
    }

    fn trigger_submit(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// In-memory form recording every mutation in order.
///
/// The submit control starts disabled, matching the page markup; triggering a disabled control is
/// recorded as an error rather than a submission.
pub struct MemorySubmissionForm {
    events: Rc<RefCell<Vec<FormEvent>>>,
    submit_enabled: Rc<RefCell<bool>>,
}

impl Default for MemorySubmissionForm {
    fn default() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            submit_enabled: Rc::new(RefCell::new(false)),
        }
    }
}

impl MemorySubmissionForm {
    /// Mutations observed so far.
    pub fn events(&self) -> Vec<FormEvent> {
        self.events.borrow().clone()
    }

    /// Whether the submit control is currently enabled.
    pub fn submit_enabled(&self) -> bool {
        *self.submit_enabled.borrow()
    }

    /// Last value written to the subscription field.
    pub fn subscription(&self) -> Option<String> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            FormEvent::Subscription(value) => Some(value.clone()),
            _ => None,
        })
    }

    /// Last value written to the magnet text area.
    pub fn magnets(&self) -> Option<String> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            FormEvent::Magnets(text) => Some(text.clone()),
            _ => None,
        })
    }

    fn record(&self, event: FormEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl SubmissionForm for MemorySubmissionForm {
    fn set_subscription(&self, value: &str) -> Result<(), String> {
        self.record(FormEvent::Subscription(value.to_string()));
        Ok(())
    }

    fn set_submit_enabled(&self, enabled: bool) -> Result<(), String> {
        *self.submit_enabled.borrow_mut() = enabled;
        self.record(FormEvent::SubmitEnabled(enabled));
        Ok(())
    }

    fn set_magnets(&self, text: &str) -> Result<(), String> {
        self.record(FormEvent::Magnets(text.to_string()));
        Ok(())
    }

    fn trigger_submit(&self) -> Result<(), String> {
        if !self.submit_enabled() {
            return Err("submit control is disabled".to_string());
        }
        self.record(FormEvent::Submitted);
        Ok(())
    }
}
