//! Contact: form and info slides, input focus feedback, and a simulated
//! submission that pulses the form and clears it on success.

use folio_motion_core::{
    Config, Easing, Property, Scope, StepSpec, Surface, TimelineBuilder, TimelineId, TimerId,
    Value,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reveal::{reveal, scroll_trigger};
use crate::Section;

pub const FORM: &str = "contact/form";
pub const INFO: &str = "contact/info";

/// Simulated network round trip.
pub const SUBMIT_DELAY_MS: u64 = 2_000;
pub const FOCUS_SCALE: f32 = 1.02;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("name is required")]
    MissingName,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("message is required")]
    MissingMessage,
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("contact section is not mounted")]
    NotMounted,
}

fn is_email_shaped(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        if !is_email_shaped(self.email.trim()) {
            return Err(FormError::InvalidEmail(self.email.clone()));
        }
        if self.message.trim().is_empty() {
            return Err(FormError::MissingMessage);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting {
        timer: TimerId,
    },
}

#[derive(Debug, Default)]
pub struct ContactSection {
    scope: Option<Scope>,
    form: ContactForm,
    state: SubmitState,
    inputs: Vec<(String, TimelineId)>,
    pulse: Option<TimelineId>,
    delivered: Vec<ContactForm>,
}

impl ContactSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Forms that completed the simulated submission, oldest first.
    pub fn delivered(&self) -> &[ContactForm] {
        &self.delivered
    }

    pub fn pulse(&self) -> Option<TimelineId> {
        self.pulse
    }

    pub fn focus(&mut self, input: &str, surface: &dyn Surface) -> Result<()> {
        self.scale_input(input, FOCUS_SCALE, surface)
    }

    pub fn blur(&mut self, input: &str, surface: &dyn Surface) -> Result<()> {
        self.scale_input(input, 1.0, surface)
    }

    /// Tween `input` toward `scale`, starting from wherever its previous
    /// focus tween left it.
    fn scale_input(&mut self, input: &str, scale: f32, surface: &dyn Surface) -> Result<()> {
        let Some(scope) = self.scope.as_mut() else {
            return Ok(());
        };
        let mut from = Value::num(1.0);
        if let Some(pos) = self.inputs.iter().position(|(t, _)| t == input) {
            let (_, prev) = self.inputs.swap_remove(pos);
            if let Some(v) = scope
                .timeline(prev)
                .and_then(|tl| tl.current_value(input, &Property::Scale))
            {
                from = v;
            }
            scope.kill_timeline(prev);
        }
        let tl = TimelineBuilder::new(input)
            .step(
                StepSpec::new(input)
                    .animate(Property::Scale, from, Value::num(scale))
                    .duration(0.3)
                    .ease(Easing::PowerOut(2)),
            )
            .build(surface)?;
        let id = scope.add_timeline(tl, surface);
        scope.play(id);
        self.inputs.push((input.to_string(), id));
        Ok(())
    }

    /// Validate and start the simulated submission. Invalid forms are
    /// rejected before anything is scheduled.
    pub fn submit(&mut self) -> std::result::Result<TimerId, FormError> {
        if let SubmitState::Submitting { .. } = self.state {
            return Err(FormError::AlreadySubmitting);
        }
        self.form.validate()?;
        let scope = self.scope.as_mut().ok_or(FormError::NotMounted)?;
        let timer = scope.schedule_once(SUBMIT_DELAY_MS);
        self.state = SubmitState::Submitting { timer };
        debug!("contact submission scheduled");
        Ok(timer)
    }

    fn finish_submission(&mut self, surface: &dyn Surface) -> Result<()> {
        self.state = SubmitState::Idle;
        self.delivered.push(std::mem::take(&mut self.form));
        let Some(scope) = self.scope.as_mut() else {
            return Ok(());
        };
        if let Some(prev) = self.pulse.take() {
            scope.kill_timeline(prev);
        }
        let tl = TimelineBuilder::new("contact-success")
            .repeat(1)
            .yoyo(true)
            .step(
                StepSpec::new(FORM)
                    .animate(Property::Scale, Value::num(1.0), Value::num(0.95))
                    .duration(0.2)
                    .ease(Easing::PowerInOut(2)),
            )
            .build(surface)?;
        let id = scope.add_timeline(tl, surface);
        scope.play(id);
        self.pulse = Some(id);
        Ok(())
    }
}

impl Section for ContactSection {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn mount(&mut self, surface: &dyn Surface, config: &Config) -> Result<()> {
        self.unmount();
        let mut scope = Scope::new(self.name(), config.clone());
        let slide = Easing::PowerOut(2);
        reveal(
            &mut scope,
            surface,
            FORM,
            &[
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::X, Value::px(-100.0), Value::px(0.0)),
                (Property::Blur, Value::px(10.0), Value::px(0.0)),
            ],
            1.2,
            slide,
            scroll_trigger(FORM, "top 80%", None)?,
        )?;
        reveal(
            &mut scope,
            surface,
            INFO,
            &[
                (Property::Opacity, Value::num(0.0), Value::num(1.0)),
                (Property::X, Value::px(100.0), Value::px(0.0)),
                (Property::Blur, Value::px(10.0), Value::px(0.0)),
            ],
            1.2,
            slide,
            scroll_trigger(INFO, "top 80%", None)?,
        )?;
        self.scope = Some(scope);
        Ok(())
    }

    fn update(&mut self, dt_ms: u64, surface: &dyn Surface) {
        let Some(scope) = self.scope.as_mut() else {
            return;
        };
        scope.update(dt_ms, surface);
        if let SubmitState::Submitting { timer } = self.state {
            if !scope.is_timer_pending(timer) {
                if let Err(err) = self.finish_submission(surface) {
                    trace!("contact success pulse skipped: {err}");
                }
            }
        }
    }

    fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    fn scope_mut(&mut self) -> Option<&mut Scope> {
        self.scope.as_mut()
    }

    fn take_scope(&mut self) -> Option<Scope> {
        self.state = SubmitState::Idle;
        self.inputs.clear();
        self.pulse = None;
        self.scope.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_email_shaped("ada@example.com"));
        assert!(!is_email_shaped("ada@example"));
        assert!(!is_email_shaped("@example.com"));
        assert!(!is_email_shaped("ada@@example.com"));
        assert!(!is_email_shaped("ada @example.com"));
        assert!(!is_email_shaped("ada@example.com."));
    }

    #[test]
    fn validation_order() {
        assert_eq!(
            ContactForm::new("", "x", "").validate(),
            Err(FormError::MissingName)
        );
        assert_eq!(
            ContactForm::new("Ada", "nope", "").validate(),
            Err(FormError::InvalidEmail("nope".into()))
        );
        assert_eq!(
            ContactForm::new("Ada", "ada@example.com", " ").validate(),
            Err(FormError::MissingMessage)
        );
        assert!(ContactForm::new("Ada", "ada@example.com", "hi").validate().is_ok());
    }
}
