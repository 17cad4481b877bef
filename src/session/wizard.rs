use thiserror::Error;

use crate::models::form::{FieldModel, Input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PersonalInfo,
    Experience,
    Customization,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::PersonalInfo,
        Step::Experience,
        Step::Customization,
        Step::Review,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal Info",
            Step::Experience => "Experience",
            Step::Customization => "Customization",
            Step::Review => "Review",
        }
    }

    /// 1-based position, for progress display.
    pub fn number(self) -> usize {
        Step::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    /// Free-text inputs collected on this step.
    pub fn inputs(self) -> &'static [Input] {
        match self {
            Step::PersonalInfo => &[
                Input::FullName,
                Input::Email,
                Input::Phone,
                Input::Location,
                Input::Linkedin,
                Input::Website,
            ],
            Step::Experience => &[
                Input::JobTitle,
                Input::YearsOfExperience,
                Input::KeySkills,
                Input::PreviousRoles,
                Input::Education,
            ],
            Step::Customization | Step::Review => &[],
        }
    }

    fn next(self) -> Option<Step> {
        Step::ALL.get(self.number()).copied()
    }

    fn previous(self) -> Option<Step> {
        self.number().checked_sub(2).map(|i| Step::ALL[i])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("please fill in: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("already at the last step")]
    AtEnd,

    #[error("already at the first step")]
    AtStart,

    #[error("the form can only be submitted from the review step")]
    NotReviewing,
}

/// Four-step form. Moves one step at a time; moving forward needs the
/// current step's required inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: Step,
    form: FieldModel,
}

impl Wizard {
    pub fn new(form: FieldModel) -> Self {
        Self {
            step: Step::PersonalInfo,
            form,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &FieldModel {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FieldModel {
        &mut self.form
    }

    pub fn blocking_inputs(&self) -> Vec<&'static str> {
        self.form.blank_required(self.step.inputs())
    }

    pub fn advance(&mut self) -> Result<Step, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtEnd)?;
        let blocking = self.blocking_inputs();
        if !blocking.is_empty() {
            return Err(WizardError::Incomplete(blocking));
        }
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<Step, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtStart)?;
        self.step = previous;
        Ok(previous)
    }

    /// Hands out the finished form. Only allowed on the review step, and only
    /// when nothing required is blank.
    pub fn submit(&self) -> Result<&FieldModel, WizardError> {
        if self.step != Step::Review {
            return Err(WizardError::NotReviewing);
        }
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            return Err(WizardError::Incomplete(missing));
        }
        Ok(&self.form)
    }

    pub fn reset(&mut self) {
        *self = Self::new(FieldModel::default());
    }
}
