use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};
use thiserror::Error;

use crate::chat::client::GenerationClient;
use crate::chat::prompt::{OutputMode, compile};
use crate::chat::schema::RESUME_SCHEMA;
use crate::chat::validator::validate;
use crate::errors::PipelineError;
use crate::models::document::Generated;
use crate::models::form::FieldModel;

/// Proof that a submission was started; carries its sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
}

impl Ticket {
    pub fn seq(self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a resume is already being generated")]
    InFlight,

    #[error("please fill in: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
}

#[derive(Debug)]
pub enum Completion {
    /// The result belongs to the current request and now sits in the session.
    Accepted,
    /// Generation failed; the form is untouched and can be resubmitted.
    Rejected(PipelineError),
    /// The session was reset (or moved on) while this request was out.
    Stale,
}

/// Owns the form and the current document, and lets at most one generation
/// request be outstanding.
#[derive(Debug, Default)]
pub struct Session {
    form: FieldModel,
    generated: Option<Generated>,
    in_flight: Option<u64>,
    last_seq: u64,
}

impl Session {
    pub fn new(form: FieldModel) -> Self {
        Self {
            form,
            ..Default::default()
        }
    }

    pub fn form(&self) -> &FieldModel {
        &self.form
    }

    /// Editing is only possible while no request is outstanding.
    pub fn form_mut(&mut self) -> Option<&mut FieldModel> {
        match self.in_flight {
            Some(_) => None,
            None => Some(&mut self.form),
        }
    }

    pub fn generated(&self) -> Option<&Generated> {
        self.generated.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn begin_submission(&mut self) -> Result<(Ticket, FieldModel), SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::InFlight);
        }
        let missing = self.form.missing_required();
        if !missing.is_empty() {
            return Err(SessionError::Incomplete(missing));
        }

        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        debug!("submission {} started", self.last_seq);

        Ok((Ticket { seq: self.last_seq }, self.form.clone()))
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<Generated, PipelineError>,
    ) -> Completion {
        if self.in_flight != Some(ticket.seq) {
            debug!("discarding stale response for submission {}", ticket.seq);
            return Completion::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(generated) => {
                self.generated = Some(generated);
                Completion::Accepted
            }
            Err(e) => {
                warn!("submission {} failed: {}", ticket.seq, e.kind());
                Completion::Rejected(e)
            }
        }
    }

    /// Drops the document and any outstanding request and starts from a blank
    /// form. Sequence numbers keep counting so late responses stay stale.
    pub fn start_over(&mut self) {
        info!("starting over");
        self.form = FieldModel::default();
        self.generated = None;
        self.in_flight = None;
    }
}

/// Compile, call the service once, validate. Only the service call awaits.
pub async fn generate<C: GenerationClient>(
    client: &C,
    form: &FieldModel,
    mode: OutputMode,
) -> Result<Generated, PipelineError> {
    let prompt = compile(form, mode);
    let raw = client.generate(&prompt).await?;
    Ok(validate(&raw, &RESUME_SCHEMA, mode)?)
}

/// Runs one submission against a shared session. The lock is never held
/// across the service call.
pub async fn submit<C: GenerationClient>(
    session: &Mutex<Session>,
    client: &C,
    mode: OutputMode,
) -> Result<Completion, SessionError> {
    let (ticket, form) = session
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .begin_submission()?;

    let result = generate(client, &form, mode).await;

    Ok(session
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .complete(ticket, result))
}
