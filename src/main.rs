mod chat;
mod errors;
mod export;
mod models;
mod render;
mod session;
mod utils;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Result, eyre};
use log::{debug, info, warn};

use crate::chat::client::{GeminiClient, GenerationClient, ReplayClient};
use crate::chat::prompt::{OutputMode, compile};
use crate::errors::PipelineError;
use crate::export::{ExportFormat, Exportable, export_to_file};
use crate::models::document::Generated;
use crate::models::form::FieldModel;
use crate::render::render;
use crate::session::submission::{Completion, Session, submit};
use crate::utils::cli::Args;
use crate::utils::config::{Config, config};
use crate::utils::log::Logger;
use crate::utils::wizard::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    Logger::init(args.verbosity);

    info!(
        "starting resume-forge {}",
        format!("v{}", env!("CARGO_PKG_VERSION")).magenta()
    );

    let config: Config = config(args.config.clone())?;
    let mode = args.mode.unwrap_or(config.output.mode);
    let format = args.format.unwrap_or(config.output.format);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(format));

    let mut terminal = Terminal::stdio();
    let form = match &args.form {
        Some(path) => load_form(path).await?,
        None => terminal.run_wizard(FieldModel::default())?,
    };

    if args.print_prompt {
        println!("{}", compile(&form, mode).text);
        return Ok(());
    }

    let interactive = args.form.is_none().then_some(&mut terminal);
    let run = Run {
        session: Mutex::new(Session::new(form)),
        mode,
        format,
        output,
        pdf_timeout: Duration::from_secs(config.output.pdf_timeout_secs),
    };

    match &args.response {
        Some(path) => run.drive(&ReplayClient::new(path.clone()), interactive).await,
        None => {
            let client = GeminiClient::new(&config.llm)
                .map_err(|e| eyre!(PipelineError::from(e).user_message()))?;
            run.drive(&client, interactive).await
        }
    }
}

fn default_output(format: ExportFormat) -> PathBuf {
    match format {
        ExportFormat::Pdf => PathBuf::from("resume.pdf"),
        ExportFormat::Html => PathBuf::from("resume.html"),
    }
}

async fn load_form(path: &Path) -> Result<FieldModel> {
    info!("reading form from {}", path.display());
    let contents = tokio::fs::read_to_string(path).await?;
    let form: FieldModel = toml::from_str(&contents)?;
    debug!("form has {} blank required inputs", form.missing_required().len());
    Ok(form)
}

struct Run {
    session: Mutex<Session>,
    mode: OutputMode,
    format: ExportFormat,
    output: PathBuf,
    pdf_timeout: Duration,
}

impl Run {
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generates and exports. With a terminal attached, failures offer a retry
    /// or an edit of the kept form, and a finished resume can be followed by
    /// another one.
    async fn drive<C, R, W>(
        &self,
        client: &C,
        mut terminal: Option<&mut Terminal<R, W>>,
    ) -> Result<()>
    where
        C: GenerationClient,
        R: BufRead,
        W: Write,
    {
        loop {
            if !self.generate(client, terminal.as_deref_mut()).await? {
                return Ok(());
            }
            self.export(terminal.as_deref_mut()).await?;

            let Some(terminal) = terminal.as_deref_mut() else {
                return Ok(());
            };
            if !terminal.confirm("Build another resume?")? {
                return Ok(());
            }
            self.session().start_over();
            let form = terminal.run_wizard(FieldModel::default())?;
            self.replace_form(form)?;
        }
    }

    /// Returns `false` when the user gave up after a failure.
    async fn generate<C, R, W>(
        &self,
        client: &C,
        mut terminal: Option<&mut Terminal<R, W>>,
    ) -> Result<bool>
    where
        C: GenerationClient,
        R: BufRead,
        W: Write,
    {
        loop {
            println!("{}", "Generating your resume...".cyan());

            match submit(&self.session, client, self.mode).await? {
                Completion::Accepted => {
                    info!("resume generated");
                    return Ok(true);
                }
                Completion::Stale => {
                    warn!("generation result was discarded");
                    return Err(eyre!("the session was reset while generating"));
                }
                Completion::Rejected(e) => {
                    println!("{}", e.user_message().red());
                    let Some(terminal) = terminal.as_deref_mut() else {
                        return Err(eyre!("resume generation failed ({})", e.kind()));
                    };

                    if terminal.confirm("Edit your details before trying again?")? {
                        let form = self.session().form().clone();
                        let form = terminal.run_wizard(form)?;
                        self.replace_form(form)?;
                    } else if !terminal.confirm("Try again with the same details?")? {
                        return Ok(false);
                    }
                }
            }
        }
    }

    async fn export<R, W>(&self, mut terminal: Option<&mut Terminal<R, W>>) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let generated = self
            .session()
            .generated()
            .cloned()
            .ok_or_else(|| eyre!("no resume has been generated"))?;

        let tree;
        let item = match &generated {
            Generated::Structured(document) => {
                tree = render(document);
                debug!("rendered sections: {:?}", tree.section_titles());
                Exportable::Tree(&tree)
            }
            Generated::Markup(markup) => Exportable::Markup(markup),
        };

        loop {
            match export_to_file(self.format, item, &self.output, self.pdf_timeout).await {
                Ok(_) => {
                    println!(
                        "{}",
                        format!("Resume saved to {}", self.output.display()).green()
                    );
                    return Ok(());
                }
                Err(e) => {
                    let e = PipelineError::from(e);
                    println!("{}", e.user_message().red());
                    let retry = match terminal.as_deref_mut() {
                        Some(terminal) => terminal.confirm("Try exporting again?")?,
                        None => false,
                    };
                    if !retry {
                        return Err(eyre!("resume export failed ({})", e.kind()));
                    }
                }
            }
        }
    }

    fn replace_form(&self, form: FieldModel) -> Result<()> {
        let mut session = self.session();
        let slot = session
            .form_mut()
            .ok_or_else(|| eyre!("cannot edit the form while a resume is being generated"))?;
        *slot = form;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::{AccentColor, TemplateVariant};

    #[tokio::test]
    async fn test_load_form_reads_camel_case_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.toml");
        std::fs::write(
            &path,
            "fullName = \"Ada Lovelace\"\njobTitle = \"Engineer\"\ntemplate = \"minimal\"\naccentColor = \"rose-600\"\n",
        )
        .unwrap();

        let form = load_form(&path).await.unwrap();
        assert_eq!(form.full_name, "Ada Lovelace");
        assert_eq!(form.job_title, "Engineer");
        assert_eq!(form.email, "");
        assert_eq!(form.template, TemplateVariant::Minimal);
        assert_eq!(form.accent_color, AccentColor::Rose);
    }

    #[tokio::test]
    async fn test_load_form_rejects_unknown_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.toml");
        std::fs::write(&path, "template = \"futuristic\"\n").unwrap();
        assert!(load_form(&path).await.is_err());
    }

    #[test]
    fn test_example_form_is_complete() {
        let form: FieldModel =
            toml::from_str(include_str!("../form.example.toml")).unwrap();
        assert!(form.missing_required().is_empty());
    }

    #[test]
    fn test_default_output_follows_format() {
        assert_eq!(default_output(ExportFormat::Pdf), PathBuf::from("resume.pdf"));
        assert_eq!(default_output(ExportFormat::Html), PathBuf::from("resume.html"));
    }
}
