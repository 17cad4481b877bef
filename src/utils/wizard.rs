use std::io::{self, BufRead, Stdout, StdinLock, Write};

use colored::Colorize;
use log::info;

use crate::models::form::{ALL_INPUTS, AccentColor, FieldModel, Input, TemplateVariant};
use crate::session::wizard::{Step, Wizard};

/// Line-oriented terminal front end for the form wizard.
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt.cyan())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.red())
    }

    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            match self.read_line(&format!("{} (y/n): ", question))?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.complain("Please enter 'y' or 'n'.")?,
            }
        }
    }

    /// Walks the four wizard steps until the user generates from the review
    /// step. `form` pre-fills every input, so a rejected submission can be
    /// edited instead of retyped.
    pub fn run_wizard(&mut self, form: FieldModel) -> io::Result<FieldModel> {
        let mut wizard = Wizard::new(form);
        writeln!(self.output, "\n{}", "=== Resume Builder ===".cyan().bold())?;
        writeln!(
            self.output,
            "{}",
            "Press Enter to keep a value, '-' to clear it. Required fields are marked *.".cyan()
        )?;

        loop {
            let step = wizard.step();
            writeln!(
                self.output,
                "\n{} {}",
                format!("Step {}/{}:", step.number(), Step::ALL.len()).cyan().bold(),
                step.title().bold()
            )?;

            match step {
                Step::PersonalInfo | Step::Experience => {
                    self.fill_inputs(wizard.form_mut(), step.inputs())?
                }
                Step::Customization => self.customize(wizard.form_mut())?,
                Step::Review => self.review(wizard.form())?,
            }

            let prompt = match step {
                Step::Review => "[g]enerate, [b]ack, [r]estart: ",
                _ => "[Enter] next, [b]ack, [r]estart: ",
            };
            let choice = self.read_line(prompt)?.to_lowercase();
            match choice.as_str() {
                "b" | "back" => {
                    if let Err(e) = wizard.back() {
                        self.complain(&e.to_string())?;
                    }
                }
                "r" | "restart" => {
                    info!("form cleared");
                    wizard.reset();
                }
                "" | "n" | "next" | "g" | "generate" => {
                    if step == Step::Review {
                        match wizard.submit() {
                            Ok(form) => return Ok(form.clone()),
                            Err(e) => self.complain(&e.to_string())?,
                        }
                    } else if let Err(e) = wizard.advance() {
                        self.complain(&e.to_string())?;
                    }
                }
                other => self.complain(&format!("Unrecognized choice '{}'.", other))?,
            }
        }
    }

    fn fill_inputs(&mut self, form: &mut FieldModel, inputs: &[Input]) -> io::Result<()> {
        for input in inputs {
            let marker = if input.required() { "*" } else { "" };
            let current = form.get(*input);
            let prompt = if current.is_empty() {
                format!("{}{}: ", input.label(), marker)
            } else {
                format!("{}{} [{}]: ", input.label(), marker, current)
            };

            match self.read_line(&prompt)?.as_str() {
                "" => {}
                "-" => form.set(*input, ""),
                value => form.set(*input, value),
            }
        }
        Ok(())
    }

    fn customize(&mut self, form: &mut FieldModel) -> io::Result<()> {
        for (i, template) in TemplateVariant::ALL.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} - {}",
                i + 1,
                template.token().bold(),
                template.description()
            )?;
        }
        form.template = self.choose(&TemplateVariant::ALL, form.template, "Template")?;

        for (i, color) in AccentColor::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {} ({})", i + 1, color.name().bold(), color.token())?;
        }
        form.accent_color = self.choose(&AccentColor::ALL, form.accent_color, "Accent color")?;

        Ok(())
    }

    /// Accepts a 1-based number or the option's token; Enter keeps `current`.
    fn choose<T>(&mut self, options: &[T], current: T, label: &str) -> io::Result<T>
    where
        T: Copy + std::fmt::Display + std::str::FromStr,
    {
        loop {
            let answer = self.read_line(&format!("{} [{}]: ", label, current))?;
            if answer.is_empty() {
                return Ok(current);
            }
            if let Some(choice) = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i))
            {
                return Ok(*choice);
            }
            if let Ok(choice) = answer.parse::<T>() {
                return Ok(choice);
            }
            self.complain(&format!("Invalid choice: '{}'. Please try again.", answer))?;
        }
    }

    fn review(&mut self, form: &FieldModel) -> io::Result<()> {
        for input in ALL_INPUTS {
            let value = form.get(input);
            let value = if value.is_empty() { "-" } else { value };
            writeln!(self.output, "  {}: {}", input.label().bold(), value)?;
        }
        writeln!(self.output, "  {}: {}", "Template".bold(), form.template)?;
        writeln!(self.output, "  {}: {}", "Accent".bold(), form.accent_color.name())?;
        Ok(())
    }
}
