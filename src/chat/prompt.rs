use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::chat::schema::{Field, FieldKind, RESUME_SCHEMA, Schema};
use crate::models::form::FieldModel;

pub const SYSTEM_PROMPT: &str = include_str!("system_prompt.txt");
const STRUCTURED_TEMPLATE: &str = include_str!("prompt_structured.txt");
const MARKUP_TEMPLATE: &str = include_str!("prompt_markup.txt");

/// Bullets requested per role. The validator only insists on one.
pub const MIN_ACHIEVEMENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Strict JSON matching the resume schema
    #[default]
    Structured,
    /// A styled HTML document with embedded print CSS
    Markup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub mode: OutputMode,
}

/// Renders the form into the instruction sent to the model. Same input, same
/// output: no clock, no randomness.
pub fn compile(form: &FieldModel, mode: OutputMode) -> Prompt {
    compile_with(&RESUME_SCHEMA, form, mode)
}

pub fn compile_with(schema: &Schema, form: &FieldModel, mode: OutputMode) -> Prompt {
    let min_achievements = MIN_ACHIEVEMENTS.to_string();
    let mut vars: Vec<(&str, String)> = vec![
        ("job_title", form.job_title.clone()),
        ("years_of_experience", form.years_of_experience.clone()),
        ("full_name", form.full_name.clone()),
        ("email", form.email.clone()),
        ("phone", form.phone.clone()),
        ("location", or_none(&form.location)),
        ("linkedin", or_none(&form.linkedin)),
        ("website", or_none(&form.website)),
        ("key_skills", form.key_skills.clone()),
        ("previous_roles", form.previous_roles.clone()),
        ("education", form.education.clone()),
        ("min_achievements", min_achievements),
    ];

    let template = match mode {
        OutputMode::Structured => {
            let echoed: Vec<String> = schema
                .fields
                .iter()
                .filter(|f| schema.echo(f.name, form).is_some())
                .map(|f| format!("\"{}\"", f.name))
                .collect();
            vars.push(("skeleton", skeleton(schema, form)));
            vars.push(("field_types", field_types(schema)));
            vars.push(("echoed_fields", echoed.join(", ")));
            STRUCTURED_TEMPLATE
        }
        OutputMode::Markup => {
            vars.push(("content_list", content_list(schema, form)));
            vars.push(("template", form.template.token().to_string()));
            vars.push(("template_description", form.template.description().to_lowercase()));
            vars.push(("accent_hex", form.accent_color.hex().to_string()));
            MARKUP_TEMPLATE
        }
    };

    Prompt {
        text: fill(template, &vars),
        mode,
    }
}

fn or_none(value: &str) -> String {
    if value.trim().is_empty() {
        "(not provided)".to_string()
    } else {
        value.to_string()
    }
}

/// Single-pass `{key}` substitution, so braces inside user input are never
/// re-expanded. Unknown `{...}` sequences are copied through.
fn fill(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, close))
        });

        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn placeholder_array(hint: &str) -> String {
    let items: Vec<String> = (1..=MIN_ACHIEVEMENTS)
        .map(|i| json_string(&format!("{} {}", hint, i)))
        .collect();
    format!("[{}]", items.join(", "))
}

fn skeleton(schema: &Schema, form: &FieldModel) -> String {
    let mut out = String::from("{\n");
    write_fields(&mut out, schema.fields, 1, &|field| {
        schema.echo(field.name, form).map(json_string)
    });
    out.push('}');
    out
}

fn write_fields(
    out: &mut String,
    fields: &[Field],
    depth: usize,
    echo: &dyn Fn(&Field) -> Option<String>,
) {
    let indent = "  ".repeat(depth);

    for (i, field) in fields.iter().enumerate() {
        let value = match field.kind {
            FieldKind::Text => echo(field).unwrap_or_else(|| json_string(field.hint)),
            FieldKind::TextSequence => placeholder_array(field.hint),
            FieldKind::RecordSequence(nested) => {
                let mut record = format!("[\n{}  {{\n", indent);
                write_fields(&mut record, nested, depth + 2, &|_| None);
                record.push_str(&format!("{}  }}\n{}]", indent, indent));
                record
            }
        };
        let comma = if i + 1 < fields.len() { "," } else { "" };
        out.push_str(&format!("{}\"{}\": {}{}\n", indent, field.name, value, comma));
    }
}

fn field_types(schema: &Schema) -> String {
    schema
        .fields
        .iter()
        .map(|field| match field.kind {
            FieldKind::RecordSequence(nested) => {
                let names: Vec<&str> = nested.iter().map(|n| n.name).collect();
                format!(
                    "- \"{}\": {} of objects with {}",
                    field.name,
                    field.kind.tag(),
                    names.join(", ")
                )
            }
            kind => format!("- \"{}\": {}", field.name, kind.tag()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn content_list(schema: &Schema, form: &FieldModel) -> String {
    schema
        .fields
        .iter()
        .filter(|f| !matches!(f.name, "template" | "accentColor"))
        .map(|field| match (field.kind, schema.echo(field.name, form)) {
            (FieldKind::Text, Some(value)) if value.trim().is_empty() => {
                format!("- {}: omit, not provided", field.name)
            }
            (FieldKind::Text, Some(value)) => format!("- {}: {}", field.name, value),
            (FieldKind::Text, None) => format!("- {}: {}", field.name, field.hint),
            (FieldKind::TextSequence, _) => format!("- {}: a list of {}s", field.name, field.hint),
            (FieldKind::RecordSequence(nested), _) => {
                let names: Vec<&str> = nested.iter().map(|n| n.name).collect();
                format!("- {}: entries each showing {}", field.name, names.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::ada;
    use crate::models::form::{AccentColor, TemplateVariant};

    #[test]
    fn test_structured_prompt_names_every_schema_field() {
        let prompt = compile(&ada(), OutputMode::Structured);
        for field in RESUME_SCHEMA.fields {
            assert!(
                prompt.text.contains(&format!("\"{}\"", field.name)),
                "missing {}",
                field.name
            );
            if let FieldKind::RecordSequence(nested) = field.kind {
                for n in nested {
                    assert!(prompt.text.contains(&format!("\"{}\"", n.name)));
                }
            }
        }
    }

    #[test]
    fn test_markup_prompt_names_every_content_field() {
        let prompt = compile(&ada(), OutputMode::Markup);
        for path in RESUME_SCHEMA.paths() {
            let name = path.rsplit('.').next().unwrap();
            if matches!(name, "template" | "accentColor") {
                continue;
            }
            assert!(prompt.text.contains(name), "missing {}", name);
        }
        assert!(prompt.text.contains("@page { size: A4 portrait; margin: 16mm; }"));
        assert!(prompt.text.contains("#2563EB"));
        assert_eq!(prompt.mode, OutputMode::Markup);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let form = ada();
        assert_eq!(
            compile(&form, OutputMode::Structured),
            compile(&form, OutputMode::Structured)
        );
        assert_eq!(compile(&form, OutputMode::Markup), compile(&form, OutputMode::Markup));
    }

    #[test]
    fn test_skeleton_echoes_form_values_as_json() {
        let mut form = ada();
        form.full_name = "Ada \"Countess\" Lovelace".into();
        form.template = TemplateVariant::Minimal;
        form.accent_color = AccentColor::Amber;

        let prompt = compile(&form, OutputMode::Structured);
        assert!(prompt.text.contains(r#""fullName": "Ada \"Countess\" Lovelace","#));
        assert!(prompt.text.contains(r#""template": "minimal","#));
        assert!(prompt.text.contains(r#""accentColor": "amber-600""#));
        assert!(prompt.text.contains("at least 3 detailed achievement bullet points"));
    }

    #[test]
    fn test_skeleton_is_valid_json() {
        let s = skeleton(&RESUME_SCHEMA, &ada());
        let parsed: serde_json::Value = serde_json::from_str(&s).unwrap();
        assert_eq!(parsed["experience"][0]["achievements"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["title"], "Engineer");
    }

    #[test]
    fn test_braces_in_user_input_are_not_expanded() {
        let mut form = ada();
        form.key_skills = "Rust {education}".into();
        let prompt = compile(&form, OutputMode::Structured);
        assert!(prompt.text.contains("Skills: Rust {education}"));
    }

    #[test]
    fn test_blank_optional_fields_are_marked() {
        let prompt = compile(&ada(), OutputMode::Structured);
        assert!(prompt.text.contains("Location: (not provided)"));
    }
}
