use crate::render::style::{Align, ResolvedStyle, Rule, SkillsLayout, Typeface, Weight};
use crate::render::tree::{Node, Role, VisualTree};

/// CSS page box shared by the screen preview and the exported file.
pub const PAGE_RULE: &str = "@page { size: A4 portrait; margin: 16mm; }";

impl VisualTree {
    /// A standalone HTML page: the preview and the HTML export.
    pub fn to_html(&self) -> String {
        let name = self
            .root
            .find_all(Role::Name)
            .first()
            .and_then(|n| n.text.as_deref())
            .unwrap_or("Resume");

        let mut body = String::new();
        write_node(&mut body, &self.root, &self.style);

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} - Resume</title>\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(name),
            stylesheet(&self.style),
            body
        )
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text_of(node: &Node) -> String {
    node.text.as_deref().map(escape_html).unwrap_or_default()
}

fn children(out: &mut String, node: &Node, style: &ResolvedStyle) {
    for child in &node.children {
        write_node(out, child, style);
    }
}

fn joined(node: &Node, separator: &str) -> String {
    node.children
        .iter()
        .map(text_of)
        .collect::<Vec<_>>()
        .join(separator)
}

fn write_node(out: &mut String, node: &Node, style: &ResolvedStyle) {
    match node.role {
        Role::Page => {
            out.push_str(&format!(
                "<main class=\"resume resume-{}\">\n",
                style.template.token()
            ));
            children(out, node, style);
            out.push_str("</main>");
        }
        Role::Header => {
            out.push_str("<header>\n");
            children(out, node, style);
            out.push_str("</header>\n");
        }
        Role::Name => out.push_str(&format!("<h1 class=\"name\">{}</h1>\n", text_of(node))),
        Role::Title => out.push_str(&format!("<p class=\"title\">{}</p>\n", text_of(node))),
        Role::Contacts => {
            out.push_str("<ul class=\"contacts\">\n");
            for child in &node.children {
                out.push_str("<li>");
                write_node(out, child, style);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        Role::Contact | Role::Span => {
            out.push_str(&format!("<span>{}</span>", text_of(node)))
        }
        Role::Link => {
            let href = node.href.as_deref().map(escape_html).unwrap_or_default();
            out.push_str(&format!("<a href=\"{}\">{}</a>", href, text_of(node)));
        }
        Role::Section => {
            out.push_str("<section>\n");
            children(out, node, style);
            out.push_str("</section>\n");
        }
        Role::SectionTitle => out.push_str(&format!("<h2>{}</h2>\n", text_of(node))),
        Role::Paragraph => out.push_str(&format!("<p class=\"summary\">{}</p>\n", text_of(node))),
        Role::Entry => {
            out.push_str("<div class=\"entry\">\n");
            children(out, node, style);
            out.push_str("</div>\n");
        }
        Role::EntryTitle => out.push_str(&format!("<h3>{}</h3>\n", text_of(node))),
        Role::EntrySubtitle => {
            out.push_str(&format!("<p class=\"company\">{}</p>\n", text_of(node)))
        }
        Role::Dates => out.push_str(&format!(
            "<span class=\"dates\">{}</span>\n",
            joined(node, " - ")
        )),
        Role::Date => out.push_str(&text_of(node)),
        Role::Degree => out.push_str(&format!(
            "<p class=\"degree\">{}</p>\n",
            joined(node, " in ")
        )),
        Role::Bullets => {
            out.push_str("<ul class=\"bullets\">\n");
            children(out, node, style);
            out.push_str("</ul>\n");
        }
        Role::Bullet => out.push_str(&format!("<li>{}</li>\n", text_of(node))),
        Role::Skills => {
            out.push_str("<div class=\"skills\">\n");
            children(out, node, style);
            out.push_str("</div>\n");
        }
        Role::Skill => out.push_str(&format!("<span class=\"skill\">{}</span>\n", text_of(node))),
    }
}

fn stylesheet(style: &ResolvedStyle) -> String {
    let layout = style.layout;
    let accent = style.accent_css();

    let font = match layout.typeface {
        Typeface::Sans => "\"Helvetica Neue\", Arial, sans-serif",
        Typeface::Serif => "Georgia, \"Times New Roman\", serif",
    };
    let name_weight = match layout.name_weight {
        Weight::Light => 300,
        Weight::Bold => 700,
    };
    let (align, contacts_justify) = match layout.header_align {
        Align::Left => ("left", "flex-start"),
        Align::Center => ("center", "center"),
    };
    let header_rule = if layout.header_rule {
        format!("border-bottom: 2px solid {}; padding-bottom: 12pt;", accent)
    } else {
        String::new()
    };
    let section_rule = match layout.section_rule {
        Rule::None => String::new(),
        Rule::Thin => format!("border-bottom: 1px solid {};", accent),
        Rule::Thick => format!("border-bottom: 2px solid {};", accent),
    };
    let section_case = if layout.section_title_uppercase {
        "text-transform: uppercase; letter-spacing: 0.1em; font-weight: 300;"
    } else {
        "font-weight: 600;"
    };
    let skills = match layout.skills {
        SkillsLayout::Pills => {
            ".skills { display: flex; flex-wrap: wrap; gap: 6pt; }\n.skill { background: #f3f4f6; border-radius: 999px; padding: 2pt 8pt; }".to_string()
        }
        SkillsLayout::OutlinedPills => {
            ".skills { display: flex; flex-wrap: wrap; gap: 6pt; }\n.skill { background: #f3f4f6; border: 1px solid #e5e7eb; border-radius: 999px; padding: 2pt 8pt; }".to_string()
        }
        SkillsLayout::Grid { columns } => format!(
            ".skills {{ display: grid; grid-template-columns: repeat({}, 1fr); gap: 6pt; }}",
            columns
        ),
    };

    format!(
        "{page}
body {{ margin: 0; background: #f9fafb; color: #374151; font-family: {font}; font-size: 10.5pt; line-height: 1.45; }}
.resume {{ max-width: 210mm; margin: 0 auto; padding: 16mm; background: #fff; box-sizing: border-box; }}
header {{ text-align: {align}; margin-bottom: 18pt; {header_rule} }}
.name {{ font-size: {name_size}pt; font-weight: {name_weight}; color: #111827; margin: 0; }}
.title {{ font-size: 14pt; color: {accent}; margin: 4pt 0 0; }}
.contacts {{ list-style: none; display: flex; flex-wrap: wrap; justify-content: {contacts_justify}; gap: 4pt 14pt; padding: 0; margin: 8pt 0 0; font-size: 9.5pt; }}
.contacts a {{ color: inherit; text-decoration: none; }}
section {{ margin-bottom: 14pt; }}
h2 {{ font-size: 13pt; color: #111827; padding-bottom: 2pt; margin: 0 0 8pt; {section_case} {section_rule} }}
.entry {{ display: grid; grid-template-columns: 1fr auto; margin-bottom: 10pt; }}
.entry > * {{ grid-column: 1 / -1; }}
.entry > h3 {{ grid-column: 1; font-size: 11.5pt; font-weight: 500; color: #111827; margin: 0; }}
.entry > .dates {{ grid-column: 2; font-size: 9.5pt; color: #4b5563; }}
.company {{ color: {accent}; font-weight: 500; margin: 0; }}
.degree {{ margin: 0; }}
.bullets {{ margin: 4pt 0 0; padding-left: 14pt; }}
.summary {{ margin: 0; }}
{skills}
@media print {{
  body {{ background: none; }}
  .resume {{ max-width: none; padding: 0; }}
  .entry {{ break-inside: avoid; }}
}}
",
        page = PAGE_RULE,
        font = font,
        align = align,
        header_rule = header_rule,
        name_size = layout.name_size_pt,
        name_weight = name_weight,
        accent = accent,
        contacts_justify = contacts_justify,
        section_case = section_case,
        section_rule = section_rule,
        skills = skills,
    )
}
