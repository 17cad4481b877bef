use crate::render::style::{Align, Rule, SkillsLayout, Typeface, Weight};
use crate::render::tree::{Node, Role, VisualTree};

static TEMPLATE: &str = include_str!("template.tex");

pub struct LatexResumeAssembler<'a> {
    tree: &'a VisualTree,
}

impl<'a> LatexResumeAssembler<'a> {
    pub fn new(tree: &'a VisualTree) -> Self {
        Self { tree }
    }

    pub fn assemble(&self) -> String {
        let layout = self.tree.style.layout;
        let font = match layout.typeface {
            Typeface::Sans => "\\renewcommand{\\familydefault}{\\sfdefault}",
            Typeface::Serif => "",
        };

        let mut header = String::new();
        let mut sections = String::new();
        for node in &self.tree.root.children {
            match node.role {
                Role::Header => header.push_str(&self.header(node)),
                Role::Section => sections.push_str(&self.section(node)),
                _ => {}
            }
        }

        TEMPLATE
            .replace("<<ACCENT>>", self.tree.style.accent.hex())
            .replace("<<FONT>>", font)
            .replace("<<HEADER>>", &header)
            .replace("<<SECTIONS>>", &sections)
    }

    fn header(&self, node: &Node) -> String {
        let layout = self.tree.style.layout;
        let mut out = String::new();

        let weight = match layout.name_weight {
            Weight::Light => "\\mdseries",
            Weight::Bold => "\\bfseries",
        };

        let mut contacts = Vec::new();
        for child in &node.children {
            match child.role {
                Role::Name => out.push_str(&format!(
                    "{{\\fontsize{{{}}}{{{}}}\\selectfont {} {}}}\\\\[4pt]\n",
                    layout.name_size_pt,
                    u32::from(layout.name_size_pt) + 6,
                    weight,
                    Self::escape_latex(text(child))
                )),
                Role::Title => out.push_str(&format!(
                    "{{\\large\\color{{accent}} {}}}\\\\[4pt]\n",
                    Self::escape_latex(text(child))
                )),
                Role::Contacts => {
                    for contact in &child.children {
                        contacts.push(Self::inline(contact));
                    }
                }
                _ => {}
            }
        }
        out.push_str(&format!("{{\\small {}}}\n", contacts.join(" \\ $|$ \\ ")));

        if layout.header_rule {
            out.push_str("\n\\vspace{4pt}{\\color{accent}\\rule{\\linewidth}{1pt}}\n");
        }

        match layout.header_align {
            Align::Center => format!("\\begin{{center}}\n{}\\end{{center}}\n", out),
            Align::Left => format!("{}\\vspace{{8pt}}\n", out),
        }
    }

    fn section(&self, node: &Node) -> String {
        let layout = self.tree.style.layout;
        let mut out = String::from("\\vspace{10pt}\n");

        for child in &node.children {
            match child.role {
                Role::SectionTitle => {
                    let title = Self::escape_latex(text(child));
                    let title = if layout.section_title_uppercase {
                        format!("\\MakeUppercase{{{}}}", title)
                    } else {
                        format!("\\textbf{{{}}}", title)
                    };
                    out.push_str(&format!("{{\\large {}}}\\\\[-4pt]\n", title));
                    out.push_str(match layout.section_rule {
                        Rule::None => "\\vspace{6pt}\n",
                        Rule::Thin => "{\\color{accent}\\rule{\\linewidth}{0.4pt}}\\\\[2pt]\n",
                        Rule::Thick => "{\\color{accent}\\rule{\\linewidth}{1.2pt}}\\\\[2pt]\n",
                    });
                }
                Role::Paragraph => {
                    out.push_str(&format!("{}\n", Self::escape_latex(text(child))))
                }
                Role::Entry => out.push_str(&Self::entry(child)),
                Role::Skills => out.push_str(&self.skills(child)),
                _ => {}
            }
        }

        out
    }

    fn entry(node: &Node) -> String {
        let mut out = String::new();

        for child in &node.children {
            match child.role {
                Role::EntryTitle => out.push_str(&format!(
                    "\\noindent \\textbf{{{}}}",
                    Self::escape_latex(text(child))
                )),
                Role::Dates => {
                    let dates: Vec<String> = child
                        .children
                        .iter()
                        .map(|d| Self::escape_latex(text(d)))
                        .collect();
                    out.push_str(&format!(" \\hfill {} \\\\\n", dates.join(" -- ")));
                }
                Role::EntrySubtitle => out.push_str(&format!(
                    "\\textit{{\\color{{accent}} {}}}\n",
                    Self::escape_latex(text(child))
                )),
                Role::Degree => {
                    let parts: Vec<String> = child
                        .children
                        .iter()
                        .map(|d| Self::escape_latex(text(d)))
                        .collect();
                    out.push_str(&format!("{}\n", parts.join(" in ")));
                }
                Role::Bullets => {
                    out.push_str("\\begin{itemize}[noitemsep,topsep=0pt,leftmargin=*]\n");
                    for bullet in &child.children {
                        out.push_str(&format!(
                            "    \\item {}\n",
                            Self::escape_latex(text(bullet))
                        ));
                    }
                    out.push_str("\\end{itemize}\n");
                }
                _ => {}
            }
        }

        out.push_str("\\vspace{6pt}\n\n");
        out
    }

    fn skills(&self, node: &Node) -> String {
        let skills: Vec<String> = node
            .children
            .iter()
            .map(|s| Self::escape_latex(text(s)))
            .collect();
        if skills.is_empty() {
            return String::new();
        }

        match self.tree.style.layout.skills {
            SkillsLayout::Pills | SkillsLayout::OutlinedPills => {
                format!("{}\n", skills.join(" \\textbullet{} "))
            }
            SkillsLayout::Grid { columns } => {
                let columns = usize::from(columns.max(1));
                let width = format!("{:.3}", 0.95 / columns as f32);
                let spec = format!("p{{{}\\linewidth}}", width).repeat(columns);
                let rows: Vec<String> = skills
                    .chunks(columns)
                    .map(|row| row.join(" & "))
                    .collect();
                format!(
                    "\\noindent\\begin{{tabular}}{{@{{}}{}@{{}}}}\n{}\n\\end{{tabular}}\n",
                    spec,
                    rows.join(" \\\\\n")
                )
            }
        }
    }

    fn inline(node: &Node) -> String {
        match (&node.role, &node.href) {
            (Role::Link, Some(href)) => format!(
                "\\href{{{}}}{{{}}}",
                Self::escape_url(href),
                Self::escape_latex(text(node))
            ),
            _ => Self::escape_latex(text(node)),
        }
    }

    fn escape_url(url: &str) -> String {
        let mut out = String::with_capacity(url.len());
        for c in url.chars() {
            match c {
                '%' | '#' | '{' | '}' => {
                    out.push('\\');
                    out.push(c);
                }
                '\\' => out.push('/'),
                _ => out.push(c),
            }
        }
        out
    }

    /// Escapes TeX specials, turning `**bold**` and `` `code` `` spans into
    /// their LaTeX equivalents.
    pub fn escape_latex(text: &str) -> String {
        let mut result = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '*' && chars.peek() == Some(&'*') {
                chars.next();
                let mut bold_text = String::new();
                let mut found_end = false;

                while let Some(bc) = chars.next() {
                    if bc == '*' && chars.peek() == Some(&'*') {
                        chars.next();
                        found_end = true;
                        break;
                    }
                    bold_text.push(bc);
                }

                if found_end {
                    result.push_str(&format!("\\textbf{{{}}}", Self::escape_latex(&bold_text)));
                } else {
                    result.push_str("**");
                    result.push_str(&Self::escape_latex(&bold_text));
                }
            } else if c == '`' {
                let mut code_text = String::new();
                let mut found_end = false;

                for bc in chars.by_ref() {
                    if bc == '`' {
                        found_end = true;
                        break;
                    }
                    code_text.push(bc);
                }

                if found_end {
                    result.push_str(&format!("\\texttt{{{}}}", Self::escape_latex(&code_text)));
                } else {
                    result.push('`');
                    result.push_str(&Self::escape_latex(&code_text));
                }
            } else {
                match c {
                    '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                        result.push('\\');
                        result.push(c);
                    }
                    // braced so `\item` and `\\` never read them as optional arguments
                    '[' => result.push_str("{[}"),
                    ']' => result.push_str("{]}"),
                    '^' => result.push_str("\\textasciicircum{}"),
                    '~' => result.push_str("\\textasciitilde{}"),
                    '\\' => result.push_str("\\textbackslash{}"),
                    _ => result.push(c),
                }
            }
        }

        result
    }
}

fn text(node: &Node) -> &str {
    node.text.as_deref().unwrap_or_default()
}
