use crate::render::style::ResolvedStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Page,
    Header,
    Name,
    Title,
    Contacts,
    Contact,
    Link,
    Section,
    SectionTitle,
    Paragraph,
    Entry,
    EntryTitle,
    EntrySubtitle,
    /// Children are the start and end date.
    Dates,
    Date,
    /// Children are the degree and the field of study.
    Degree,
    Bullets,
    Bullet,
    Skills,
    Skill,
    Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub role: Role,
    pub text: Option<String>,
    pub href: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn container(role: Role, children: Vec<Node>) -> Self {
        Self {
            role,
            text: None,
            href: None,
            children,
        }
    }

    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: Some(text.into()),
            href: None,
            children: Vec::new(),
        }
    }

    /// A link whose visible text is the full target.
    pub fn link(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            role: Role::Link,
            text: Some(url.clone()),
            href: Some(url),
            children: Vec::new(),
        }
    }

    fn collect_text<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(text) = &self.text {
            out.push(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    pub fn find_all(&self, role: Role) -> Vec<&Node> {
        let mut out = Vec::new();
        self.find_into(role, &mut out);
        out
    }

    fn find_into<'a>(&'a self, role: Role, out: &mut Vec<&'a Node>) {
        if self.role == role {
            out.push(self);
        }
        for child in &self.children {
            child.find_into(role, out);
        }
    }
}

/// Styled, laid-out resume ready for display or export.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    pub style: ResolvedStyle,
    pub root: Node,
}

impl VisualTree {
    /// Every text fragment a reader would see, in document order.
    pub fn visible_text(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.root.collect_text(&mut out);
        out
    }

    pub fn section_titles(&self) -> Vec<&str> {
        self.root
            .find_all(Role::SectionTitle)
            .into_iter()
            .filter_map(|n| n.text.as_deref())
            .collect()
    }
}
