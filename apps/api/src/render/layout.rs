//! Deterministic resume layout.
//!
//! Turns a `ResumeData` into a sequence of typed lines, then either emits them
//! as one continuous page (screen preview) or splits them into fixed-height
//! pages (print/PDF). The same input and config always produce the same output,
//! so the client rasterizer and the preview never disagree on page breaks.
//!
//! # Pagination rules
//! - A page holds at most `lines_per_page` lines.
//! - A section heading is never the last line of a page; it moves to the next page.
//! - Spacers are dropped at the top of a page.

use serde::{Deserialize, Serialize};

use crate::models::resume_data::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeData, Section,
};
use crate::render::font_metrics::{FontFamily, FontMetrics, PageConfig};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One continuous page, no breaks.
    Screen,
    #[default]
    Paginated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Name,
    Headline,
    Contact,
    Heading,
    /// Title row of an experience, education or project entry.
    Entry,
    Text,
    /// First line of a bullet.
    Bullet,
    /// Wrapped continuation of a bullet, rendered at the bullet indent.
    Continuation,
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub number: u16,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub mode: RenderMode,
    pub font: FontFamily,
    pub accent_color: String,
    pub page_count: u16,
    pub pages: Vec<Page>,
}

const FIELD_SEPARATOR: &str = " | ";

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `data` in the requested mode using the resume's theme font.
pub fn render(data: &ResumeData, mode: RenderMode, config: &PageConfig) -> RenderedResume {
    let metrics = FontMetrics::for_font(data.theme.font);
    let lines = build_lines(data, &metrics, config);

    let pages = match mode {
        RenderMode::Screen => vec![Page { number: 1, lines }],
        RenderMode::Paginated => paginate(lines, config.lines_per_page),
    };

    RenderedResume {
        mode,
        font: data.theme.font,
        accent_color: data.theme.accent_color.clone(),
        page_count: pages.len() as u16,
        pages,
    }
}

/// Splits lines into pages without stranding a heading at a page bottom.
///
/// Always returns at least one page, possibly empty.
pub fn paginate(lines: Vec<Line>, lines_per_page: u16) -> Vec<Page> {
    let capacity = usize::from(lines_per_page.max(2));
    let mut pages: Vec<Page> = Vec::new();
    let mut current: Vec<Line> = Vec::with_capacity(capacity);

    for line in lines {
        if current.len() == capacity {
            current = break_page(&mut pages, current);
        }
        if current.is_empty() && line.kind == LineKind::Spacer {
            continue;
        }
        current.push(line);
    }
    trim_trailing_spacers(&mut current);
    if !current.is_empty() || pages.is_empty() {
        push_page(&mut pages, current);
    }
    pages
}

/// Closes a full page. Trailing headings and spacers move to the next page,
/// which starts with the returned lines.
fn break_page(pages: &mut Vec<Page>, mut lines: Vec<Line>) -> Vec<Line> {
    let mut carry = Vec::new();
    while lines.len() > 1
        && matches!(
            lines.last().map(|l| l.kind),
            Some(LineKind::Heading | LineKind::Spacer)
        )
    {
        carry.extend(lines.pop());
    }
    trim_trailing_spacers(&mut lines);
    push_page(pages, lines);

    carry.reverse();
    carry
        .into_iter()
        .skip_while(|l| l.kind == LineKind::Spacer)
        .collect()
}

fn trim_trailing_spacers(lines: &mut Vec<Line>) {
    while lines.last().is_some_and(|l| l.kind == LineKind::Spacer) {
        lines.pop();
    }
}

fn push_page(pages: &mut Vec<Page>, lines: Vec<Line>) {
    let number = pages.len() as u16 + 1;
    pages.push(Page { number, lines });
}

// ────────────────────────────────────────────────────────────────────────────
// Line building
// ────────────────────────────────────────────────────────────────────────────

struct LineWriter<'a> {
    metrics: &'a FontMetrics,
    config: &'a PageConfig,
    lines: Vec<Line>,
}

impl<'a> LineWriter<'a> {
    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(Line {
            kind,
            text: text.into(),
        });
    }

    fn wrapped(&mut self, kind: LineKind, text: &str) {
        for row in self.metrics.wrap(text, self.config.text_width_em) {
            self.push(kind, row);
        }
    }

    fn bullet(&mut self, text: &str) {
        let width = self.config.text_width_em - self.config.bullet_indent_em;
        for (i, row) in self.metrics.wrap(text, width).into_iter().enumerate() {
            let kind = if i == 0 {
                LineKind::Bullet
            } else {
                LineKind::Continuation
            };
            self.push(kind, row);
        }
    }

    fn spacer(&mut self) {
        if !self.lines.is_empty() {
            self.push(LineKind::Spacer, "");
        }
    }
}

fn join_present<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (s, "") => s.to_string(),
        ("", e) => e.to_string(),
        (s, e) => format!("{s} - {e}"),
    }
}

fn has_text(items: &[String]) -> bool {
    items.iter().any(|s| !s.trim().is_empty())
}

fn experience_title(job: &ExperienceEntry) -> String {
    let dates = date_range(&job.start_date, &job.end_date);
    join_present(&[&job.role, &job.company, &job.location, &dates])
}

fn education_title(school: &EducationEntry) -> String {
    let degree = match (school.degree.trim(), school.field.trim()) {
        ("", f) => f.to_string(),
        (d, "") => d.to_string(),
        (d, f) => format!("{d} in {f}"),
    };
    let dates = date_range(&school.start_date, &school.end_date);
    join_present(&[&degree, &school.institution, &dates, &school.grade])
}

fn project_title(project: &ProjectEntry) -> String {
    let stack = project
        .tech_stack
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    join_present(&[&project.name, &stack, &project.link])
}

/// A section earns its heading only if some entry produces at least one line.
fn section_has_content(data: &ResumeData, section: Section) -> bool {
    match section {
        Section::Summary => !data.personal.summary.trim().is_empty(),
        Section::Experience => data
            .experience
            .iter()
            .any(|job| !experience_title(job).is_empty() || has_text(&job.bullets)),
        Section::Education => data
            .education
            .iter()
            .any(|school| !education_title(school).is_empty()),
        Section::Projects => data
            .projects
            .iter()
            .any(|project| !project_title(project).is_empty() || has_text(&project.bullets)),
        Section::Skills => data.skills.iter().any(|g| has_text(&g.items)),
        Section::Achievements => data
            .achievements
            .iter()
            .any(|a| !a.title.trim().is_empty() || !a.description.trim().is_empty()),
        Section::Unknown => false,
    }
}

fn build_lines(data: &ResumeData, metrics: &FontMetrics, config: &PageConfig) -> Vec<Line> {
    let mut w = LineWriter {
        metrics,
        config,
        lines: Vec::new(),
    };

    let personal = &data.personal;
    if !personal.name.trim().is_empty() {
        w.push(LineKind::Name, personal.name.trim());
    }
    if !personal.headline.trim().is_empty() {
        w.wrapped(LineKind::Headline, &personal.headline);
    }
    let mut contact: Vec<&str> = vec![
        personal.email.as_str(),
        personal.phone.as_str(),
        personal.location.as_str(),
    ];
    contact.extend(personal.links.iter().map(String::as_str));
    let contact = join_present(&contact);
    if !contact.is_empty() {
        w.wrapped(LineKind::Contact, &contact);
    }

    for section in data.visible_sections() {
        if !section_has_content(data, section) {
            continue;
        }
        w.spacer();
        w.push(LineKind::Heading, section.heading());
        write_section(&mut w, data, section);
    }

    w.lines
}

fn write_section(w: &mut LineWriter<'_>, data: &ResumeData, section: Section) {
    match section {
        Section::Summary => w.wrapped(LineKind::Text, &data.personal.summary),
        Section::Experience => {
            for job in &data.experience {
                w.wrapped(LineKind::Entry, &experience_title(job));
                for bullet in &job.bullets {
                    w.bullet(bullet);
                }
            }
        }
        Section::Education => {
            for school in &data.education {
                w.wrapped(LineKind::Entry, &education_title(school));
            }
        }
        Section::Projects => {
            for project in &data.projects {
                w.wrapped(LineKind::Entry, &project_title(project));
                for bullet in &project.bullets {
                    w.bullet(bullet);
                }
            }
        }
        Section::Skills => {
            for group in &data.skills {
                let items: Vec<&str> = group
                    .items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                if items.is_empty() {
                    continue;
                }
                let text = match group.category.trim() {
                    "" => items.join(", "),
                    category => format!("{category}: {}", items.join(", ")),
                };
                w.wrapped(LineKind::Text, &text);
            }
        }
        Section::Achievements => {
            for achievement in &data.achievements {
                let text = match (achievement.title.trim(), achievement.description.trim()) {
                    (t, "") => t.to_string(),
                    ("", d) => d.to_string(),
                    (t, d) => format!("{t}: {d}"),
                };
                if !text.is_empty() {
                    w.bullet(&text);
                }
            }
        }
        Section::Unknown => {}
    }
}
