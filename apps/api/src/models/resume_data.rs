//! Typed view of the editor state blob stored in `resumes.data`.
//!
//! The store keeps the blob opaque; this structure is parsed on demand for
//! rendering and enhancement. Every field defaults, so partially filled
//! drafts from the editor parse cleanly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::render::FontFamily;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeData {
    pub personal: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub achievements: Vec<Achievement>,
    pub skills: Vec<SkillGroup>,
    pub section_order: Vec<Section>,
    pub hidden_sections: Vec<Section>,
    pub theme: Theme,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub headline: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub links: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub grade: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    pub link: String,
    pub tech_stack: Vec<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub font: FontFamily,
    pub accent_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            font: FontFamily::Inter,
            accent_color: "#1f2937".to_string(),
        }
    }
}

/// Orderable body sections. The personal header always comes first and is not listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Experience,
    Education,
    Projects,
    Skills,
    Achievements,
    /// Section keys from newer editor versions; ignored by the renderer.
    #[serde(other)]
    Unknown,
}

pub const DEFAULT_SECTION_ORDER: [Section; 6] = [
    Section::Summary,
    Section::Experience,
    Section::Education,
    Section::Projects,
    Section::Skills,
    Section::Achievements,
];

impl Section {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Projects => "Projects",
            Section::Skills => "Skills",
            Section::Achievements => "Achievements",
            Section::Unknown => "",
        }
    }
}

impl ResumeData {
    pub fn from_value(value: &Value) -> Result<Self, AppError> {
        if value.is_null() {
            return Ok(ResumeData::default());
        }
        ResumeData::deserialize(value)
            .map_err(|e| AppError::Validation(format!("Malformed resume data: {e}")))
    }

    /// Visible sections in display order.
    ///
    /// The user's order comes first; known sections missing from it are
    /// appended in default order so nothing disappears unless it is hidden.
    pub fn visible_sections(&self) -> Vec<Section> {
        let mut ordered: Vec<Section> = Vec::with_capacity(DEFAULT_SECTION_ORDER.len());
        for section in self.section_order.iter().chain(DEFAULT_SECTION_ORDER.iter()) {
            if *section != Section::Unknown && !ordered.contains(section) {
                ordered.push(*section);
            }
        }
        ordered.retain(|s| !self.hidden_sections.contains(s));
        ordered
    }
}
