//! The resume document tree mutated by chat actions.
//!
//! Pure data. Behaviour lives in `actions::executor`; the only helpers here are
//! lookups that keep the executor from re-implementing collection access.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Named keys
// ────────────────────────────────────────────────────────────────────────────

/// Repeatable item collections. Serialized as the top-level document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentSection {
    Experience,
    Education,
    Skills,
    Languages,
    Projects,
    Certifications,
    Achievements,
    Awards,
    Publications,
    Volunteer,
    Speaking,
    Patents,
    Interests,
    References,
    Courses,
    Strengths,
}

impl ContentSection {
    pub const ALL: [ContentSection; 16] = [
        ContentSection::Experience,
        ContentSection::Education,
        ContentSection::Skills,
        ContentSection::Languages,
        ContentSection::Projects,
        ContentSection::Certifications,
        ContentSection::Achievements,
        ContentSection::Awards,
        ContentSection::Publications,
        ContentSection::Volunteer,
        ContentSection::Speaking,
        ContentSection::Patents,
        ContentSection::Interests,
        ContentSection::References,
        ContentSection::Courses,
        ContentSection::Strengths,
    ];

    /// Sections that carry a per-section display options block.
    pub const CONFIGURABLE: [ContentSection; 6] = [
        ContentSection::Skills,
        ContentSection::Experience,
        ContentSection::Education,
        ContentSection::Languages,
        ContentSection::Projects,
        ContentSection::Certifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentSection::Experience => "experience",
            ContentSection::Education => "education",
            ContentSection::Skills => "skills",
            ContentSection::Languages => "languages",
            ContentSection::Projects => "projects",
            ContentSection::Certifications => "certifications",
            ContentSection::Achievements => "achievements",
            ContentSection::Awards => "awards",
            ContentSection::Publications => "publications",
            ContentSection::Volunteer => "volunteer",
            ContentSection::Speaking => "speaking",
            ContentSection::Patents => "patents",
            ContentSection::Interests => "interests",
            ContentSection::References => "references",
            ContentSection::Courses => "courses",
            ContentSection::Strengths => "strengths",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Prefix for generated item ids, e.g. `exp-…`, `ski-…`.
    pub fn id_prefix(&self) -> &'static str {
        &self.as_str()[..3]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalInfoField {
    FullName,
    Email,
    Phone,
    Location,
    Title,
    Summary,
    Linkedin,
    Github,
    Portfolio,
    Website,
    Twitter,
    Address,
    City,
    State,
    Country,
    ZipCode,
    Photo,
}

impl PersonalInfoField {
    pub const ALL: [PersonalInfoField; 17] = [
        PersonalInfoField::FullName,
        PersonalInfoField::Email,
        PersonalInfoField::Phone,
        PersonalInfoField::Location,
        PersonalInfoField::Title,
        PersonalInfoField::Summary,
        PersonalInfoField::Linkedin,
        PersonalInfoField::Github,
        PersonalInfoField::Portfolio,
        PersonalInfoField::Website,
        PersonalInfoField::Twitter,
        PersonalInfoField::Address,
        PersonalInfoField::City,
        PersonalInfoField::State,
        PersonalInfoField::Country,
        PersonalInfoField::ZipCode,
        PersonalInfoField::Photo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalInfoField::FullName => "fullName",
            PersonalInfoField::Email => "email",
            PersonalInfoField::Phone => "phone",
            PersonalInfoField::Location => "location",
            PersonalInfoField::Title => "title",
            PersonalInfoField::Summary => "summary",
            PersonalInfoField::Linkedin => "linkedin",
            PersonalInfoField::Github => "github",
            PersonalInfoField::Portfolio => "portfolio",
            PersonalInfoField::Website => "website",
            PersonalInfoField::Twitter => "twitter",
            PersonalInfoField::Address => "address",
            PersonalInfoField::City => "city",
            PersonalInfoField::State => "state",
            PersonalInfoField::Country => "country",
            PersonalInfoField::ZipCode => "zipCode",
            PersonalInfoField::Photo => "photo",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    #[default]
    Main,
    Sidebar,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Main => "main",
            Column::Sidebar => "sidebar",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "main" => Some(Column::Main),
            "sidebar" => Some(Column::Sidebar),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Items
// ────────────────────────────────────────────────────────────────────────────

/// A value stored under a named item field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Integer(i64),
    Decimal(f64),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
    Null,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a list of strings, or `None` if any element is not text.
    pub fn to_text_list(&self) -> Option<Vec<String>> {
        match self {
            FieldValue::List(values) => values
                .iter()
                .map(|v| v.as_text().map(str::to_string))
                .collect(),
            _ => None,
        }
    }
}

/// One entry of a repeatable collection. Identity is `id`, never position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSectionItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A user-defined section: free text, an item list, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub items: Vec<CustomSectionItem>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout & settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionLayout {
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub column: Column,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub order: u32,
    /// Display label override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl SectionLayout {
    pub fn at_order(order: u32) -> Self {
        Self {
            visible: true,
            column: Column::Main,
            variant: None,
            order,
            title: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoShape {
    Circle,
    Square,
    Rounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoPosition {
    Left,
    Right,
}

/// Header knobs. Every field is optional so the same type doubles as a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_photo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_shape: Option<PhotoShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_position: Option<PhotoPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_social_links: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

impl HeaderConfig {
    /// Shallow merge: only fields set in `patch` overwrite.
    pub fn merge(&mut self, patch: &HeaderConfig) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }
        take(&mut self.variant, &patch.variant);
        take(&mut self.show_photo, &patch.show_photo);
        take(&mut self.photo_size, &patch.photo_size);
        take(&mut self.photo_shape, &patch.photo_shape);
        take(&mut self.photo_position, &patch.photo_position);
        take(&mut self.show_social_links, &patch.show_social_links);
        take(&mut self.background_color, &patch.background_color);
        take(&mut self.text_color, &patch.text_color);
        take(&mut self.padding, &patch.padding);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_include_social_links")]
    pub include_social_links: bool,
    #[serde(default)]
    pub include_photo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default = "default_font_scale")]
    pub font_scale: f64,
    #[serde(default)]
    pub colors: ThemeColors,
    #[serde(default)]
    pub background: BackgroundColors,
    #[serde(default)]
    pub header: HeaderConfig,
    /// Per-section display options (e.g. `skills.showLevel`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub section_options: BTreeMap<ContentSection, BTreeMap<String, FieldValue>>,
}

fn default_include_social_links() -> bool {
    true
}

fn default_font_scale() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include_social_links: true,
            include_photo: false,
            date_format: None,
            font_scale: 1.0,
            colors: ThemeColors::default(),
            background: BackgroundColors::default(),
            header: HeaderConfig::default(),
            section_options: BTreeMap::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// A full resume snapshot.
///
/// Content collections are flattened to top-level keys (`"experience": [...]`),
/// so any unrecognised top-level key fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub personal_info: BTreeMap<PersonalInfoField, String>,
    #[serde(flatten)]
    pub collections: BTreeMap<ContentSection, Vec<Item>>,
    #[serde(default)]
    pub custom_sections: Vec<CustomSection>,
    #[serde(default)]
    pub section_config: BTreeMap<String, SectionLayout>,
    #[serde(default)]
    pub settings: Settings,
}

impl ResumeDocument {
    pub fn items(&self, section: ContentSection) -> &[Item] {
        self.collections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn items_mut(&mut self, section: ContentSection) -> &mut Vec<Item> {
        self.collections.entry(section).or_default()
    }

    pub fn item_ids(&self, section: ContentSection) -> Vec<String> {
        self.items(section).iter().map(|i| i.id.clone()).collect()
    }

    pub fn custom_section(&self, id: &str) -> Option<&CustomSection> {
        self.custom_sections.iter().find(|s| s.id == id)
    }

    pub fn custom_section_mut(&mut self, id: &str) -> Option<&mut CustomSection> {
        self.custom_sections.iter_mut().find(|s| s.id == id)
    }

    /// Section ids with layout entries, sorted by position (ties broken by id).
    pub fn ordered_sections(&self, column: Option<Column>) -> Vec<String> {
        let mut entries: Vec<(&String, &SectionLayout)> = self
            .section_config
            .iter()
            .filter(|(_, layout)| column.map_or(true, |c| layout.column == c))
            .collect();
        entries.sort_by(|a, b| a.1.order.cmp(&b.1.order).then_with(|| a.0.cmp(b.0)));
        entries.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Next free sort position, one past the current maximum.
    pub fn next_section_order(&self) -> u32 {
        self.section_config
            .values()
            .map(|l| l.order + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_deserializes_flattened_collections() {
        let doc: ResumeDocument = serde_json::from_value(json!({
            "personalInfo": { "fullName": "Ada Lovelace", "title": "Engineer" },
            "experience": [
                { "id": "e1", "company": "Analytical Engines", "bulletPoints": ["x"] }
            ],
            "skills": [{ "id": "s1", "name": "Rust", "level": 5 }],
            "sectionConfig": { "skills": { "visible": true, "column": "sidebar", "order": 2 } }
        }))
        .unwrap();

        assert_eq!(
            doc.personal_info.get(&PersonalInfoField::FullName).map(String::as_str),
            Some("Ada Lovelace")
        );
        let exp = doc.items(ContentSection::Experience)
            .iter()
            .find(|i| i.id == "e1")
            .unwrap();
        assert_eq!(exp.bullet_points.as_deref(), Some(&["x".to_string()][..]));
        assert_eq!(
            exp.fields.get("company"),
            Some(&FieldValue::Text("Analytical Engines".to_string()))
        );
        assert_eq!(
            doc.items(ContentSection::Skills)[0].fields.get("level"),
            Some(&FieldValue::Integer(5))
        );
        assert_eq!(doc.section_config["skills"].column, Column::Sidebar);
        assert!(doc.items(ContentSection::Awards).is_empty());
    }

    #[test]
    fn test_document_serializes_collections_at_top_level() {
        let mut doc = ResumeDocument::default();
        doc.items_mut(ContentSection::Education).push(Item {
            id: "edu-1".to_string(),
            bullet_points: None,
            fields: BTreeMap::from([(
                "school".to_string(),
                FieldValue::Text("MIT".to_string()),
            )]),
        });

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["education"][0]["id"], "edu-1");
        assert_eq!(value["education"][0]["school"], "MIT");
        assert!(value["education"][0].get("bulletPoints").is_none());
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let result: Result<ResumeDocument, _> =
            serde_json::from_value(json!({ "launchCodes": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_section_layout_defaults() {
        let layout: SectionLayout = serde_json::from_value(json!({})).unwrap();
        assert!(layout.visible);
        assert_eq!(layout.column, Column::Main);
        assert_eq!(layout.order, 0);
    }

    #[test]
    fn test_ordered_sections_sorts_by_order_then_id() {
        let mut doc = ResumeDocument::default();
        doc.section_config
            .insert("skills".to_string(), SectionLayout::at_order(1));
        doc.section_config
            .insert("experience".to_string(), SectionLayout::at_order(0));
        doc.section_config
            .insert("awards".to_string(), SectionLayout::at_order(1));
        assert_eq!(
            doc.ordered_sections(None),
            vec!["experience", "awards", "skills"]
        );
        assert_eq!(doc.next_section_order(), 2);
    }

    #[test]
    fn test_header_merge_keeps_unset_fields() {
        let mut header = HeaderConfig {
            variant: Some("centered".to_string()),
            show_photo: Some(true),
            ..Default::default()
        };
        header.merge(&HeaderConfig {
            show_photo: Some(false),
            ..Default::default()
        });
        assert_eq!(header.variant.as_deref(), Some("centered"));
        assert_eq!(header.show_photo, Some(false));
    }

    #[test]
    fn test_content_section_parse_and_prefix() {
        assert_eq!(
            ContentSection::parse("certifications"),
            Some(ContentSection::Certifications)
        );
        assert_eq!(ContentSection::parse("launchRocket"), None);
        assert_eq!(ContentSection::Experience.id_prefix(), "exp");
    }
}
