//! Section registry: the static catalog of known section ids, their display
//! variants, and the header layout variants.
//!
//! The validator uses it for enum checks; the executor uses it to reject
//! section operations on ids it has never heard of.

const HEADER_VARIANTS: &[&str] = &[
    "left-aligned",
    "centered",
    "split",
    "banner",
    "minimal",
    "photo-left",
    "photo-right",
    "compact",
    "modern-minimal",
];

/// (section id, display variants). An empty variant list means the section
/// has a single fixed presentation.
const SECTIONS: &[(&str, &[&str])] = &[
    ("summary", &[]),
    (
        "experience",
        &[
            "standard",
            "compact",
            "detailed",
            "timeline",
            "card",
            "minimal",
            "modern",
            "academic",
            "icon-accent",
            "icon-clean",
            "dots-timeline",
        ],
    ),
    (
        "education",
        &[
            "standard", "compact", "detailed", "timeline", "card", "minimal", "academic", "modern",
        ],
    ),
    (
        "skills",
        &[
            "pills",
            "tags",
            "list",
            "grouped",
            "bars",
            "dots",
            "columns",
            "inline",
            "compact",
            "modern",
            "table",
            "category-lines",
            "bordered-tags",
            "pills-accent",
            "inline-dots",
            "boxed",
        ],
    ),
    (
        "languages",
        &[
            "standard", "list", "pills", "bars", "grid", "inline", "compact", "flags",
        ],
    ),
    (
        "projects",
        &[
            "standard", "cards", "compact", "grid", "timeline", "showcase", "minimal", "detailed",
        ],
    ),
    (
        "certifications",
        &[
            "standard", "list", "cards", "compact", "badges", "timeline", "detailed", "grouped",
        ],
    ),
    (
        "achievements",
        &[
            "standard", "list", "bullets", "cards", "numbered", "timeline", "minimal", "compact",
            "badges", "metrics", "boxed",
        ],
    ),
    (
        "awards",
        &["standard", "trophies", "cards", "compact", "timeline"],
    ),
    ("publications", &[]),
    ("volunteer", &[]),
    ("speaking", &[]),
    ("patents", &[]),
    (
        "interests",
        &["pills", "icons", "grid", "detailed", "list", "standard"],
    ),
    ("references", &[]),
    ("courses", &[]),
    (
        "strengths",
        &["cards", "list", "pills", "grid", "minimal", "accent-border"],
    ),
];

#[derive(Debug, Clone)]
pub struct SectionSpec {
    pub id: String,
    pub variants: Vec<String>,
}

/// The catalog consulted by validation and execution. Constructed once at
/// startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<SectionSpec>,
    header_variants: Vec<String>,
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::new(
            SECTIONS.iter().map(|(id, variants)| SectionSpec {
                id: id.to_string(),
                variants: variants.iter().map(|v| v.to_string()).collect(),
            }),
            HEADER_VARIANTS.iter().map(|v| v.to_string()),
        )
    }
}

impl SectionRegistry {
    pub fn new(
        sections: impl IntoIterator<Item = SectionSpec>,
        header_variants: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            sections: sections.into_iter().collect(),
            header_variants: header_variants.into_iter().collect(),
        }
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn contains(&self, section_id: &str) -> bool {
        self.get(section_id).is_some()
    }

    pub fn get(&self, section_id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn variants(&self, section_id: &str) -> &[String] {
        self.get(section_id)
            .map(|s| s.variants.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_valid_variant(&self, section_id: &str, variant: &str) -> bool {
        self.variants(section_id).iter().any(|v| v == variant)
    }

    pub fn header_variants(&self) -> &[String] {
        &self.header_variants
    }

    pub fn is_valid_header_variant(&self, variant: &str) -> bool {
        self.header_variants.iter().any(|v| v == variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentSection;

    #[test]
    fn test_default_registry_knows_every_content_section() {
        let registry = SectionRegistry::default();
        for section in ContentSection::ALL {
            assert!(
                registry.contains(section.as_str()),
                "missing {}",
                section.as_str()
            );
        }
        assert!(registry.contains("summary"));
        assert!(!registry.contains("launchpad"));
    }

    #[test]
    fn test_variant_membership() {
        let registry = SectionRegistry::default();
        assert!(registry.is_valid_variant("skills", "pills"));
        assert!(!registry.is_valid_variant("skills", "timeline"));
        assert!(!registry.is_valid_variant("summary", "standard"));
        assert!(registry.is_valid_header_variant("banner"));
        assert!(!registry.is_valid_header_variant("pills"));
    }

    #[test]
    fn test_custom_registry() {
        let registry = SectionRegistry::new(
            [SectionSpec {
                id: "skills".to_string(),
                variants: vec!["pills".to_string()],
            }],
            ["centered".to_string()],
        );
        assert_eq!(registry.sections().len(), 1);
        assert!(!registry.contains("experience"));
        assert_eq!(registry.variants("skills"), &["pills".to_string()]);
    }
}
