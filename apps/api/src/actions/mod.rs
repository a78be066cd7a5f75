//! Chat action taxonomy: the closed set of edits the assistant may request.
//!
//! Model output is untrusted, so nothing reaches `ChatAction` without passing
//! `validator::validate_actions` first. The executor only ever sees these types.

pub mod describe;
pub mod executor;
pub mod registry;
pub mod validator;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Column, ContentSection, FieldValue, HeaderConfig, PersonalInfoField};

// ────────────────────────────────────────────────────────────────────────────
// Payload enums
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    IncludeSocialLinks,
    IncludePhoto,
    DateFormat,
    FontScale,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::IncludeSocialLinks,
        SettingKey::IncludePhoto,
        SettingKey::DateFormat,
        SettingKey::FontScale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::IncludeSocialLinks => "includeSocialLinks",
            SettingKey::IncludePhoto => "includePhoto",
            SettingKey::DateFormat => "dateFormat",
            SettingKey::FontScale => "fontScale",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

pub const FONT_SCALE_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorKey {
    Primary,
    Secondary,
    HeaderBackground,
    SidebarBackground,
}

impl ColorKey {
    pub const ALL: [ColorKey; 4] = [
        ColorKey::Primary,
        ColorKey::Secondary,
        ColorKey::HeaderBackground,
        ColorKey::SidebarBackground,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKey::Primary => "primary",
            ColorKey::Secondary => "secondary",
            ColorKey::HeaderBackground => "headerBackground",
            ColorKey::SidebarBackground => "sidebarBackground",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundTarget {
    Sidebar,
    Page,
    Section,
    Accent,
}

impl BackgroundTarget {
    pub const ALL: [BackgroundTarget; 4] = [
        BackgroundTarget::Sidebar,
        BackgroundTarget::Page,
        BackgroundTarget::Section,
        BackgroundTarget::Accent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundTarget::Sidebar => "sidebar",
            BackgroundTarget::Page => "page",
            BackgroundTarget::Section => "section",
            BackgroundTarget::Accent => "accent",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Item drafts (items as proposed, before the executor assigns ids)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<Vec<String>>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_bullet_section() -> ContentSection {
    ContentSection::Experience
}

// ────────────────────────────────────────────────────────────────────────────
// The action union
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChatAction {
    // Sections
    ToggleSection {
        section_id: String,
        #[serde(alias = "enabled")]
        visible: bool,
    },
    ReorderSections {
        section_order: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<Column>,
    },
    ChangeSectionVariant {
        section_id: String,
        variant: String,
    },
    RenameSection {
        section_id: String,
        title: String,
    },
    MoveSectionToColumn {
        section_id: String,
        column: Column,
    },

    // Personal info
    UpdatePersonalInfo {
        field: PersonalInfoField,
        value: String,
    },
    UpdatePersonalInfoBulk {
        updates: BTreeMap<PersonalInfoField, String>,
    },

    // Collection items
    AddItem {
        section: ContentSection,
        item: ItemDraft,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    UpdateItem {
        section: ContentSection,
        item_id: String,
        updates: BTreeMap<String, FieldValue>,
    },
    RemoveItem {
        section: ContentSection,
        item_id: String,
    },
    ReorderItems {
        section: ContentSection,
        item_ids: Vec<String>,
    },
    ReplaceAllItems {
        section: ContentSection,
        items: Vec<ItemDraft>,
    },

    // Bullets
    AddBullet {
        #[serde(alias = "experienceId")]
        item_id: String,
        #[serde(default = "default_bullet_section")]
        section: ContentSection,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },
    UpdateBullet {
        #[serde(alias = "experienceId")]
        item_id: String,
        #[serde(default = "default_bullet_section")]
        section: ContentSection,
        bullet_index: usize,
        text: String,
    },
    RemoveBullet {
        #[serde(alias = "experienceId")]
        item_id: String,
        #[serde(default = "default_bullet_section")]
        section: ContentSection,
        bullet_index: usize,
    },
    ReplaceBullets {
        #[serde(alias = "experienceId")]
        item_id: String,
        #[serde(default = "default_bullet_section")]
        section: ContentSection,
        bullets: Vec<String>,
    },

    // Settings
    UpdateSetting {
        key: SettingKey,
        value: SettingValue,
    },
    UpdateThemeColor {
        color_key: ColorKey,
        value: String,
    },
    UpdateBackgroundColor {
        target: BackgroundTarget,
        value: String,
    },
    UpdateHeaderConfig {
        updates: HeaderConfig,
    },
    UpdateSectionConfig {
        section_type: ContentSection,
        updates: BTreeMap<String, FieldValue>,
    },

    // Custom sections
    AddCustomSection {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default)]
        items: Vec<CustomItemDraft>,
    },
    UpdateCustomSectionTitle {
        section_id: String,
        title: String,
    },
    AddCustomSectionItem {
        section_id: String,
        item: CustomItemDraft,
    },
    RemoveCustomSection {
        section_id: String,
    },

    Batch {
        actions: Vec<ChatAction>,
    },
}

/// Every recognised `type` discriminant, in taxonomy order.
pub const ACTION_TYPES: &[&str] = &[
    "toggleSection",
    "reorderSections",
    "changeSectionVariant",
    "renameSection",
    "moveSectionToColumn",
    "updatePersonalInfo",
    "updatePersonalInfoBulk",
    "addItem",
    "updateItem",
    "removeItem",
    "reorderItems",
    "replaceAllItems",
    "addBullet",
    "updateBullet",
    "removeBullet",
    "replaceBullets",
    "updateSetting",
    "updateThemeColor",
    "updateBackgroundColor",
    "updateHeaderConfig",
    "updateSectionConfig",
    "addCustomSection",
    "updateCustomSectionTitle",
    "addCustomSectionItem",
    "removeCustomSection",
    "batch",
];

impl ChatAction {
    /// The wire discriminant (`"addItem"`, `"batch"`, ...).
    pub fn action_type(&self) -> &'static str {
        match self {
            ChatAction::ToggleSection { .. } => "toggleSection",
            ChatAction::ReorderSections { .. } => "reorderSections",
            ChatAction::ChangeSectionVariant { .. } => "changeSectionVariant",
            ChatAction::RenameSection { .. } => "renameSection",
            ChatAction::MoveSectionToColumn { .. } => "moveSectionToColumn",
            ChatAction::UpdatePersonalInfo { .. } => "updatePersonalInfo",
            ChatAction::UpdatePersonalInfoBulk { .. } => "updatePersonalInfoBulk",
            ChatAction::AddItem { .. } => "addItem",
            ChatAction::UpdateItem { .. } => "updateItem",
            ChatAction::RemoveItem { .. } => "removeItem",
            ChatAction::ReorderItems { .. } => "reorderItems",
            ChatAction::ReplaceAllItems { .. } => "replaceAllItems",
            ChatAction::AddBullet { .. } => "addBullet",
            ChatAction::UpdateBullet { .. } => "updateBullet",
            ChatAction::RemoveBullet { .. } => "removeBullet",
            ChatAction::ReplaceBullets { .. } => "replaceBullets",
            ChatAction::UpdateSetting { .. } => "updateSetting",
            ChatAction::UpdateThemeColor { .. } => "updateThemeColor",
            ChatAction::UpdateBackgroundColor { .. } => "updateBackgroundColor",
            ChatAction::UpdateHeaderConfig { .. } => "updateHeaderConfig",
            ChatAction::UpdateSectionConfig { .. } => "updateSectionConfig",
            ChatAction::AddCustomSection { .. } => "addCustomSection",
            ChatAction::UpdateCustomSectionTitle { .. } => "updateCustomSectionTitle",
            ChatAction::AddCustomSectionItem { .. } => "addCustomSectionItem",
            ChatAction::RemoveCustomSection { .. } => "removeCustomSection",
            ChatAction::Batch { .. } => "batch",
        }
    }

    /// Document areas this action writes to, used for UI highlighting.
    pub fn touched_areas(&self) -> Vec<String> {
        match self {
            ChatAction::ToggleSection { section_id, .. }
            | ChatAction::ChangeSectionVariant { section_id, .. }
            | ChatAction::RenameSection { section_id, .. }
            | ChatAction::MoveSectionToColumn { section_id, .. } => vec![section_id.clone()],
            ChatAction::ReorderSections { section_order, .. } => section_order.clone(),
            ChatAction::UpdatePersonalInfo { .. } | ChatAction::UpdatePersonalInfoBulk { .. } => {
                vec!["personalInfo".to_string()]
            }
            ChatAction::AddItem { section, .. }
            | ChatAction::UpdateItem { section, .. }
            | ChatAction::RemoveItem { section, .. }
            | ChatAction::ReorderItems { section, .. }
            | ChatAction::ReplaceAllItems { section, .. }
            | ChatAction::AddBullet { section, .. }
            | ChatAction::UpdateBullet { section, .. }
            | ChatAction::RemoveBullet { section, .. }
            | ChatAction::ReplaceBullets { section, .. } => vec![section.as_str().to_string()],
            ChatAction::UpdateSetting { .. } => vec!["settings".to_string()],
            ChatAction::UpdateThemeColor { .. } | ChatAction::UpdateBackgroundColor { .. } => {
                vec!["colors".to_string()]
            }
            ChatAction::UpdateHeaderConfig { .. } => vec!["header".to_string()],
            ChatAction::UpdateSectionConfig { section_type, .. } => {
                vec![section_type.as_str().to_string()]
            }
            ChatAction::AddCustomSection { .. }
            | ChatAction::UpdateCustomSectionTitle { .. }
            | ChatAction::AddCustomSectionItem { .. }
            | ChatAction::RemoveCustomSection { .. } => vec!["customSections".to_string()],
            ChatAction::Batch { actions } => {
                actions.iter().flat_map(ChatAction::touched_areas).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_types_cover_every_variant_name() {
        let samples = [
            json!({"type": "toggleSection", "sectionId": "skills", "visible": false}),
            json!({"type": "removeItem", "section": "skills", "itemId": "s1"}),
            json!({"type": "batch", "actions": []}),
        ];
        for sample in samples {
            let action: ChatAction = serde_json::from_value(sample.clone()).unwrap();
            assert_eq!(action.action_type(), sample["type"]);
            assert!(ACTION_TYPES.contains(&action.action_type()));
        }
    }

    #[test]
    fn test_toggle_accepts_enabled_alias() {
        let action: ChatAction = serde_json::from_value(
            json!({"type": "toggleSection", "sectionId": "skills", "enabled": true}),
        )
        .unwrap();
        assert_eq!(
            action,
            ChatAction::ToggleSection {
                section_id: "skills".to_string(),
                visible: true
            }
        );
    }

    #[test]
    fn test_bullet_action_defaults_to_experience_and_accepts_legacy_id() {
        let action: ChatAction = serde_json::from_value(
            json!({"type": "addBullet", "experienceId": "e1", "text": "Shipped v2"}),
        )
        .unwrap();
        match action {
            ChatAction::AddBullet {
                item_id,
                section,
                position,
                ..
            } => {
                assert_eq!(item_id, "e1");
                assert_eq!(section, ContentSection::Experience);
                assert_eq!(position, None);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_add_item_serializes_with_wire_names() {
        let action = ChatAction::AddItem {
            section: ContentSection::Skills,
            item: ItemDraft {
                fields: BTreeMap::from([(
                    "name".to_string(),
                    FieldValue::Text("Rust".to_string()),
                )]),
                ..Default::default()
            },
            position: None,
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            value,
            json!({"type": "addItem", "section": "skills", "item": {"name": "Rust"}})
        );
    }

    #[test]
    fn test_touched_areas_flatten_batches() {
        let action = ChatAction::Batch {
            actions: vec![
                ChatAction::UpdatePersonalInfo {
                    field: PersonalInfoField::Title,
                    value: "CTO".to_string(),
                },
                ChatAction::RemoveCustomSection {
                    section_id: "custom-1".to_string(),
                },
            ],
        };
        assert_eq!(action.touched_areas(), vec!["personalInfo", "customSections"]);
    }
}
