//! Human-readable labels for actions and document areas, used when turning an
//! execution report into chat messages.

use crate::actions::ChatAction;

/// Short label for an action type, e.g. `"changeSectionVariant"` → `"Change Style"`.
/// Unknown types are returned unchanged.
pub fn format_action_type(action_type: &str) -> &str {
    match action_type {
        "toggleSection" => "Toggle Section",
        "changeSectionVariant" => "Change Style",
        "renameSection" | "updateCustomSectionTitle" => "Rename Section",
        "moveSectionToColumn" => "Move Section",
        "reorderSections" => "Reorder Sections",
        "updatePersonalInfo" | "updatePersonalInfoBulk" => "Update Info",
        "addItem" | "addCustomSectionItem" => "Add Item",
        "updateItem" => "Update Item",
        "removeItem" => "Remove Item",
        "reorderItems" => "Reorder Items",
        "replaceAllItems" => "Replace Items",
        "addBullet" => "Add Bullet",
        "updateBullet" => "Update Bullet",
        "removeBullet" => "Remove Bullet",
        "replaceBullets" => "Replace Bullets",
        "updateSetting" => "Update Setting",
        "updateThemeColor" | "updateBackgroundColor" => "Change Color",
        "updateHeaderConfig" => "Update Header",
        "updateSectionConfig" => "Update Config",
        "addCustomSection" => "Add Section",
        "removeCustomSection" => "Remove Section",
        "batch" => "Multiple Changes",
        other => other,
    }
}

/// Display name for a section id or document area. Unknown ids are
/// capitalised.
pub fn format_section_name(section_id: &str) -> String {
    let known = match section_id {
        "personalInfo" => "Personal Info",
        "summary" => "Summary",
        "experience" => "Experience",
        "education" => "Education",
        "skills" => "Skills",
        "languages" => "Languages",
        "certifications" => "Certifications",
        "projects" => "Projects",
        "achievements" => "Achievements",
        "strengths" => "Strengths",
        "awards" => "Awards",
        "publications" => "Publications",
        "volunteer" => "Volunteer",
        "speaking" => "Speaking",
        "patents" => "Patents",
        "interests" => "Interests",
        "references" => "References",
        "courses" => "Courses",
        "customSections" => "Custom Sections",
        "header" => "Header",
        "settings" => "Settings",
        "colors" => "Theme",
        _ => {
            let mut chars = section_id.chars();
            return match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
        }
    };
    known.to_string()
}

pub fn describe_action(action: &ChatAction) -> String {
    match action {
        ChatAction::ToggleSection {
            section_id,
            visible,
        } => format!(
            "{} {} section",
            if *visible { "Show" } else { "Hide" },
            format_section_name(section_id)
        ),
        ChatAction::ReorderSections { column, .. } => match column {
            Some(column) => format!("Reorder {} column sections", column.as_str()),
            None => "Reorder sections".to_string(),
        },
        ChatAction::ChangeSectionVariant {
            section_id,
            variant,
        } => format!(
            "Change {} style to {variant}",
            format_section_name(section_id)
        ),
        ChatAction::RenameSection { section_id, title } => {
            format!("Rename {} to \"{title}\"", format_section_name(section_id))
        }
        ChatAction::MoveSectionToColumn { section_id, column } => format!(
            "Move {} to the {} column",
            format_section_name(section_id),
            column.as_str()
        ),
        ChatAction::UpdatePersonalInfo { field, .. } => format!("Update {}", field.as_str()),
        ChatAction::UpdatePersonalInfoBulk { updates } => format!(
            "Update {}",
            updates
                .keys()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ChatAction::AddItem { section, .. } => {
            format!("Add item to {}", format_section_name(section.as_str()))
        }
        ChatAction::UpdateItem { section, .. } => {
            format!("Update item in {}", format_section_name(section.as_str()))
        }
        ChatAction::RemoveItem { section, .. } => {
            format!("Remove item from {}", format_section_name(section.as_str()))
        }
        ChatAction::ReorderItems { section, .. } => {
            format!("Reorder {}", format_section_name(section.as_str()))
        }
        ChatAction::ReplaceAllItems { section, items } => format!(
            "Replace {} with {} item{}",
            format_section_name(section.as_str()),
            items.len(),
            if items.len() == 1 { "" } else { "s" }
        ),
        ChatAction::AddBullet { .. } => "Add bullet point".to_string(),
        ChatAction::UpdateBullet { .. } => "Update bullet point".to_string(),
        ChatAction::RemoveBullet { .. } => "Remove bullet point".to_string(),
        ChatAction::ReplaceBullets { .. } => "Replace all bullet points".to_string(),
        ChatAction::UpdateSetting { key, .. } => format!("Update {} setting", key.as_str()),
        ChatAction::UpdateThemeColor { color_key, .. } => {
            format!("Change {} color", color_key.as_str())
        }
        ChatAction::UpdateBackgroundColor { target, .. } => {
            format!("Change {} background", target.as_str())
        }
        ChatAction::UpdateHeaderConfig { .. } => "Update header".to_string(),
        ChatAction::UpdateSectionConfig { section_type, .. } => format!(
            "Update {} options",
            format_section_name(section_type.as_str())
        ),
        ChatAction::AddCustomSection { title, .. } => format!("Add custom section \"{title}\""),
        ChatAction::UpdateCustomSectionTitle { title, .. } => {
            format!("Rename custom section to \"{title}\"")
        }
        ChatAction::AddCustomSectionItem { .. } => "Add item to custom section".to_string(),
        ChatAction::RemoveCustomSection { .. } => "Remove custom section".to_string(),
        ChatAction::Batch { actions } => format!("{} changes", actions.len()),
    }
}
