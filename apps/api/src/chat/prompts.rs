// Prompt assembly for the chat turn. The action catalog, section list and
// variant lists are rendered from the registry so the prompt can never
// advertise something the validator would reject.

use crate::actions::registry::SectionRegistry;
use crate::actions::{BackgroundTarget, ColorKey, SettingKey, FONT_SCALE_RANGE};
use crate::chat::ChatMessage;
use crate::llm_client::prompts::{
    CONTENT_QUALITY_INSTRUCTION, EDIT_SCOPE_INSTRUCTION, ID_GROUNDING_INSTRUCTION,
    JSON_ONLY_SYSTEM,
};
use crate::llm_client::{Role, Turn};
use crate::models::{ContentSection, PersonalInfoField, ResumeDocument};

/// One example per action type, in taxonomy order.
pub const ACTION_EXAMPLES: &[(&str, &str)] = &[
    ("toggleSection", r#"{"type": "toggleSection", "sectionId": "skills", "visible": false}"#),
    ("reorderSections", r#"{"type": "reorderSections", "sectionOrder": ["summary", "experience", "skills", "education"]}"#),
    ("changeSectionVariant", r#"{"type": "changeSectionVariant", "sectionId": "skills", "variant": "pills"}"#),
    ("renameSection", r#"{"type": "renameSection", "sectionId": "experience", "title": "Work History"}"#),
    ("moveSectionToColumn", r#"{"type": "moveSectionToColumn", "sectionId": "languages", "column": "sidebar"}"#),
    ("updatePersonalInfo", r#"{"type": "updatePersonalInfo", "field": "title", "value": "Senior Software Engineer"}"#),
    ("updatePersonalInfoBulk", r#"{"type": "updatePersonalInfoBulk", "updates": {"email": "jane@example.com", "location": "Berlin"}}"#),
    ("addItem", r#"{"type": "addItem", "section": "skills", "item": {"name": "Rust", "level": "Expert"}}"#),
    ("updateItem", r#"{"type": "updateItem", "section": "experience", "itemId": "exp-1", "updates": {"position": "Staff Engineer"}}"#),
    ("removeItem", r#"{"type": "removeItem", "section": "certifications", "itemId": "cer-2"}"#),
    ("reorderItems", r#"{"type": "reorderItems", "section": "experience", "itemIds": ["exp-2", "exp-1"]}"#),
    ("replaceAllItems", r#"{"type": "replaceAllItems", "section": "skills", "items": [{"name": "Go"}, {"name": "SQL"}]}"#),
    ("addBullet", r#"{"type": "addBullet", "itemId": "exp-1", "text": "Cut p99 latency by 40% by rewriting the cache layer"}"#),
    ("updateBullet", r#"{"type": "updateBullet", "itemId": "exp-1", "bulletIndex": 0, "text": "Led a team of 5 engineers to ship v2"}"#),
    ("removeBullet", r#"{"type": "removeBullet", "itemId": "exp-1", "bulletIndex": 2}"#),
    ("replaceBullets", r#"{"type": "replaceBullets", "itemId": "exp-1", "bullets": ["Built the billing pipeline", "Mentored 3 engineers"]}"#),
    ("updateSetting", r#"{"type": "updateSetting", "key": "fontScale", "value": 1.1}"#),
    ("updateThemeColor", r##"{"type": "updateThemeColor", "colorKey": "primary", "value": "#1e40af"}"##),
    ("updateBackgroundColor", r##"{"type": "updateBackgroundColor", "target": "sidebar", "value": "#f1f5f9"}"##),
    ("updateHeaderConfig", r#"{"type": "updateHeaderConfig", "updates": {"variant": "centered", "showPhoto": true, "photoShape": "circle"}}"#),
    ("updateSectionConfig", r#"{"type": "updateSectionConfig", "sectionType": "skills", "updates": {"showLevel": false}}"#),
    ("addCustomSection", r#"{"type": "addCustomSection", "title": "Open Source", "items": [{"title": "tokio", "content": "Contributor"}]}"#),
    ("updateCustomSectionTitle", r#"{"type": "updateCustomSectionTitle", "sectionId": "custom-1", "title": "Side Projects"}"#),
    ("addCustomSectionItem", r#"{"type": "addCustomSectionItem", "sectionId": "custom-1", "item": {"title": "serde", "url": "https://serde.rs"}}"#),
    ("removeCustomSection", r#"{"type": "removeCustomSection", "sectionId": "custom-1"}"#),
    ("batch", r#"{"type": "batch", "actions": [{"type": "toggleSection", "sectionId": "interests", "visible": false}, {"type": "changeSectionVariant", "sectionId": "experience", "variant": "timeline"}]}"#),
];

/// Replace `{json_only}`, `{actions}`, `{sections}`, `{variants}`,
/// `{header_variants}`, `{fields}`, `{settings}`, `{colors}`,
/// `{quality}`, `{id_grounding}`, `{edit_scope}`.
const CHAT_SYSTEM_TEMPLATE: &str = r##"You are an expert resume editing assistant. You help users improve their resume by answering questions and by making precise edits through structured actions.

{json_only}

## RESPONSE FORMAT
{
  "message": "A short, friendly reply explaining what you changed or answering the question",
  "actions": [ ...zero or more actions... ],
  "followUpQuestion": "Optional question when the request is ambiguous",
  "suggestedActions": ["Up to 3 short follow-up commands the user could send next"]
}

## AVAILABLE ACTIONS
{actions}

## VALID SECTIONS
{sections}

## VALID VARIANTS
{variants}

## HEADER VARIANTS
{header_variants}

## PERSONAL INFO FIELDS
{fields}
(photo can only be set with updatePersonalInfo, never in updatePersonalInfoBulk)

## SETTINGS
{settings}

## COLORS
{colors}
Colors are 3 or 6 digit hex values such as "#1e40af".

## CONTENT QUALITY GUIDELINES
{quality}

## CRITICAL RULES
{id_grounding}
{edit_scope}
Use a single batch action when one request needs several changes.
Offer 1-3 suggestedActions phrased as commands, e.g. "Add metrics to my latest role"."##;

/// Renders the system prompt for the given catalog.
pub fn build_system_prompt(registry: &SectionRegistry) -> String {
    let actions = ACTION_EXAMPLES
        .iter()
        .map(|(name, example)| format!("- {name}: {example}"))
        .collect::<Vec<_>>()
        .join("\n");

    let sections = registry
        .sections()
        .iter()
        .map(|s| s.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let variants = registry
        .sections()
        .iter()
        .filter(|s| !s.variants.is_empty())
        .map(|s| format!("- {}: {}", s.id, s.variants.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    let fields = PersonalInfoField::ALL
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let settings = SettingKey::ALL
        .iter()
        .map(|key| match key {
            SettingKey::FontScale => format!(
                "- {}: number between {} and {}",
                key.as_str(),
                FONT_SCALE_RANGE.start(),
                FONT_SCALE_RANGE.end()
            ),
            SettingKey::DateFormat => format!("- {}: string", key.as_str()),
            _ => format!("- {}: boolean", key.as_str()),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let colors = format!(
        "- updateThemeColor colorKey: {}\n- updateBackgroundColor target: {}\n- updateSectionConfig sectionType: {}",
        ColorKey::ALL.map(|k| k.as_str()).join(", "),
        BackgroundTarget::ALL.map(|t| t.as_str()).join(", "),
        ContentSection::CONFIGURABLE.map(|s| s.as_str()).join(", "),
    );

    CHAT_SYSTEM_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{actions}", &actions)
        .replace("{sections}", &sections)
        .replace("{variants}", &variants)
        .replace("{header_variants}", &registry.header_variants().join(", "))
        .replace("{fields}", &fields)
        .replace("{settings}", &settings)
        .replace("{colors}", &colors)
        .replace("{quality}", CONTENT_QUALITY_INSTRUCTION)
        .replace("{id_grounding}", ID_GROUNDING_INSTRUCTION)
        .replace("{edit_scope}", EDIT_SCOPE_INSTRUCTION)
}

/// Renders the final user turn: current document, optional retry feedback,
/// then the request itself.
pub fn build_turn_context(
    message: &str,
    document: &ResumeDocument,
    retry_feedback: Option<&str>,
) -> Result<String, serde_json::Error> {
    let document_json = serde_json::to_string_pretty(document)?;
    let mut context = format!("## CURRENT RESUME DATA\n```json\n{document_json}\n```\n\n");
    if let Some(feedback) = retry_feedback {
        context.push_str("## VALIDATION ERRORS FROM PREVIOUS RESPONSE\n");
        context.push_str(feedback);
        context.push_str("\n\n");
    }
    context.push_str("## CURRENT USER REQUEST\n");
    context.push_str(message);
    Ok(context)
}

/// Builds the Messages API conversation: trailing history plus the turn context.
///
/// The API requires the first message to come from the user and roles to
/// alternate, so leading assistant messages are dropped and consecutive
/// messages from the same role are merged.
pub fn build_conversation(
    history: &[ChatMessage],
    message: &str,
    document: &ResumeDocument,
    retry_feedback: Option<&str>,
) -> Result<Vec<Turn>, serde_json::Error> {
    let context = build_turn_context(message, document, retry_feedback)?;

    let mut turns: Vec<Turn> = Vec::with_capacity(history.len() + 1);
    let entries = history
        .iter()
        .filter(|m| !m.content.trim().is_empty())
        .map(|m| (m.role, m.content.as_str()))
        .chain(std::iter::once((Role::User, context.as_str())));

    for (role, content) in entries {
        if let Some(last) = turns.last_mut().filter(|t| t.role == role) {
            last.content.push_str("\n\n");
            last.content.push_str(content);
            continue;
        }
        if turns.is_empty() && role == Role::Assistant {
            continue;
        }
        turns.push(Turn {
            role,
            content: content.to_string(),
        });
    }
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::validator::validate_actions;
    use crate::actions::ACTION_TYPES;
    use serde_json::Value;

    #[test]
    fn test_every_action_type_has_a_valid_example() {
        let registry = SectionRegistry::default();
        let names: Vec<&str> = ACTION_EXAMPLES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ACTION_TYPES);

        for (name, example) in ACTION_EXAMPLES {
            let value: Value = serde_json::from_str(example).unwrap();
            let outcome = validate_actions(&[value], &registry);
            assert!(outcome.is_clean(), "{name}: {:?}", outcome.errors);
            assert_eq!(outcome.valid[0].action_type(), *name);
        }
    }

    #[test]
    fn test_system_prompt_lists_catalog() {
        let prompt = build_system_prompt(&SectionRegistry::default());
        assert!(!prompt.contains("{actions}"));
        assert!(!prompt.contains("{edit_scope}"));
        assert!(prompt.contains("- skills: pills, tags"));
        assert!(prompt.contains("modern-minimal"));
        assert!(prompt.contains("zipCode"));
        assert!(prompt.contains("fontScale: number between 0.5 and 2"));
        assert!(prompt.contains(r##"such as "#1e40af"."##));
        assert!(prompt.contains("## CONTENT QUALITY GUIDELINES"));
        // Sections without variants are not listed under VALID VARIANTS.
        assert!(!prompt.contains("- summary:"));
    }

    #[test]
    fn test_turn_context_includes_retry_feedback() {
        let doc = ResumeDocument::default();
        let plain = build_turn_context("hide skills", &doc, None).unwrap();
        assert!(plain.starts_with("## CURRENT RESUME DATA"));
        assert!(plain.ends_with("## CURRENT USER REQUEST\nhide skills"));
        assert!(!plain.contains("VALIDATION ERRORS"));

        let retry = build_turn_context("hide skills", &doc, Some("- actions[0].visible: missing")).unwrap();
        assert!(retry.contains("## VALIDATION ERRORS FROM PREVIOUS RESPONSE\n- actions[0].visible: missing"));
    }

    #[test]
    fn test_conversation_alternates_roles() {
        let history = vec![
            ChatMessage::new(Role::Assistant, "Hi! How can I help?"),
            ChatMessage::new(Role::User, "make it shorter"),
            ChatMessage::new(Role::User, "the summary I mean"),
            ChatMessage::new(Role::Assistant, "Done."),
            ChatMessage::new(Role::User, "  "),
        ];
        let turns =
            build_conversation(&history, "now hide skills", &ResumeDocument::default(), None)
                .unwrap();

        let roles: Vec<Role> = turns.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(turns[0].content, "make it shorter\n\nthe summary I mean");
        assert!(turns[2].content.ends_with("now hide skills"));
    }

    #[test]
    fn test_conversation_merges_trailing_user_message() {
        let history = vec![ChatMessage::new(Role::User, "earlier question")];
        let turns =
            build_conversation(&history, "follow-up", &ResumeDocument::default(), None).unwrap();
        assert_eq!(turns.len(), 1);
        assert!(turns[0].content.starts_with("earlier question\n\n## CURRENT RESUME DATA"));
    }
}
