//! Action validator: the hard gate between model output and the executor.
//!
//! Checks run per action, in order:
//! 1. `type` is a known discriminant
//! 2. required fields are present and of the right primitive kind
//! 3. enum-valued fields are members of their value set
//!
//! The first violation per action is reported and the action is dropped; the
//! rest of the response survives. Referential checks (do these ids exist?) are
//! the executor's job, since only it sees the live working copy.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::actions::registry::SectionRegistry;
use crate::actions::{
    BackgroundTarget, ChatAction, ColorKey, SettingKey, ACTION_TYPES, FONT_SCALE_RANGE,
};
use crate::models::{Column, ContentSection, PersonalInfoField};

const MAX_SUGGESTIONS: usize = 3;
const EXCERPT_CHARS: usize = 200;
const DEFAULT_MESSAGE: &str = "I processed your request.";

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    NotAnObject,
    UnknownActionType,
    MissingField,
    InvalidField,
    InvalidEnumValue,
}

/// One rejected action. `index` is the position in the top-level action list;
/// `path` pinpoints the offending field, including nested batch positions.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{path}: {message}")]
pub struct ValidationError {
    pub index: usize,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    pub kind: ValidationErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub valid: Vec<ChatAction>,
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The whole response is unusable. Eligible for a bounded retry.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseRejection {
    #[error("failed to parse JSON: {reason}")]
    Unparseable { reason: String, excerpt: String },

    #[error("response must be a JSON object or an array of actions")]
    NotAnObject,

    #[error("actions must be an array")]
    ActionsNotArray,

    #[error("none of the {} proposed actions were valid", .errors.len())]
    NoValidActions { errors: Vec<ValidationError> },
}

/// A sanitized model response: only valid actions, plus the errors for the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedResponse {
    pub message: String,
    pub actions: Vec<ChatAction>,
    pub errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
    pub suggested_questions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Validates a list of candidate actions. Never fails as a whole.
pub fn validate_actions(raw: &[Value], registry: &SectionRegistry) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    for (index, candidate) in raw.iter().enumerate() {
        let path = format!("actions[{index}]");
        let (action, errors) = validate_action(candidate, index, &path, registry);
        outcome.valid.extend(action);
        outcome.errors.extend(errors);
    }
    debug!(
        "Validated {} candidate actions: {} valid, {} errors",
        raw.len(),
        outcome.valid.len(),
        outcome.errors.len()
    );
    outcome
}

/// Validates a model response: either the full envelope
/// `{message, actions, followUpQuestion?, suggestedActions? | suggestedQuestions?}`
/// or a bare array of actions.
pub fn validate_response(
    raw: &Value,
    registry: &SectionRegistry,
) -> Result<ValidatedResponse, ResponseRejection> {
    let (envelope, actions) = match raw {
        Value::Array(actions) => (None, actions),
        Value::Object(map) => match map.get("actions") {
            Some(Value::Array(actions)) => (Some(map), actions),
            _ => return Err(ResponseRejection::ActionsNotArray),
        },
        _ => return Err(ResponseRejection::NotAnObject),
    };

    let outcome = validate_actions(actions, registry);
    if outcome.valid.is_empty() && !outcome.errors.is_empty() {
        warn!(
            "Rejecting response: all {} actions failed validation",
            actions.len()
        );
        return Err(ResponseRejection::NoValidActions {
            errors: outcome.errors,
        });
    }

    let text = |key: &str| {
        envelope
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    // suggestedActions wins when both are present.
    let suggestions = envelope
        .and_then(|m| {
            m.get("suggestedActions")
                .and_then(Value::as_array)
                .or_else(|| m.get("suggestedQuestions").and_then(Value::as_array))
        })
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .take(MAX_SUGGESTIONS)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(ValidatedResponse {
        message: text("message").unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
        actions: outcome.valid,
        errors: outcome.errors,
        follow_up_question: text("followUpQuestion"),
        suggested_questions: suggestions,
    })
}

/// Parses raw model text (tolerating markdown fences) and validates it.
pub fn parse_and_validate(
    text: &str,
    registry: &SectionRegistry,
) -> Result<ValidatedResponse, ResponseRejection> {
    let parsed = serde_json::from_str::<Value>(strip_json_fences(text)).or_else(|err| {
        extract_fenced_block(text)
            .and_then(|block| serde_json::from_str::<Value>(block).ok())
            .ok_or(err)
    });

    match parsed {
        Ok(value) => validate_response(&value, registry),
        Err(err) => {
            warn!("Model response is not JSON: {err}");
            Err(ResponseRejection::Unparseable {
                reason: err.to_string(),
                excerpt: text.chars().take(EXCERPT_CHARS).collect(),
            })
        }
    }
}

/// Feedback appended to a re-issued model call after a total rejection.
pub fn retry_prompt(rejection: &ResponseRejection) -> String {
    let lines = match rejection {
        ResponseRejection::NoValidActions { errors } => errors
            .iter()
            .map(|e| format!("- {}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("\n"),
        other => format!("- response: {other}"),
    };
    format!(
        "Your previous response had validation errors. Please fix these issues and try again:\n\n\
        {lines}\n\n\
        Remember to return valid JSON with this exact structure:\n\
        {{\n  \"message\": \"Your friendly response\",\n  \"actions\": [/* array of valid actions */],\n  \
        \"suggestedActions\": [\"actionable\", \"command\", \"suggestions\"]\n}}"
    )
}

/// Strips ```json ... ``` or ``` ... ``` fences wrapping the whole text.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// Finds the first fenced block embedded in surrounding prose.
fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

// ────────────────────────────────────────────────────────────────────────────
// Field accessors
// ────────────────────────────────────────────────────────────────────────────

/// A single violated constraint, before it is anchored to an action path.
struct Violation {
    kind: ValidationErrorKind,
    field: String,
    message: String,
}

impl Violation {
    fn missing(field: &str) -> Self {
        Self {
            kind: ValidationErrorKind::MissingField,
            field: field.to_string(),
            message: format!("missing field `{field}`"),
        }
    }

    fn invalid(field: &str, constraint: impl std::fmt::Display) -> Self {
        Self {
            kind: ValidationErrorKind::InvalidField,
            field: field.to_string(),
            message: format!("invalid field `{field}`: {constraint}"),
        }
    }

    fn bad_enum<'a>(field: &str, value: &str, allowed: impl IntoIterator<Item = &'a str>) -> Self {
        let allowed: Vec<&str> = allowed.into_iter().collect();
        Self {
            kind: ValidationErrorKind::InvalidEnumValue,
            field: field.to_string(),
            message: format!(
                "invalid enum value for `{field}`: \"{value}\" (expected one of: {})",
                allowed.join(", ")
            ),
        }
    }
}

type Check<T> = Result<T, Violation>;

/// Typed accessors over one JSON object. `prefix` is prepended to reported
/// field names so nested objects (`item.id`) point at the right place.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    prefix: &'a str,
}

impl<'a> Fields<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self { obj, prefix: "" }
    }

    fn nested(obj: &'a Map<String, Value>, prefix: &'a str) -> Self {
        Self { obj, prefix }
    }

    fn name(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    fn has(&self, field: &str) -> bool {
        !matches!(self.obj.get(field), None | Some(Value::Null))
    }

    fn get(&self, field: &str) -> Check<&'a Value> {
        match self.obj.get(field) {
            None | Some(Value::Null) => Err(Violation::missing(&self.name(field))),
            Some(v) => Ok(v),
        }
    }

    fn string(&self, field: &str) -> Check<&'a str> {
        self.get(field)?
            .as_str()
            .ok_or_else(|| Violation::invalid(&self.name(field), "must be a string"))
    }

    fn non_empty(&self, field: &str) -> Check<&'a str> {
        let s = self.string(field)?;
        if s.trim().is_empty() {
            return Err(Violation::invalid(
                &self.name(field),
                "must be a non-empty string",
            ));
        }
        Ok(s)
    }

    fn optional_string(&self, field: &str) -> Check<Option<&'a str>> {
        if self.has(field) {
            self.string(field).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Resolves the one present name among aliases; falls back to the
    /// canonical (first) name so a missing field is reported under it.
    fn first_present<'n>(&self, names: &[&'n str]) -> Check<&'n str> {
        let mut present = names.iter().copied().filter(|n| self.has(n));
        let first = present.next();
        if let Some(extra) = present.next() {
            return Err(Violation::invalid(
                &self.name(extra),
                format!("cannot be combined with `{}`", first.unwrap_or(names[0])),
            ));
        }
        Ok(first.unwrap_or(names[0]))
    }

    fn boolean(&self, field: &str) -> Check<bool> {
        self.get(field)?
            .as_bool()
            .ok_or_else(|| Violation::invalid(&self.name(field), "must be a boolean"))
    }

    fn index(&self, field: &str) -> Check<u64> {
        self.get(field)?.as_u64().ok_or_else(|| {
            Violation::invalid(&self.name(field), "must be a non-negative integer")
        })
    }

    fn optional_index(&self, field: &str) -> Check<Option<u64>> {
        if self.has(field) {
            self.index(field).map(Some)
        } else {
            Ok(None)
        }
    }

    fn object(&self, field: &str) -> Check<&'a Map<String, Value>> {
        self.get(field)?
            .as_object()
            .ok_or_else(|| Violation::invalid(&self.name(field), "must be an object"))
    }

    fn array(&self, field: &str) -> Check<&'a Vec<Value>> {
        self.get(field)?
            .as_array()
            .ok_or_else(|| Violation::invalid(&self.name(field), "must be an array"))
    }

    fn string_list(&self, field: &str, allow_empty: bool) -> Check<Vec<&'a str>> {
        let list = self.array(field)?;
        if !allow_empty && list.is_empty() {
            return Err(Violation::invalid(
                &self.name(field),
                "must be a non-empty array",
            ));
        }
        list.iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Violation::invalid(&self.name(field), "must contain only strings"))
    }
}

fn one_of<'a, T>(
    field: &str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
    allowed: impl IntoIterator<Item = &'a str>,
) -> Check<T> {
    parse(value).ok_or_else(|| Violation::bad_enum(field, value, allowed))
}

fn section_enum(field: &str, value: &str) -> Check<ContentSection> {
    one_of(
        field,
        value,
        ContentSection::parse,
        ContentSection::ALL.iter().map(|s| s.as_str()),
    )
}

fn column_enum(field: &str, value: &str) -> Check<Column> {
    one_of(field, value, Column::parse, ["main", "sidebar"])
}

fn personal_info_enum(field: &str, value: &str) -> Check<PersonalInfoField> {
    one_of(
        field,
        value,
        PersonalInfoField::parse,
        PersonalInfoField::ALL.iter().map(|f| f.as_str()),
    )
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .map(|hex| {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        })
        .unwrap_or(false)
}

fn hex_color(field: &str, value: &str) -> Check<()> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(Violation::invalid(
            field,
            "must be a hex color such as #2563eb or #fff",
        ))
    }
}

/// `bulletPoints` may be absent, null, or an array of strings.
fn bullet_points(fields: &Fields<'_>) -> Check<()> {
    match fields.obj.get("bulletPoints") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(list)) if list.iter().all(Value::is_string) => Ok(()),
        Some(_) => Err(Violation::invalid(
            &fields.name("bulletPoints"),
            "must be an array of strings",
        )),
    }
}

fn item_draft(item: &Fields<'_>) -> Check<()> {
    if item.has("id") {
        item.non_empty("id")?;
    }
    bullet_points(item)
}

fn custom_item_draft(item: &Fields<'_>) -> Check<()> {
    for field in ["title", "content", "date", "url"] {
        item.optional_string(field)?;
    }
    Ok(())
}

fn object_list<'a>(
    f: &Fields<'a>,
    field: &str,
    check: impl Fn(&Fields<'_>) -> Check<()>,
) -> Check<()> {
    for (i, item) in f.array(field)?.iter().enumerate() {
        let prefix = format!("{}[{i}]", f.name(field));
        let obj = item
            .as_object()
            .ok_or_else(|| Violation::invalid(&prefix, "must be an object"))?;
        check(&Fields::nested(obj, &prefix))?;
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Per-action checks
// ────────────────────────────────────────────────────────────────────────────

type Validated = (Option<ChatAction>, Vec<ValidationError>);

/// Validates one candidate, returning the typed action (if it survived) and
/// every error found beneath it. Only batches can yield both.
fn validate_action(
    candidate: &Value,
    index: usize,
    path: &str,
    registry: &SectionRegistry,
) -> Validated {
    let reject = |action_type: Option<&str>,
                  kind: ValidationErrorKind,
                  field: Option<&str>,
                  message: String|
     -> Validated {
        let path = match field {
            Some(f) => format!("{path}.{f}"),
            None => path.to_string(),
        };
        let error = ValidationError {
            index,
            path,
            action_type: action_type.map(str::to_string),
            kind,
            message,
        };
        (None, vec![error])
    };

    let Some(obj) = candidate.as_object() else {
        return reject(
            None,
            ValidationErrorKind::NotAnObject,
            None,
            "action must be an object".to_string(),
        );
    };

    let action_type = match obj.get("type") {
        Some(Value::String(t)) if ACTION_TYPES.contains(&t.as_str()) => t.as_str(),
        Some(Value::String(t)) => {
            return reject(
                Some(t.as_str()),
                ValidationErrorKind::UnknownActionType,
                Some("type"),
                format!("unknown action type \"{t}\""),
            )
        }
        _ => {
            return reject(
                None,
                ValidationErrorKind::MissingField,
                Some("type"),
                "missing field `type`".to_string(),
            )
        }
    };

    let fields = Fields::new(obj);
    let violation = |v: Violation| -> Validated {
        reject(Some(action_type), v.kind, Some(v.field.as_str()), v.message)
    };

    if action_type == "batch" {
        let children = match fields.array("actions") {
            Ok(children) => children,
            Err(v) => return violation(v),
        };
        let mut actions = Vec::with_capacity(children.len());
        let mut errors = Vec::new();
        for (child_index, child) in children.iter().enumerate() {
            let child_path = format!("{path}.actions[{child_index}]");
            let (action, child_errors) = validate_action(child, index, &child_path, registry);
            actions.extend(action);
            errors.extend(child_errors);
        }
        // Nothing left to run: drop the batch, keep whatever errors emptied it.
        if actions.is_empty() {
            return (None, errors);
        }
        return (Some(ChatAction::Batch { actions }), errors);
    }

    if let Err(v) = check_fields(action_type, &fields, registry) {
        return violation(v);
    }

    // Null means absent, matching `Fields::has`.
    let payload: Map<String, Value> = obj
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    match serde_json::from_value::<ChatAction>(Value::Object(payload)) {
        Ok(action) => (Some(action), Vec::new()),
        Err(e) => violation(Violation::invalid("payload", e)),
    }
}

/// Structural checks first, then enum membership, per action type.
fn check_fields(action_type: &str, f: &Fields<'_>, registry: &SectionRegistry) -> Check<()> {
    match action_type {
        "toggleSection" => {
            f.non_empty("sectionId")?;
            f.boolean(f.first_present(&["visible", "enabled"])?)?;
        }
        "reorderSections" => {
            f.string_list("sectionOrder", false)?;
            if let Some(column) = f.optional_string("column")? {
                column_enum("column", column)?;
            }
        }
        "changeSectionVariant" => {
            let section_id = f.non_empty("sectionId")?;
            let variant = f.non_empty("variant")?;
            // Custom sections are not in the registry; the executor decides for those.
            if registry.contains(section_id) && !registry.is_valid_variant(section_id, variant) {
                return Err(Violation::bad_enum(
                    "variant",
                    variant,
                    registry.variants(section_id).iter().map(String::as_str),
                ));
            }
        }
        "renameSection" | "updateCustomSectionTitle" => {
            f.non_empty("sectionId")?;
            f.non_empty("title")?;
        }
        "moveSectionToColumn" => {
            f.non_empty("sectionId")?;
            let column = f.string("column")?;
            column_enum("column", column)?;
        }
        "updatePersonalInfo" => {
            let field = f.string("field")?;
            f.string("value")?;
            personal_info_enum("field", field)?;
        }
        "updatePersonalInfoBulk" => {
            let updates = f.object("updates")?;
            if updates.is_empty() {
                return Err(Violation::invalid("updates", "must not be empty"));
            }
            if let Some((key, _)) = updates.iter().find(|(_, v)| !v.is_string()) {
                return Err(Violation::invalid(
                    &format!("updates.{key}"),
                    "must be a string",
                ));
            }
            for key in updates.keys() {
                let field = personal_info_enum(&format!("updates.{key}"), key)?;
                if field == PersonalInfoField::Photo {
                    return Err(Violation::invalid(
                        "updates.photo",
                        "photo cannot be bulk-updated",
                    ));
                }
            }
        }
        "addItem" => {
            let section = f.string("section")?;
            let item = f.object("item")?;
            item_draft(&Fields::nested(item, "item"))?;
            f.optional_index("position")?;
            section_enum("section", section)?;
        }
        "updateItem" => {
            let section = f.string("section")?;
            f.non_empty("itemId")?;
            let updates = f.object("updates")?;
            bullet_points(&Fields::nested(updates, "updates"))?;
            section_enum("section", section)?;
        }
        "removeItem" => {
            let section = f.string("section")?;
            f.non_empty("itemId")?;
            section_enum("section", section)?;
        }
        "reorderItems" => {
            let section = f.string("section")?;
            f.string_list("itemIds", false)?;
            section_enum("section", section)?;
        }
        "replaceAllItems" => {
            let section = f.string("section")?;
            object_list(f, "items", item_draft)?;
            section_enum("section", section)?;
        }
        "addBullet" | "updateBullet" | "removeBullet" | "replaceBullets" => {
            f.non_empty(f.first_present(&["itemId", "experienceId"])?)?;
            let section = f.optional_string("section")?;
            match action_type {
                "addBullet" => {
                    f.non_empty("text")?;
                    f.optional_index("position")?;
                }
                "updateBullet" => {
                    f.index("bulletIndex")?;
                    f.non_empty("text")?;
                }
                "removeBullet" => {
                    f.index("bulletIndex")?;
                }
                _ => {
                    f.string_list("bullets", true)?;
                }
            }
            if let Some(section) = section {
                section_enum("section", section)?;
            }
        }
        "updateSetting" => {
            let key = f.string("key")?;
            let value = f.get("value")?;
            if !(value.is_boolean() || value.is_number() || value.is_string()) {
                return Err(Violation::invalid(
                    "value",
                    "must be a boolean, number or string",
                ));
            }
            let key = one_of(
                "key",
                key,
                SettingKey::parse,
                SettingKey::ALL.iter().map(|k| k.as_str()),
            )?;
            setting_value(key, value)?;
        }
        "updateThemeColor" => {
            let color_key = f.string("colorKey")?;
            hex_color("value", f.string("value")?)?;
            one_of(
                "colorKey",
                color_key,
                ColorKey::parse,
                ColorKey::ALL.iter().map(|k| k.as_str()),
            )?;
        }
        "updateBackgroundColor" => {
            let target = f.string("target")?;
            hex_color("value", f.string("value")?)?;
            one_of(
                "target",
                target,
                BackgroundTarget::parse,
                BackgroundTarget::ALL.iter().map(|t| t.as_str()),
            )?;
        }
        "updateHeaderConfig" => {
            let updates = f.object("updates")?;
            header_updates(&Fields::nested(updates, "updates"), registry)?;
        }
        "updateSectionConfig" => {
            let section_type = f.string("sectionType")?;
            f.object("updates")?;
            one_of(
                "sectionType",
                section_type,
                |s| ContentSection::parse(s).filter(|c| ContentSection::CONFIGURABLE.contains(c)),
                ContentSection::CONFIGURABLE.iter().map(|s| s.as_str()),
            )?;
        }
        "addCustomSection" => {
            f.non_empty("title")?;
            f.optional_string("content")?;
            if f.has("items") {
                object_list(f, "items", custom_item_draft)?;
            }
        }
        "addCustomSectionItem" => {
            f.non_empty("sectionId")?;
            let item = f.object("item")?;
            custom_item_draft(&Fields::nested(item, "item"))?;
        }
        "removeCustomSection" => {
            f.non_empty("sectionId")?;
        }
        other => {
            return Err(Violation::invalid(
                "type",
                format!("no checks registered for \"{other}\""),
            ));
        }
    }
    Ok(())
}

fn setting_value(key: SettingKey, value: &Value) -> Check<()> {
    match key {
        SettingKey::IncludeSocialLinks | SettingKey::IncludePhoto if !value.is_boolean() => Err(
            Violation::invalid("value", format!("{} must be a boolean", key.as_str())),
        ),
        SettingKey::DateFormat if !value.is_string() => {
            Err(Violation::invalid("value", "dateFormat must be a string"))
        }
        SettingKey::FontScale => match value.as_f64() {
            Some(scale) if FONT_SCALE_RANGE.contains(&scale) => Ok(()),
            _ => Err(Violation::invalid(
                "value",
                format!(
                    "fontScale must be a number between {} and {}",
                    FONT_SCALE_RANGE.start(),
                    FONT_SCALE_RANGE.end()
                ),
            )),
        },
        _ => Ok(()),
    }
}

fn header_updates(f: &Fields<'_>, registry: &SectionRegistry) -> Check<()> {
    for key in f.obj.keys() {
        if !f.has(key) {
            continue;
        }
        match key.as_str() {
            "variant" | "photoShape" | "photoPosition" | "photoSize" | "padding" => {
                f.string(key)?;
            }
            "showPhoto" | "showSocialLinks" => {
                f.boolean(key)?;
            }
            "backgroundColor" | "textColor" => {
                hex_color(&f.name(key), f.string(key)?)?;
            }
            _ => return Err(Violation::invalid(&f.name(key), "unknown header field")),
        }
    }

    if let Some(variant) = f.optional_string("variant")? {
        if !registry.is_valid_header_variant(variant) {
            return Err(Violation::bad_enum(
                &f.name("variant"),
                variant,
                registry.header_variants().iter().map(String::as_str),
            ));
        }
    }
    if let Some(shape) = f.optional_string("photoShape")? {
        let allowed = ["circle", "square", "rounded"];
        if !allowed.contains(&shape) {
            return Err(Violation::bad_enum(&f.name("photoShape"), shape, allowed));
        }
    }
    if let Some(position) = f.optional_string("photoPosition")? {
        let allowed = ["left", "right"];
        if !allowed.contains(&position) {
            return Err(Violation::bad_enum(
                &f.name("photoPosition"),
                position,
                allowed,
            ));
        }
    }
    Ok(())
}
