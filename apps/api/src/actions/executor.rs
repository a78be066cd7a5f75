//! Action executor: applies validated actions to a private working copy.
//!
//! Atomicity is per action: each action runs against a staging clone of the
//! working copy and is committed only if it succeeds, so a failed action never
//! leaks partial writes. The caller's snapshot is never touched.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actions::describe::{describe_action, format_action_type};
use crate::actions::registry::SectionRegistry;
use crate::actions::validator::is_hex_color;
use crate::actions::{
    BackgroundTarget, ChatAction, ColorKey, CustomItemDraft, ItemDraft, SettingKey, SettingValue,
    FONT_SCALE_RANGE,
};
use crate::models::{
    ContentSection, CustomSection, CustomSectionItem, FieldValue, Item, ResumeDocument,
    SectionLayout,
};

const CUSTOM_SECTIONS: &str = "customSections";

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionError {
    #[error("no item with id \"{id}\" in {collection}")]
    UnknownTargetId { collection: String, id: String },

    #[error("invalid ordering for {collection}: {detail}")]
    InvalidPermutation { collection: String, detail: String },

    #[error("bullet index {index} is out of range for item \"{item_id}\" ({len} bullets)")]
    IndexOutOfRange {
        item_id: String,
        index: usize,
        len: usize,
    },

    #[error("unknown section \"{section_id}\"")]
    UnknownSectionId { section_id: String },

    #[error("field `{field}` must be {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("id \"{id}\" is already in use in {collection}")]
    DuplicateId { collection: String, id: String },

    #[error("section \"{section_id}\" does not support variant \"{variant}\"")]
    UnsupportedVariant { section_id: String, variant: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    Succeeded,
    Failed {
        reason: String,
        error: ExecutionError,
    },
    /// Batch only: some children applied, some did not.
    PartiallyApplied { applied: usize, failed: usize },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    /// Position within the enclosing list (top level or parent batch).
    pub index: usize,
    pub action_type: String,
    /// Short display label for the action type.
    pub label: String,
    pub description: String,
    pub outcome: ActionOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_results: Vec<ActionResult>,
}

impl ActionResult {
    /// Non-batch results beneath (or at) this one, depth-first.
    pub fn leaves(&self) -> Vec<&ActionResult> {
        if self.action_type == "batch" {
            self.sub_results.iter().flat_map(ActionResult::leaves).collect()
        } else {
            vec![self]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub resulting_document: ResumeDocument,
    pub per_action_results: Vec<ActionResult>,
    /// Document areas written by successful actions, first-touch order.
    pub modified_sections: Vec<String>,
}

impl ExecutionReport {
    /// Leaf actions (batch children flattened) that failed.
    pub fn failures(&self) -> Vec<&ActionResult> {
        self.per_action_results
            .iter()
            .flat_map(ActionResult::leaves)
            .filter(|r| !r.outcome.is_success())
            .collect()
    }

    pub fn applied_count(&self) -> usize {
        self.per_action_results
            .iter()
            .flat_map(ActionResult::leaves)
            .filter(|r| r.outcome.is_success())
            .count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Applies `actions` in order to a copy of `document`.
///
/// Each action sees the effects of every earlier successful action. Failed
/// actions are skipped and reported; execution always runs to the end.
pub fn execute(
    document: &ResumeDocument,
    actions: &[ChatAction],
    registry: &SectionRegistry,
) -> ExecutionReport {
    let mut executor = Executor {
        working: document.clone(),
        registry,
        retired: HashSet::new(),
        modified: Vec::new(),
    };

    let per_action_results: Vec<ActionResult> = actions
        .iter()
        .enumerate()
        .map(|(index, action)| executor.run(index, action))
        .collect();

    let report = ExecutionReport {
        resulting_document: executor.working,
        per_action_results,
        modified_sections: executor.modified,
    };
    info!(
        "Executed {} actions: {} applied, {} failed",
        actions.len(),
        report.applied_count(),
        report.failures().len()
    );
    report
}

/// (scope, id) pairs. Scope is a collection name, `customSections`, or
/// `customSections/<id>` for a custom section's items.
type IdKey = (String, String);

struct Executor<'r> {
    working: ResumeDocument,
    registry: &'r SectionRegistry,
    /// Ids removed earlier in this execution; never handed out again.
    retired: HashSet<IdKey>,
    modified: Vec<String>,
}

impl Executor<'_> {
    fn run(&mut self, index: usize, action: &ChatAction) -> ActionResult {
        let description = describe_action(action);

        if let ChatAction::Batch { actions } = action {
            let sub_results: Vec<ActionResult> = actions
                .iter()
                .enumerate()
                .map(|(i, child)| self.run(i, child))
                .collect();
            let failed = sub_results
                .iter()
                .filter(|r| !r.outcome.is_success())
                .count();
            let outcome = if failed == 0 {
                ActionOutcome::Succeeded
            } else {
                ActionOutcome::PartiallyApplied {
                    applied: sub_results.len() - failed,
                    failed,
                }
            };
            return ActionResult {
                index,
                action_type: action.action_type().to_string(),
                label: format_action_type(action.action_type()).to_string(),
                description,
                outcome,
                sub_results,
            };
        }

        let mut staging = self.working.clone();
        let outcome = match self.apply(&mut staging, action) {
            Ok(()) => {
                debug!("Applied {}: {description}", action.action_type());
                self.retire_removed_ids(&staging);
                self.working = staging;
                for area in action.touched_areas() {
                    if !self.modified.contains(&area) {
                        self.modified.push(area);
                    }
                }
                ActionOutcome::Succeeded
            }
            Err(error) => {
                warn!("Skipped {} at index {index}: {error}", action.action_type());
                ActionOutcome::Failed {
                    reason: error.to_string(),
                    error,
                }
            }
        };

        ActionResult {
            index,
            action_type: action.action_type().to_string(),
            label: format_action_type(action.action_type()).to_string(),
            description,
            outcome,
            sub_results: Vec::new(),
        }
    }

    fn retire_removed_ids(&mut self, next: &ResumeDocument) {
        let after = id_index(next);
        let removed: Vec<IdKey> = id_index(&self.working)
            .into_iter()
            .filter(|key| !after.contains(key))
            .collect();
        self.retired.extend(removed);
    }

    fn is_retired(&self, scope: &str, id: &str) -> bool {
        self.retired.contains(&(scope.to_string(), id.to_string()))
    }

    /// A new id with `prefix`, unused in `scope` and never retired there.
    fn fresh_id(&self, prefix: &str, scope: &str, taken: &HashSet<String>) -> String {
        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let id = format!("{prefix}-{}", &suffix[..12]);
            if !taken.contains(&id) && !self.is_retired(scope, &id) {
                return id;
            }
        }
    }

    /// Applies one action to `doc`. Batches applied through here are
    /// all-or-nothing; `run` expands them instead so children are reported.
    fn apply(&self, doc: &mut ResumeDocument, action: &ChatAction) -> Result<(), ExecutionError> {
        match action {
            // ── Sections ──────────────────────────────────────────────────
            ChatAction::ToggleSection {
                section_id,
                visible,
            } => {
                self.require_section(doc, section_id)?;
                layout_mut(doc, section_id).visible = *visible;
            }
            ChatAction::ReorderSections {
                section_order,
                column,
            } => {
                for id in section_order {
                    self.require_section(doc, id)?;
                    match doc.section_config.get(id) {
                        Some(layout) => {
                            if let Some(column) = column.filter(|c| *c != layout.column) {
                                return Err(ExecutionError::InvalidPermutation {
                                    collection: format!("{} column", column.as_str()),
                                    detail: format!(
                                        "\"{id}\" is in the {} column",
                                        layout.column.as_str()
                                    ),
                                });
                            }
                        }
                        None => {
                            let layout = layout_mut(doc, id);
                            layout.column = column.unwrap_or_default();
                        }
                    }
                }
                let current = doc.ordered_sections(*column);
                let order = lenient_permutation("sections", &current, section_order)?;
                // Splice the new order into the full sequence and renumber
                // densely; stored positions may tie (omitted `order`).
                let mut reordered = order.into_iter();
                let sequence: Vec<String> = doc
                    .ordered_sections(None)
                    .into_iter()
                    .map(|id| match current.contains(&id) {
                        true => reordered.next().unwrap_or(id),
                        false => id,
                    })
                    .collect();
                for (position, id) in (0u32..).zip(&sequence) {
                    if let Some(layout) = doc.section_config.get_mut(id) {
                        layout.order = position;
                    }
                }
            }
            ChatAction::ChangeSectionVariant {
                section_id,
                variant,
            } => {
                self.require_section(doc, section_id)?;
                if !self.registry.is_valid_variant(section_id, variant) {
                    return Err(ExecutionError::UnsupportedVariant {
                        section_id: section_id.clone(),
                        variant: variant.clone(),
                    });
                }
                layout_mut(doc, section_id).variant = Some(variant.clone());
            }
            ChatAction::RenameSection { section_id, title } => {
                self.require_section(doc, section_id)?;
                if let Some(custom) = doc.custom_section_mut(section_id) {
                    custom.title = title.clone();
                }
                layout_mut(doc, section_id).title = Some(title.clone());
            }
            ChatAction::MoveSectionToColumn { section_id, column } => {
                self.require_section(doc, section_id)?;
                layout_mut(doc, section_id).column = *column;
            }

            // ── Personal info ─────────────────────────────────────────────
            ChatAction::UpdatePersonalInfo { field, value } => {
                doc.personal_info.insert(*field, value.clone());
            }
            ChatAction::UpdatePersonalInfoBulk { updates } => {
                doc.personal_info
                    .extend(updates.iter().map(|(k, v)| (*k, v.clone())));
            }

            // ── Collection items ──────────────────────────────────────────
            ChatAction::AddItem {
                section,
                item,
                position,
            } => {
                let taken: HashSet<String> = doc.item_ids(*section).into_iter().collect();
                let item = self.materialize_item(*section, item, &taken)?;
                let items = doc.items_mut(*section);
                let at = position.map_or(items.len(), |p| p.min(items.len()));
                items.insert(at, item);
            }
            ChatAction::UpdateItem {
                section,
                item_id,
                updates,
            } => {
                let item = find_item_mut(doc, *section, item_id)?;
                apply_item_patch(item, updates)?;
            }
            ChatAction::RemoveItem { section, item_id } => {
                let items = doc
                    .collections
                    .get_mut(section)
                    .ok_or_else(|| unknown_target(*section, item_id))?;
                let at = items
                    .iter()
                    .position(|i| i.id == *item_id)
                    .ok_or_else(|| unknown_target(*section, item_id))?;
                items.remove(at);
            }
            ChatAction::ReorderItems { section, item_ids } => {
                let current = doc.item_ids(*section);
                let order = lenient_permutation(section.as_str(), &current, item_ids)?;
                let rank: HashMap<&str, usize> = order
                    .iter()
                    .enumerate()
                    .map(|(i, id)| (id.as_str(), i))
                    .collect();
                if let Some(items) = doc.collections.get_mut(section) {
                    items.sort_by_key(|item| {
                        rank.get(item.id.as_str()).copied().unwrap_or(usize::MAX)
                    });
                }
            }
            ChatAction::ReplaceAllItems { section, items } => {
                let replacement = self.replacement_items(*section, items)?;
                *doc.items_mut(*section) = replacement;
            }

            // ── Bullets ───────────────────────────────────────────────────
            ChatAction::AddBullet {
                item_id,
                section,
                text,
                position,
            } => {
                let bullets = bullets_mut(doc, *section, item_id)?;
                match *position {
                    Some(at) if at > bullets.len() => {
                        return Err(out_of_range(item_id, at, bullets.len()))
                    }
                    Some(at) => bullets.insert(at, text.clone()),
                    None => bullets.push(text.clone()),
                }
            }
            ChatAction::UpdateBullet {
                item_id,
                section,
                bullet_index,
                text,
            } => {
                let bullets = bullets_mut(doc, *section, item_id)?;
                let len = bullets.len();
                let slot = bullets
                    .get_mut(*bullet_index)
                    .ok_or_else(|| out_of_range(item_id, *bullet_index, len))?;
                *slot = text.clone();
            }
            ChatAction::RemoveBullet {
                item_id,
                section,
                bullet_index,
            } => {
                let bullets = bullets_mut(doc, *section, item_id)?;
                if *bullet_index >= bullets.len() {
                    return Err(out_of_range(item_id, *bullet_index, bullets.len()));
                }
                bullets.remove(*bullet_index);
            }
            ChatAction::ReplaceBullets {
                item_id,
                section,
                bullets,
            } => {
                *bullets_mut(doc, *section, item_id)? = bullets.clone();
            }

            // ── Settings ──────────────────────────────────────────────────
            ChatAction::UpdateSetting { key, value } => apply_setting(doc, *key, value)?,
            ChatAction::UpdateThemeColor { color_key, value } => {
                require_hex("value", value)?;
                let colors = &mut doc.settings.colors;
                match color_key {
                    ColorKey::Primary => colors.primary = Some(value.clone()),
                    ColorKey::Secondary => colors.secondary = Some(value.clone()),
                    ColorKey::HeaderBackground => {
                        colors.header_background = Some(value.clone());
                        doc.settings.header.background_color = Some(value.clone());
                    }
                    ColorKey::SidebarBackground => {
                        colors.sidebar_background = Some(value.clone());
                        doc.settings.background.sidebar = Some(value.clone());
                    }
                }
            }
            ChatAction::UpdateBackgroundColor { target, value } => {
                require_hex("value", value)?;
                let background = &mut doc.settings.background;
                let slot = match target {
                    BackgroundTarget::Sidebar => &mut background.sidebar,
                    BackgroundTarget::Page => &mut background.page,
                    BackgroundTarget::Section => &mut background.section,
                    BackgroundTarget::Accent => &mut background.accent,
                };
                *slot = Some(value.clone());
            }
            ChatAction::UpdateHeaderConfig { updates } => {
                if let Some(variant) = &updates.variant {
                    if !self.registry.is_valid_header_variant(variant) {
                        return Err(ExecutionError::UnsupportedVariant {
                            section_id: "header".to_string(),
                            variant: variant.clone(),
                        });
                    }
                }
                for (field, color) in [
                    ("backgroundColor", &updates.background_color),
                    ("textColor", &updates.text_color),
                ] {
                    if let Some(color) = color {
                        require_hex(field, color)?;
                    }
                }
                doc.settings.header.merge(updates);
            }
            ChatAction::UpdateSectionConfig {
                section_type,
                updates,
            } => {
                if !ContentSection::CONFIGURABLE.contains(section_type) {
                    return Err(ExecutionError::UnknownSectionId {
                        section_id: section_type.as_str().to_string(),
                    });
                }
                doc.settings
                    .section_options
                    .entry(*section_type)
                    .or_default()
                    .extend(updates.iter().map(|(k, v)| (k.clone(), v.clone())));
            }

            // ── Custom sections ───────────────────────────────────────────
            ChatAction::AddCustomSection {
                title,
                content,
                items,
            } => {
                let taken: HashSet<String> =
                    doc.custom_sections.iter().map(|s| s.id.clone()).collect();
                let id = self.fresh_id("custom", CUSTOM_SECTIONS, &taken);
                let scope = custom_item_scope(&id);
                let mut section = CustomSection {
                    id: id.clone(),
                    title: title.clone(),
                    content: content.clone(),
                    items: Vec::with_capacity(items.len()),
                };
                for draft in items {
                    let taken = section.items.iter().map(|i| i.id.clone()).collect();
                    let item_id = self.fresh_id("item", &scope, &taken);
                    section.items.push(custom_item(item_id, draft));
                }
                let order = doc.next_section_order();
                doc.custom_sections.push(section);
                doc.section_config.insert(id, SectionLayout::at_order(order));
            }
            ChatAction::UpdateCustomSectionTitle { section_id, title } => {
                let custom = custom_section_mut(doc, section_id)?;
                custom.title = title.clone();
                if let Some(layout) = doc.section_config.get_mut(section_id) {
                    if layout.title.is_some() {
                        layout.title = Some(title.clone());
                    }
                }
            }
            ChatAction::AddCustomSectionItem { section_id, item } => {
                let scope = custom_item_scope(section_id);
                let taken: HashSet<String> = custom_section_mut(doc, section_id)?
                    .items
                    .iter()
                    .map(|i| i.id.clone())
                    .collect();
                let item_id = self.fresh_id("item", &scope, &taken);
                custom_section_mut(doc, section_id)?
                    .items
                    .push(custom_item(item_id, item));
            }
            ChatAction::RemoveCustomSection { section_id } => {
                let at = doc
                    .custom_sections
                    .iter()
                    .position(|s| s.id == *section_id)
                    .ok_or_else(|| ExecutionError::UnknownSectionId {
                        section_id: section_id.clone(),
                    })?;
                doc.custom_sections.remove(at);
                doc.section_config.remove(section_id);
            }

            ChatAction::Batch { actions } => {
                for child in actions {
                    self.apply(doc, child)?;
                }
            }
        }
        Ok(())
    }

    /// Registry sections and existing custom sections are addressable.
    fn require_section(&self, doc: &ResumeDocument, section_id: &str) -> Result<(), ExecutionError> {
        if self.registry.contains(section_id) || doc.custom_section(section_id).is_some() {
            Ok(())
        } else {
            Err(ExecutionError::UnknownSectionId {
                section_id: section_id.to_string(),
            })
        }
    }

    fn materialize_item(
        &self,
        section: ContentSection,
        draft: &ItemDraft,
        taken: &HashSet<String>,
    ) -> Result<Item, ExecutionError> {
        let id = match &draft.id {
            Some(id) if taken.contains(id) || self.is_retired(section.as_str(), id) => {
                return Err(ExecutionError::DuplicateId {
                    collection: section.as_str().to_string(),
                    id: id.clone(),
                })
            }
            Some(id) => id.clone(),
            None => self.fresh_id(section.id_prefix(), section.as_str(), taken),
        };
        Ok(Item {
            id,
            bullet_points: draft.bullet_points.clone(),
            fields: draft.fields.clone(),
        })
    }

    /// Builds a full replacement list. Supplied ids may keep existing items'
    /// identity but must be unique and not retired; the rest are generated.
    fn replacement_items(
        &self,
        section: ContentSection,
        drafts: &[ItemDraft],
    ) -> Result<Vec<Item>, ExecutionError> {
        let mut taken = HashSet::new();
        for id in drafts.iter().filter_map(|d| d.id.as_ref()) {
            if !taken.insert(id.clone()) || self.is_retired(section.as_str(), id) {
                return Err(ExecutionError::DuplicateId {
                    collection: section.as_str().to_string(),
                    id: id.clone(),
                });
            }
        }

        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = match &draft.id {
                Some(id) => id.clone(),
                None => {
                    let id = self.fresh_id(section.id_prefix(), section.as_str(), &taken);
                    taken.insert(id.clone());
                    id
                }
            };
            items.push(Item {
                id,
                bullet_points: draft.bullet_points.clone(),
                fields: draft.fields.clone(),
            });
        }
        Ok(items)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn id_index(doc: &ResumeDocument) -> HashSet<IdKey> {
    let mut keys = HashSet::new();
    for (section, items) in &doc.collections {
        for item in items {
            keys.insert((section.as_str().to_string(), item.id.clone()));
        }
    }
    for custom in &doc.custom_sections {
        keys.insert((CUSTOM_SECTIONS.to_string(), custom.id.clone()));
        let scope = custom_item_scope(&custom.id);
        for item in &custom.items {
            keys.insert((scope.clone(), item.id.clone()));
        }
    }
    keys
}

fn custom_item_scope(section_id: &str) -> String {
    format!("{CUSTOM_SECTIONS}/{section_id}")
}

/// Layout entry for `section_id`, created at the next free position if absent.
fn layout_mut<'d>(doc: &'d mut ResumeDocument, section_id: &str) -> &'d mut SectionLayout {
    let order = doc.next_section_order();
    doc.section_config
        .entry(section_id.to_string())
        .or_insert_with(|| SectionLayout::at_order(order))
}

/// `requested` first, then every omitted id of `current` in its prior order.
/// Unknown or repeated ids are rejected.
fn lenient_permutation(
    collection: &str,
    current: &[String],
    requested: &[String],
) -> Result<Vec<String>, ExecutionError> {
    let invalid = |detail: String| ExecutionError::InvalidPermutation {
        collection: collection.to_string(),
        detail,
    };
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !current.contains(id) {
            return Err(invalid(format!("unknown id \"{id}\"")));
        }
        if !seen.insert(id.as_str()) {
            return Err(invalid(format!("id \"{id}\" appears more than once")));
        }
    }
    let mut order = requested.to_vec();
    order.extend(
        current
            .iter()
            .filter(|id| !seen.contains(id.as_str()))
            .cloned(),
    );
    Ok(order)
}

fn unknown_target(section: ContentSection, id: &str) -> ExecutionError {
    ExecutionError::UnknownTargetId {
        collection: section.as_str().to_string(),
        id: id.to_string(),
    }
}

fn out_of_range(item_id: &str, index: usize, len: usize) -> ExecutionError {
    ExecutionError::IndexOutOfRange {
        item_id: item_id.to_string(),
        index,
        len,
    }
}

fn find_item_mut<'d>(
    doc: &'d mut ResumeDocument,
    section: ContentSection,
    id: &str,
) -> Result<&'d mut Item, ExecutionError> {
    doc.collections
        .get_mut(&section)
        .and_then(|items| items.iter_mut().find(|i| i.id == id))
        .ok_or_else(|| unknown_target(section, id))
}

fn bullets_mut<'d>(
    doc: &'d mut ResumeDocument,
    section: ContentSection,
    item_id: &str,
) -> Result<&'d mut Vec<String>, ExecutionError> {
    Ok(find_item_mut(doc, section, item_id)?
        .bullet_points
        .get_or_insert_with(Vec::new))
}

fn custom_section_mut<'d>(
    doc: &'d mut ResumeDocument,
    section_id: &str,
) -> Result<&'d mut CustomSection, ExecutionError> {
    doc.custom_section_mut(section_id)
        .ok_or_else(|| ExecutionError::UnknownSectionId {
            section_id: section_id.to_string(),
        })
}

fn custom_item(id: String, draft: &CustomItemDraft) -> CustomSectionItem {
    CustomSectionItem {
        id,
        title: draft.title.clone(),
        content: draft.content.clone(),
        date: draft.date.clone(),
        url: draft.url.clone(),
    }
}

/// Shallow merge. `id` is never patched; `bulletPoints` must be a string list
/// or null (which clears it).
fn apply_item_patch(
    item: &mut Item,
    updates: &BTreeMap<String, FieldValue>,
) -> Result<(), ExecutionError> {
    for (field, value) in updates {
        match field.as_str() {
            "id" => {}
            "bulletPoints" => {
                item.bullet_points = match value {
                    FieldValue::Null => None,
                    other => Some(other.to_text_list().ok_or_else(|| {
                        ExecutionError::TypeMismatch {
                            field: "bulletPoints".to_string(),
                            expected: "an array of strings".to_string(),
                        }
                    })?),
                };
            }
            _ => {
                item.fields.insert(field.clone(), value.clone());
            }
        }
    }
    Ok(())
}

fn require_hex(field: &str, value: &str) -> Result<(), ExecutionError> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(ExecutionError::TypeMismatch {
            field: field.to_string(),
            expected: "a hex color".to_string(),
        })
    }
}

fn apply_setting(
    doc: &mut ResumeDocument,
    key: SettingKey,
    value: &SettingValue,
) -> Result<(), ExecutionError> {
    let mismatch = |expected: &str| ExecutionError::TypeMismatch {
        field: key.as_str().to_string(),
        expected: expected.to_string(),
    };
    let settings = &mut doc.settings;
    match (key, value) {
        (SettingKey::IncludeSocialLinks, SettingValue::Flag(on)) => {
            settings.include_social_links = *on
        }
        (SettingKey::IncludePhoto, SettingValue::Flag(on)) => settings.include_photo = *on,
        (SettingKey::DateFormat, SettingValue::Text(format)) => {
            settings.date_format = Some(format.clone())
        }
        (SettingKey::FontScale, SettingValue::Number(scale))
            if FONT_SCALE_RANGE.contains(scale) =>
        {
            settings.font_scale = *scale
        }
        (SettingKey::IncludeSocialLinks | SettingKey::IncludePhoto, _) => {
            return Err(mismatch("a boolean"))
        }
        (SettingKey::DateFormat, _) => return Err(mismatch("a string")),
        (SettingKey::FontScale, _) => return Err(mismatch("a number between 0.5 and 2.0")),
    }
    Ok(())
}
