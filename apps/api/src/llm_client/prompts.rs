// Cross-cutting prompt fragments. The chat prompt in `chat/prompts.rs`
// assembles these together with the registry-derived catalog.

/// Output contract shared by every structured call.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT wrap it in markdown code fences.";

/// Items are addressed by the ids already present in the document.
pub const ID_GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: When updating, removing or reordering an existing item, use the exact `id` \
    shown in the current resume data. Never invent ids for existing items. \
    Never reuse the id of an item you removed in the same response.";

/// Keeps the model from rewriting parts of the resume nobody asked about.
pub const EDIT_SCOPE_INSTRUCTION: &str = "\
    CRITICAL: Only modify the parts of the resume the user asked about. \
    If the request is a question or is unclear, answer it and return an empty actions array.";

/// Writing rules for generated resume text.
pub const CONTENT_QUALITY_INSTRUCTION: &str = "\
    Summaries are 3-4 sentences focused on value and impact. \
    Bullet points start with a strong action verb and include a metric where the user gave one. \
    Never start a bullet with 'Responsible for'.";
