// Cross-cutting prompt fragments. Feature prompts live next to their feature.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every rewrite prompt.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
    Keep every fact from the original text. \
    Do NOT invent employers, numbers, dates, tools or achievements that are not present.";
