// Shared prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Instruction against inventing data that is not in the source document.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only report facts that appear in the document. \
    If a field is not present, return null for scalars and an empty list for lists. \
    Never guess contact details, URLs or compensation figures.";
