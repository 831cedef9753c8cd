/// Fixed instruction prepended to every specification.
pub const SYSTEM_PROMPT: &str = "You are a hardware code generator. Produce synthesizable Verilog-2001.\n\
- No inferred latches.\n\
- Use synchronous always blocks with nonblocking assignments.\n\
- Explicit reset behavior.\n\
Return ONLY code blocks fenced with ```verilog.";

/// Joins the system instruction and the user's specification into the single
/// prompt string sent to the model.
#[must_use]
pub fn build_prompt(spec: &str) -> String {
    format!("{SYSTEM_PROMPT}\n\nSpec: {spec}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_ends_with_spec_line() {
        let prompt = build_prompt("8-bit synchronous up-counter with async reset");
        assert!(prompt.starts_with("You are a hardware code generator."));
        assert!(prompt.ends_with("\n\nSpec: 8-bit synchronous up-counter with async reset"));
    }

    #[test]
    fn system_prompt_asks_for_verilog_fences() {
        assert!(SYSTEM_PROMPT.contains("Verilog-2001.\n- No inferred latches."));
        assert!(SYSTEM_PROMPT.ends_with("fenced with ```verilog."));
    }
}
