use once_cell::sync::Lazy;
use regex::Regex;

/// Language tag that opens a fence the extractor accepts.
pub const FENCE_LANGUAGE: &str = "verilog";

// Non-greedy, `.` spans newlines. The tag must be followed by whitespace,
// which stays part of the captured interior.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?s)```{}(\s.*?)```", regex::escape(FENCE_LANGUAGE));
    Regex::new(&pattern).expect("fence pattern is a valid regex")
});

/// A non-empty, ordered run of fenced blocks taken from one model reply.
///
/// Only [`crate::extract::extract`] builds this, so holding one proves at least
/// one block exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlocks {
    blocks: Vec<String>,
}

impl CodeBlocks {
    /// The block that is previewed and persisted. Later blocks are kept for
    /// reporting only; output is always a single module.
    pub fn primary(&self) -> &str {
        &self.blocks[0]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[String] {
        &self.blocks
    }

    /// Number of blocks the single-module policy discards.
    pub fn dropped(&self) -> usize {
        self.blocks.len() - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(CodeBlocks),
    NoBlockFound,
}

/// Every fenced `verilog` interior in `reply`, in order of appearance.
///
/// Unterminated fences are simply not matched.
pub fn extract_blocks(reply: &str) -> Vec<String> {
    FENCE_RE
        .captures_iter(reply)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

pub fn extract(reply: &str) -> Extraction {
    let blocks = extract_blocks(reply);
    if blocks.is_empty() {
        Extraction::NoBlockFound
    } else {
        Extraction::Found(CodeBlocks { blocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fence_keeps_interior_verbatim() {
        let reply = "```verilog\nmodule x; endmodule\n```";
        assert_eq!(extract_blocks(reply), vec!["\nmodule x; endmodule\n".to_string()]);
    }

    #[test]
    fn no_fence_yields_nothing() {
        assert!(extract_blocks("Sorry, I cannot help with that.").is_empty());
        assert_eq!(extract("plain text"), Extraction::NoBlockFound);
    }

    #[test]
    fn multiple_fences_in_order() {
        let reply = "Here:\n```verilog\nmodule a; endmodule\n```\ntext\n```verilog\nmodule b; endmodule\n```\n";
        let blocks = extract_blocks(reply);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].contains("module a"));
        assert!(blocks[1].contains("module b"));
    }

    #[test]
    fn untagged_and_other_language_fences_are_ignored() {
        let reply = "```\nmodule a; endmodule\n```\n```python\nprint(1)\n```";
        assert!(extract_blocks(reply).is_empty());
    }

    #[test]
    fn tag_must_end_at_whitespace() {
        assert!(extract_blocks("```verilogams\nmodule x; endmodule\n```").is_empty());
        assert!(extract_blocks("```verilog2001\nmodule x; endmodule\n```").is_empty());
        assert_eq!(
            extract_blocks("```verilog module x; endmodule\n```"),
            vec![" module x; endmodule\n".to_string()]
        );
    }

    #[test]
    fn unterminated_fence_is_not_matched() {
        let reply = "```verilog\nmodule a;\n";
        assert!(extract_blocks(reply).is_empty());
    }

    #[test]
    fn nearest_closing_fence_wins() {
        let reply = "```verilog\nA\n```\nB\n```";
        assert_eq!(extract_blocks(reply), vec!["\nA\n".to_string()]);
    }

    #[test]
    fn found_exposes_primary_and_dropped() {
        let reply = "```verilog\nfirst\n``` ```verilog\nsecond\n```";
        match extract(reply) {
            Extraction::Found(blocks) => {
                assert_eq!(blocks.primary(), "\nfirst\n");
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks.dropped(), 1);
                assert!(!blocks.is_empty());
            }
            Extraction::NoBlockFound => panic!("expected blocks"),
        }
    }
}
