use crate::generator::Generation;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub spec: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Specification/code pairs from one interactive session, oldest first.
///
/// Owned by whichever front end runs the session and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, generation: &Generation) -> &HistoryEntry {
        self.entries.push(HistoryEntry {
            spec: generation.spec.clone(),
            code: generation.blocks.primary().to_string(),
            created_at: Utc::now(),
        });
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Display order: most recent first.
    pub fn newest_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, Extraction};
    use std::path::PathBuf;

    fn generation(spec: &str, reply: &str) -> Generation {
        let blocks = match extract(reply) {
            Extraction::Found(b) => b,
            Extraction::NoBlockFound => panic!("fixture has no block"),
        };
        Generation { spec: spec.to_string(), blocks, path: PathBuf::from("out/design.v") }
    }

    #[test]
    fn records_primary_block_only() {
        let mut history = History::new();
        let entry = history.record(&generation(
            "two modules",
            "```verilog\nmodule a;\n```\n```verilog\nmodule b;\n```",
        ));
        assert_eq!(entry.spec, "two modules");
        assert_eq!(entry.code, "\nmodule a;\n");
    }

    #[test]
    fn newest_first_and_latest() {
        let mut history = History::new();
        assert!(history.latest().is_none());

        history.record(&generation("first", "```verilog\n1\n```"));
        history.record(&generation("second", "```verilog\n2\n```"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().spec, "second");
        let specs: Vec<&str> = history.newest_first().map(|e| e.spec.as_str()).collect();
        assert_eq!(specs, vec!["second", "first"]);

        history.clear();
        assert!(history.is_empty());
    }
}
