use crate::config::{Config, MAX_SPEC_SIZE};
use crate::error::{ErrorCode, GenError, Result};
use crate::extract::{extract, CodeBlocks, Extraction};
use crate::invoke::ModelInvoker;
use crate::logger::Logger;
use crate::persist::save_code;
use crate::prompts::build_prompt;
use std::path::PathBuf;

/// Outcome of one successful specification → file round trip.
#[derive(Debug, Clone)]
pub struct Generation {
    pub spec: String,
    pub blocks: CodeBlocks,
    pub path: PathBuf,
}

impl Generation {
    pub fn code(&self) -> &str {
        self.blocks.primary()
    }
}

pub struct Generator<M: ModelInvoker> {
    model: M,
    out_dir: PathBuf,
    file_name: String,
}

impl<M: ModelInvoker> Generator<M> {
    pub fn new(model: M, config: &Config) -> Self {
        Self {
            model,
            out_dir: config.out_dir.clone(),
            file_name: config.file_name.clone(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.file_name)
    }

    /// Runs one prompt → model → extract → persist pass. The model is not
    /// contacted unless `spec` has non-whitespace content within bounds.
    pub fn generate(&self, spec: &str, logger: &Logger) -> Result<Generation> {
        validate_spec(spec)?;
        logger.info("generator", "validate", &format!("spec accepted ({} bytes)", spec.len()));

        let prompt = build_prompt(spec);
        let reply = self.model.generate(&prompt).map_err(|e| {
            logger.error("invoke", "generate", &e.to_string());
            e
        })?;
        logger.info("invoke", "generate", &format!("reply received ({} bytes)", reply.len()));

        let blocks = match extract(&reply) {
            Extraction::Found(blocks) => blocks,
            Extraction::NoBlockFound => {
                logger.error("extract", "scan", "no verilog fence in reply");
                return Err(GenError::Extraction {
                    code: ErrorCode::NoCodeFound,
                    message: "No Verilog code block found in model reply".to_string(),
                    context: format!("reply of {} bytes", reply.len()),
                });
            }
        };
        if blocks.dropped() > 0 {
            logger.info(
                "extract",
                "scan",
                &format!("{} block(s) found, keeping the first", blocks.len()),
            );
        }

        let path = save_code(&self.out_dir, &self.file_name, &blocks)?;
        logger.info("persist", "save_code", &format!("wrote {}", path.display()));

        Ok(Generation { spec: spec.to_string(), blocks, path })
    }
}

fn validate_spec(spec: &str) -> Result<()> {
    if spec.trim().is_empty() {
        return Err(GenError::Validation {
            code: ErrorCode::EmptyInput,
            message: "Specification is empty".to_string(),
            context: "spec".to_string(),
        });
    }
    if spec.len() > MAX_SPEC_SIZE {
        return Err(GenError::Validation {
            code: ErrorCode::BoundsExceeded,
            message: format!("Specification exceeds max size {}", MAX_SPEC_SIZE),
            context: "spec".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::FakeModel;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn setup(replies: Vec<Result<String>>) -> (TempDir, Generator<Arc<FakeModel>>, Arc<FakeModel>) {
        let tmp = TempDir::new().unwrap();
        let fake = Arc::new(FakeModel::new(replies));
        let config = Config::new("k").with_out_dir(tmp.path().join("out"));
        let generator = Generator::new(fake.clone(), &config);
        (tmp, generator, fake)
    }

    fn logger() -> Logger {
        Logger::capturing(1, Arc::new(Mutex::new(String::new())))
    }

    #[test]
    fn counter_example_round_trip() {
        let (_tmp, generator, fake) =
            setup(vec![Ok("```verilog\nmodule x; endmodule\n```".to_string())]);

        let gen = generator
            .generate("8-bit synchronous up-counter with async reset", &logger())
            .unwrap();

        assert_eq!(gen.blocks.as_slice(), &["\nmodule x; endmodule\n".to_string()]);
        assert_eq!(fs::read_to_string(&gen.path).unwrap(), "\nmodule x; endmodule\n");
        assert_eq!(gen.path, generator.output_path());
        assert!(fake.prompts()[0].ends_with("Spec: 8-bit synchronous up-counter with async reset"));
    }

    #[test]
    fn blank_spec_never_calls_model() {
        let (_tmp, generator, fake) = setup(vec![Ok("```verilog\nx\n```".to_string())]);
        for spec in ["", "   ", "\n\t "] {
            let err = generator.generate(spec, &logger()).unwrap_err();
            assert_eq!(err.code(), ErrorCode::EmptyInput);
        }
        assert_eq!(fake.call_count(), 0);
    }

    #[test]
    fn oversized_spec_is_rejected() {
        let (_tmp, generator, fake) = setup(vec![]);
        let spec = "a".repeat(MAX_SPEC_SIZE + 1);
        let err = generator.generate(&spec, &logger()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BoundsExceeded);
        assert_eq!(fake.call_count(), 0);
    }

    #[test]
    fn reply_without_code_writes_nothing() {
        let (_tmp, generator, _fake) = setup(vec![Ok("I need more detail.".to_string())]);
        let err = generator.generate("an adder", &logger()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoCodeFound);
        assert!(!generator.output_path().exists());
    }

    #[test]
    fn upstream_failure_propagates() {
        let (_tmp, generator, _fake) = setup(vec![Err(GenError::Upstream {
            code: ErrorCode::UpstreamStatus,
            message: "HTTP 403".to_string(),
            context: "gemini-2.5-flash".to_string(),
        })]);
        let err = generator.generate("an adder", &logger()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UpstreamStatus);
        assert!(!generator.output_path().exists());
    }
}
