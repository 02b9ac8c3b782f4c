//! Generate command - bring artifact state in line with the repository config
//!
//! Running the generator container is outside librarian; this records the
//! toolchain, container and source refs the next generation run will use.

use crate::commands::batch::{Outcome, Target, all_artifacts, run_batch};
use crate::core::context::WorkspaceContext;
use crate::core::error::LibrarianResult;
use crate::generate::sync;

pub fn run_generate(ctx: &WorkspaceContext, path: Option<&str>, all: bool) -> LibrarianResult<()> {
  let target = Target::select(path, all)?;
  let config = ctx.load_config()?;
  let store = ctx.artifact_store();

  match target {
    Target::One(key) => {
      let artifact = store.load_existing(&key)?;
      if !artifact.is_generated() {
        ctx.output.verbose("generate", &format!("{} is handwritten", key));
      }
      let doc = store.save(&key, &sync(&config, &artifact))?;
      ctx.format_document(&doc);
      ctx.output.success(&format!("Synced {}", key));
      Ok(())
    }
    Target::All => {
      let report = run_batch(ctx, "generate", all_artifacts(ctx)?, |key, artifact| {
        let doc = store.save(key, &sync(&config, &artifact))?;
        ctx.format_document(&doc);
        Ok(Outcome::Done("synced".to_string()))
      });
      report.finish(ctx, "synced")
    }
  }
}
