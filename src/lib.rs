//! SWC plugin that normalizes a story module's default export into a
//! Storybook meta object carrying a generated `title`.
//!
//! ```text
//! export default { component: Button };      ->  export default { component: Button, title: "..." };
//! (no default export)                        ->  ... export default { title: "..." };
//! export default () => <Button />;           ->  export const Default = () => <Button />;
//!                                                export default { title: "..." };
//! ```

mod config;
mod error;
mod locate;
mod rewrite;
mod title;

pub use config::{Config, IfTitleFound, NonObjectPolicy};
pub use error::{ConfigError, TitleError};
pub use locate::{DefaultExport, NonObjectForm, TransformState};
pub use rewrite::Outcome;
pub use title::{ConfiguredTitle, TitleResolver};

use swc_core::{
    common::errors::HANDLER,
    ecma::{
        ast::*,
        visit::{noop_visit_mut_type, VisitMut, VisitMutWith},
    },
    plugin::{
        metadata::TransformPluginMetadataContextKind, plugin_transform,
        proxies::TransformPluginProgramMetadata,
    },
};
use tracing::{debug, warn};

/// Locates the default export, resolves the title and applies the rewrite.
pub fn normalize_default_export(
    module: &mut Module,
    config: &Config,
    resolver: &dyn TitleResolver,
    filename: Option<&str>,
) -> Result<Outcome, TitleError> {
    TransformState::locate(module, config, filename).finalize(module, resolver)
}

// -----------------------------------------------------------------------------
// Visitor
// -----------------------------------------------------------------------------

/// Runs one pass per visited module; a fresh `TransformState` is built for each.
pub struct StoryTitleTransform<R> {
    config: Config,
    resolver: R,
    filename: Option<String>,
}

impl<R: TitleResolver> StoryTitleTransform<R> {
    pub fn new(config: Config, resolver: R) -> Self {
        Self {
            config,
            resolver,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }
}

impl<R: TitleResolver> VisitMut for StoryTitleTransform<R> {
    noop_visit_mut_type!();

    // Only top-level statements matter, so children are not visited.
    fn visit_mut_module(&mut self, m: &mut Module) {
        let filename = self.filename.as_deref();
        if let Err(err) = normalize_default_export(m, &self.config, &self.resolver, filename) {
            warn!(filename = filename.unwrap_or("unknown"), "{err}");
            HANDLER.with(|handler| handler.struct_span_err(err.span(), &err.to_string()).emit());
        }
    }
}

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

/// Applies the transform to a whole program. Scripts carry no export syntax
/// and are returned untouched.
pub fn transform_program(mut program: Program, config: Config, filename: Option<String>) -> Program {
    if matches!(program, Program::Script(_)) {
        debug!(
            filename = filename.as_deref().unwrap_or("unknown"),
            "script has no exports, skipping"
        );
        return program;
    }

    let mut transform = StoryTitleTransform::new(config, ConfiguredTitle).with_filename(filename);
    program.visit_mut_with(&mut transform);
    program
}

#[plugin_transform]
pub fn process_transform(program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let raw = metadata.get_transform_plugin_config().unwrap_or_default();
    let config = match Config::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("{err}");
            HANDLER.with(|handler| handler.err(&err.to_string()));
            return program;
        }
    };

    let filename = metadata.get_context(&TransformPluginMetadataContextKind::Filename);
    transform_program(program, config, filename)
}
