use std::sync::OnceLock;

use include_dir::{Dir, include_dir};
use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::{AppError, ManagedPhase, RenderedPhase};
use crate::ports::PhaseTemplates;

static PHASE_SCRIPTS: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/phase_scripts");

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Phase templates compiled into the binary and rendered with minijinja.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedPhaseTemplates;

impl EmbeddedPhaseTemplates {
    pub fn new() -> Self {
        Self
    }
}

fn template_file(variant: ManagedPhase) -> &'static str {
    match variant {
        ManagedPhase::Current => "lint.sh.j2",
        ManagedPhase::LegacyBootstrap => "bootstrap.sh.j2",
    }
}

impl PhaseTemplates for EmbeddedPhaseTemplates {
    fn render(
        &self,
        variant: ManagedPhase,
        version: &str,
        scripts_path: &str,
    ) -> Result<RenderedPhase, AppError> {
        if version.trim().is_empty() || version.contains('\n') {
            return Err(AppError::Template(format!("invalid tool version '{version}'")));
        }
        let name = template_file(variant);
        let source = PHASE_SCRIPTS
            .get_file(name)
            .and_then(|file| file.contents_utf8())
            .ok_or_else(|| AppError::Template(format!("missing phase template {name}")))?;

        let env = ENV.get_or_init(|| {
            let mut env = Environment::new();
            env.set_undefined_behavior(UndefinedBehavior::Strict);
            env.set_keep_trailing_newline(true);
            env
        });
        let body = env
            .render_str(
                source,
                context! {
                    phase_name => variant.name(),
                    version => version.trim(),
                    scripts_path => scripts_path,
                },
            )
            .map_err(|err| AppError::Template(format!("{name}: {err}")))?;

        Ok(RenderedPhase { variant, name: variant.name().to_string(), body })
    }
}
