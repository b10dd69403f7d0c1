use crate::domain::{AppError, ManagedPhase, RenderedPhase, extract_version};

/// Port producing the managed phase's name and script body.
pub trait PhaseTemplates {
    /// Render `variant` for a tool version and a scripts directory relative to SRCROOT.
    ///
    /// Rendering is pure: equal inputs always produce equal output.
    fn render(
        &self,
        variant: ManagedPhase,
        version: &str,
        scripts_path: &str,
    ) -> Result<RenderedPhase, AppError>;

    /// Render the current variant.
    fn render_current(&self, version: &str, scripts_path: &str) -> Result<RenderedPhase, AppError> {
        self.render(ManagedPhase::Current, version, scripts_path)
    }

    /// Version a rendered body was stamped with, if any.
    fn get_version(&self, body: &str) -> Option<String> {
        extract_version(body)
    }
}
