use crate::locate::TransformState;

/// Computes the title for one module. Called exactly once per pass.
pub trait TitleResolver {
    fn resolve(&self, state: &TransformState<'_>) -> String;
}

impl<F> TitleResolver for F
where
    F: Fn(&TransformState<'_>) -> String,
{
    fn resolve(&self, state: &TransformState<'_>) -> String {
        self(state)
    }
}

/// Uses the configured `title` seed verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredTitle;

impl TitleResolver for ConfiguredTitle {
    fn resolve(&self, state: &TransformState<'_>) -> String {
        state.config().title.clone()
    }
}
