use swc_core::common::Span;

/// Fatal conditions for a single module pass.
#[derive(Debug, thiserror::Error)]
pub enum TitleError {
    #[error("Default export object has a 'title' property; the title should, however, be generated. Please remove 'title'.")]
    DuplicateTitle { span: Span },

    #[error("Default export object does not have properties.")]
    MissingProperties { span: Span },

    #[error("Non-object default export found. Please change to named export.")]
    NonObjectExport { span: Span },

    #[error("Default export can't be changed to '{name}', as a '{name}' export already exists. Please rename '{name}'.")]
    RenameConflict { name: String, span: Span },
}

impl TitleError {
    /// Span of the default export the error points at.
    pub fn span(&self) -> Span {
        match self {
            TitleError::DuplicateTitle { span }
            | TitleError::MissingProperties { span }
            | TitleError::NonObjectExport { span }
            | TitleError::RenameConflict { span, .. } => *span,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid story title plugin config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("'renameDefaultExportsTo' must be a valid identifier, got '{name}'")]
    InvalidRenameTarget { name: String },

    #[error("'renameDefaultExportsTo' and 'wrapDefaultExportAsComponent' cannot be enabled together")]
    ConflictingPolicies,
}
