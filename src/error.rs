use thiserror::Error;

/// Fatal simulation errors. Soft conditions (mutation rejections) are
/// represented by [`MutationOutcome`], not by this type.
#[derive(Debug, Error)]
pub enum SimError {
    /// An arc endpoint or kind assumption was violated. Fatal inside the
    /// integrator; carries the arc id and interaction kind for the report.
    #[error("graph shape violation on arc {arc} ({kind}): {detail}")]
    GraphShape {
        arc: usize,
        kind: &'static str,
        detail: String,
    },

    /// Non-positive step, negative time limit, or an empty rate interval.
    /// Checked at integration entry.
    #[error("numeric domain violation: {0}")]
    NumericDomain(String),

    /// An external emission process or output file failed. Soft: the
    /// experiment loop logs it and continues.
    #[error("output emission failed: {0}")]
    IoEmission(#[from] std::io::Error),
}

/// Result of a mutation operator. `CapReached` and `PreconditionMiss`
/// leave the network untouched; mutation is a sampling step and
/// rejection is part of its semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    CapReached,
    PreconditionMiss,
}

impl MutationOutcome {
    #[inline]
    pub fn applied(self) -> bool {
        self == MutationOutcome::Applied
    }
}
