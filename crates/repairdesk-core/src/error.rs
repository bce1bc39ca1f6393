use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A query backing the report failed; no partial report is produced.
    #[error("failed to compute {report} report: {source}")]
    Compute {
        report: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ReportError {
    pub fn compute(report: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| Self::Compute { report, source }
    }

    pub fn report(&self) -> &'static str {
        match self {
            Self::Compute { report, .. } => report,
        }
    }
}
