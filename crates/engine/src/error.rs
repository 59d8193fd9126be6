use store::StoreError;
use thiserror::Error;

/// The single error a pipeline run can surface. Each variant names the
/// external collaborator that failed; the pipeline never returns a
/// partially populated profile instead of an error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Track source failed: {0}")]
    TrackSource(#[source] StoreError),

    #[error("Vessel profile source failed: {0}")]
    VesselProfile(#[source] StoreError),

    #[error("Environmental store failed for the {dataset} dataset: {source}")]
    Environmental {
        dataset: &'static str,
        #[source]
        source: StoreError,
    },
}
