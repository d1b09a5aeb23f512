//! Application state shared across request handlers.

use protospec_jobs::CompileJobService;

pub(crate) struct AppState {
    pub(crate) jobs: CompileJobService,
}
