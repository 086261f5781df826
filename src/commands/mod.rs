//! `add-model` and `remove-model`
//!
//! Each command is a fixed sequence of steps over the injected collaborators.
//! Nothing is rolled back: a failing step leaves earlier steps in place.

pub mod add;
pub mod remove;

use crate::config::MissingKeyPolicy;
use crate::error::ObjectStoreError;
use crate::package::PackageManager;
use crate::project::ProjectLayout;
use crate::weights::WeightHandler;

/// How `add_model` finished
#[derive(Debug)]
pub enum AddOutcome {
    /// Package installed, profile merged, app registered, weights fetched
    Added,
    /// Package installed but the default profile could not be fetched;
    /// no project file was touched
    ProfileUnavailable(ObjectStoreError),
    /// Everything but the weight download completed
    WeightsUnavailable(ObjectStoreError),
}

impl AddOutcome {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Model driver commands bound to one project
pub struct ModelCommands {
    layout: ProjectLayout,
    packages: Box<dyn PackageManager>,
    weights: Box<dyn WeightHandler>,
    missing_key: MissingKeyPolicy,
}

impl ModelCommands {
    #[must_use]
    pub fn new(
        layout: ProjectLayout,
        packages: Box<dyn PackageManager>,
        weights: Box<dyn WeightHandler>,
    ) -> Self {
        Self {
            layout,
            packages,
            weights,
            missing_key: MissingKeyPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_missing_key(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key = policy;
        self
    }
}
