// -
// Defaults

/// Number of entries kept per history buffer
pub(crate) const DEFAULT_HISTORY_LENGTH: usize = 1200;

/// Tag identifying variables to be added to the history automatically
pub(crate) const DEFAULT_HISTORY_TAG: &str = "history";

/// Directory the generated history outputs are published under
pub(crate) const DEFAULT_PREFIX: &str = "History";

/// Capacity of the observation queue shared by all producers of one module
pub(crate) const DEFAULT_OBSERVATION_QUEUE_CAPACITY: usize = 1024;

// -
// Naming

/// Appended to the module name to build the tag of generated outputs
pub(crate) const INTERNAL_TAG_SUFFIX: &str = "_internal";

/// Appended to the internal tag when it would otherwise clash with the history tag
pub(crate) const MODULE_TAG_SUFFIX: &str = "_module";

/// Appended to a history output name to build its timestamp output name
pub(crate) const TIME_STAMPS_SUFFIX: &str = "_timeStamps";

pub(crate) const TIME_STAMPS_DESCRIPTION: &str = "Time stamps for entries in the history buffer";

// -
// Configuration

/// Environment variable prefix, e.g. `HISTORY__HISTORY__HISTORY_LENGTH=20`
pub(crate) const ENV_PREFIX: &str = "HISTORY";

/// Environment variable naming an optional configuration file
pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
