//! Output naming and tagging of history variables.
//!
//! Every function here is a pure function of the module configuration and the
//! monitored variable, so names can be checked without running a module.

use crate::constants::INTERNAL_TAG_SUFFIX;
use crate::constants::MODULE_TAG_SUFFIX;
use crate::constants::TIME_STAMPS_SUFFIX;
use crate::HistoryConfig;

/// Normalizes a register path: empty segments are dropped and the result
/// always starts with a single `/`.
///
/// ```ignore
/// assert_eq!(normalize_path("Dummy//out/"), "/Dummy/out");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Joins two register paths into one normalized path
pub fn join_path(
    parent: &str,
    child: &str,
) -> String {
    normalize_path(&format!("{parent}/{child}"))
}

/// Whether `path` lies inside `directory`. Everything lies inside the root.
pub fn is_within(
    path: &str,
    directory: &str,
) -> bool {
    let directory = normalize_path(directory);
    if directory == "/" {
        return true;
    }
    normalize_path(path).starts_with(&format!("{directory}/"))
}

/// Names of the outputs buffering one element of a monitored variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub data: String,
    pub time_stamps: Option<String>,
}

/// Naming policy of one history module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryNaming {
    prefix: String,
    module_name: String,
    input_tag: String,
    with_time_stamps: bool,
}

impl HistoryNaming {
    pub fn new(
        prefix: impl Into<String>,
        module_name: impl Into<String>,
        input_tag: impl Into<String>,
        with_time_stamps: bool,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            module_name: module_name.into(),
            input_tag: input_tag.into(),
            with_time_stamps,
        }
    }

    pub fn from_config(
        module_name: &str,
        config: &HistoryConfig,
    ) -> Self {
        Self::new(
            config.prefix.as_str(),
            module_name,
            config.history_tag.as_str(),
            config.enable_time_stamps,
        )
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn input_tag(&self) -> &str {
        &self.input_tag
    }

    pub fn with_time_stamps(&self) -> bool {
        self.with_time_stamps
    }

    /// Tag attached to every input and output the module creates.
    ///
    /// It must never equal the input tag, otherwise the generated outputs
    /// would be discovered as new history sources.
    pub fn internal_tag(&self) -> String {
        let mut tag = format!("{}{}", self.module_name, INTERNAL_TAG_SUFFIX);
        if self.module_name == self.input_tag || tag == self.input_tag {
            tag.push_str(MODULE_TAG_SUFFIX);
        }
        tag
    }

    /// `<prefix>/<variable>`
    pub fn history_name(
        &self,
        variable: &str,
    ) -> String {
        join_path(&self.prefix, variable)
    }

    /// One entry per element: `<prefix>/<variable>` for scalars,
    /// `<prefix>/<variable>_<i>` for arrays, each with an optional
    /// `_timeStamps` companion.
    pub fn output_names(
        &self,
        variable: &str,
        n_elements: usize,
    ) -> Vec<OutputNames> {
        let history_name = self.history_name(variable);
        let data_names: Vec<String> = if n_elements == 1 {
            vec![history_name]
        } else {
            (0..n_elements).map(|i| format!("{history_name}_{i}")).collect()
        };

        data_names
            .into_iter()
            .map(|data| OutputNames {
                time_stamps: self
                    .with_time_stamps
                    .then(|| format!("{data}{TIME_STAMPS_SUFFIX}")),
                data,
            })
            .collect()
    }
}
