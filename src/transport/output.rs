//! Output side of a history module.
//!
//! Outputs are defined once through a [`ProcessVariableSink`] and published on
//! every update. [`OutputRegistry`] is the in-process sink: each output is a
//! `tokio::sync::watch` channel downstream consumers can subscribe to.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
#[cfg(test)]
use mockall::automock;
use tokio::sync::watch;
use tracing::debug;
use tracing::trace;

use crate::history::normalize_path;
use crate::DataValidity;
use crate::Result;
use crate::SetupError;
use crate::TransportError;
use crate::UserType;
use crate::ValueArray;
use crate::ValueKind;

/// Output handle factory and publisher
#[cfg_attr(test, automock)]
pub trait ProcessVariableSink: Send + Sync {
    /// Declares an output. Must be called once per name before publishing.
    fn define(
        &self,
        name: &str,
        kind: ValueKind,
        length: usize,
        description: &str,
        tags: &BTreeSet<String>,
    ) -> Result<()>;

    /// Withdraws an output defined earlier. Unknown names are ignored.
    fn undefine(
        &self,
        name: &str,
    );

    /// Publishes the full content of an output
    fn publish(
        &self,
        name: &str,
        data: ValueArray,
        validity: DataValidity,
    ) -> Result<()>;
}

/// Last published state of an output
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedArray {
    pub data: ValueArray,
    pub validity: DataValidity,
    /// Number of publications so far, 0 before the first one
    pub version: u64,
}

#[derive(Debug)]
struct OutputChannel {
    kind: ValueKind,
    length: usize,
    description: String,
    tags: BTreeSet<String>,
    tx: watch::Sender<PublishedArray>,
}

/// In-process [`ProcessVariableSink`] backed by watch channels
#[derive(Debug, Default)]
pub struct OutputRegistry {
    outputs: DashMap<String, OutputChannel>,
}

impl OutputRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Receiver following every publication of `name`
    pub fn subscribe(
        &self,
        name: &str,
    ) -> Option<watch::Receiver<PublishedArray>> {
        self.outputs.get(&normalize_path(name)).map(|output| output.tx.subscribe())
    }

    /// Current state of `name`
    pub fn read(
        &self,
        name: &str,
    ) -> Option<PublishedArray> {
        self.outputs.get(&normalize_path(name)).map(|output| output.tx.borrow().clone())
    }

    /// Current content of `name` as `Vec<T>`, `None` if unknown or of another kind
    pub fn read_as<T: UserType>(
        &self,
        name: &str,
    ) -> Option<Vec<T>> {
        self.read(name).and_then(|published| published.data.as_slice::<T>().map(|values| values.to_vec()))
    }

    pub fn tags(
        &self,
        name: &str,
    ) -> Option<BTreeSet<String>> {
        self.outputs.get(&normalize_path(name)).map(|output| output.tags.clone())
    }

    pub fn description(
        &self,
        name: &str,
    ) -> Option<String> {
        self.outputs.get(&normalize_path(name)).map(|output| output.description.clone())
    }

    pub fn kind(
        &self,
        name: &str,
    ) -> Option<ValueKind> {
        self.outputs.get(&normalize_path(name)).map(|output| output.kind)
    }

    /// Sorted names of all defined outputs
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.outputs.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl ProcessVariableSink for OutputRegistry {
    fn define(
        &self,
        name: &str,
        kind: ValueKind,
        length: usize,
        description: &str,
        tags: &BTreeSet<String>,
    ) -> Result<()> {
        let name = normalize_path(name);
        if self.outputs.contains_key(&name) {
            return Err(SetupError::DuplicateOutput { name }.into());
        }

        debug!(%name, %kind, length, "define output");
        let (tx, _rx) = watch::channel(PublishedArray {
            data: ValueArray::defaults(kind, length),
            validity: DataValidity::Faulty,
            version: 0,
        });
        self.outputs.insert(
            name,
            OutputChannel {
                kind,
                length,
                description: description.to_string(),
                tags: tags.clone(),
                tx,
            },
        );
        Ok(())
    }

    fn undefine(
        &self,
        name: &str,
    ) {
        let name = normalize_path(name);
        if self.outputs.remove(&name).is_some() {
            debug!(%name, "undefine output");
        }
    }

    fn publish(
        &self,
        name: &str,
        data: ValueArray,
        validity: DataValidity,
    ) -> Result<()> {
        let name = normalize_path(name);
        let output = self
            .outputs
            .get(&name)
            .ok_or_else(|| TransportError::UnknownOutput(name.clone()))?;

        if data.kind() != output.kind {
            return Err(TransportError::TypeMismatch {
                name,
                expected: output.kind,
                actual: data.kind(),
            }
            .into());
        }
        if data.len() != output.length {
            return Err(TransportError::ElementCountMismatch {
                name,
                expected: output.length,
                actual: data.len(),
            }
            .into());
        }

        trace!(%name, ?validity, "publish output");
        // send_modify notifies receivers even when nobody is subscribed yet
        output.tx.send_modify(|published| {
            published.data = data;
            published.validity = validity;
            published.version += 1;
        });
        Ok(())
    }
}

/// Publishable handle of one defined output
#[derive(Clone)]
pub struct ArrayOutput {
    name: String,
    sink: Arc<dyn ProcessVariableSink>,
}

impl std::fmt::Debug for ArrayOutput {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ArrayOutput").field("name", &self.name).finish()
    }
}

impl ArrayOutput {
    /// Defines the output on `sink` and returns its handle
    pub fn define(
        sink: Arc<dyn ProcessVariableSink>,
        name: &str,
        kind: ValueKind,
        length: usize,
        description: &str,
        tags: &BTreeSet<String>,
    ) -> Result<Self> {
        let name = normalize_path(name);
        sink.define(&name, kind, length, description, tags)?;
        Ok(Self { name, sink })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Withdraws the output from its sink
    pub fn undefine(&self) {
        self.sink.undefine(&self.name)
    }

    pub fn write(
        &self,
        data: ValueArray,
        validity: DataValidity,
    ) -> Result<()> {
        self.sink.publish(&self.name, data, validity)
    }
}
