//! Input side of a history module.
//!
//! All inputs of one module share a single bounded queue:
//!
//! ```text
//! PvWriter<T> (producer A) ─┐
//! PvWriter<T> (producer B) ─┼─> mpsc::Sender<Observation> ─> ReadAnyGroup (module)
//! PvWriter<T> (producer C) ─┘
//! ```
//!
//! Each input owns a unique [`SourceId`]; the module demultiplexes the
//! observations it receives by that id.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::error::TrySendError;
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

/// Next source id, unique across all modules of the process
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of one input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        SourceId(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One new value of one input
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub source: SourceId,
    pub data: ValueArray,
    pub validity: DataValidity,
}

#[derive(Debug, Clone)]
struct InputBinding {
    id: SourceId,
    kind: ValueKind,
    n_elements: usize,
    tags: BTreeSet<String>,
}

/// Input handle factory of one module
///
/// Creates the module-side [`ArrayPushInput`]s and hands producers the
/// matching [`PvWriter`]s.
#[derive(Debug)]
pub struct InputHub {
    tx: mpsc::Sender<Observation>,
    bindings: DashMap<String, InputBinding>,
}

impl InputHub {
    /// Creates the hub together with the group the module reads from
    pub fn new(capacity: usize) -> (Self, ReadAnyGroup) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx,
                bindings: DashMap::new(),
            },
            ReadAnyGroup { rx },
        )
    }

    /// Creates the module side of a push input named `name`
    pub fn create_input<T: UserType>(
        &self,
        name: &str,
        n_elements: usize,
        tags: BTreeSet<String>,
    ) -> Result<ArrayPushInput<T>> {
        let name = normalize_path(name);
        if self.bindings.contains_key(&name) {
            return Err(SetupError::DuplicateVariable { name }.into());
        }

        let id = SourceId::next();
        debug!(%id, %name, kind = %T::KIND, n_elements, "create push input");
        self.bindings.insert(
            name.clone(),
            InputBinding {
                id,
                kind: T::KIND,
                n_elements,
                tags,
            },
        );

        Ok(ArrayPushInput {
            id,
            name,
            values: vec![T::default(); n_elements],
            validity: DataValidity::Faulty,
        })
    }

    /// Producer side of the input named `name`
    pub fn writer<T: UserType>(
        &self,
        name: &str,
    ) -> Result<PvWriter<T>> {
        let name = normalize_path(name);
        let binding = self
            .bindings
            .get(&name)
            .map(|binding| binding.value().clone())
            .ok_or_else(|| TransportError::UnknownVariable(name.clone()))?;

        if binding.kind != T::KIND {
            return Err(TransportError::TypeMismatch {
                name,
                expected: binding.kind,
                actual: T::KIND,
            }
            .into());
        }

        Ok(PvWriter {
            id: binding.id,
            name,
            n_elements: binding.n_elements,
            tx: self.tx.clone(),
            _marker: PhantomData,
        })
    }

    /// Forgets the input named `name`. Writers already handed out keep
    /// sending under the old id, which no module monitors any more.
    pub fn remove_input(
        &self,
        name: &str,
    ) -> bool {
        let name = normalize_path(name);
        let removed = self.bindings.remove(&name).is_some();
        if removed {
            debug!(%name, "remove push input");
        }
        removed
    }

    pub fn source_id(
        &self,
        name: &str,
    ) -> Option<SourceId> {
        self.bindings.get(&normalize_path(name)).map(|binding| binding.id)
    }

    pub fn tags(
        &self,
        name: &str,
    ) -> Option<BTreeSet<String>> {
        self.bindings.get(&normalize_path(name)).map(|binding| binding.tags.clone())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Module side of an input: holds the most recently received value
#[derive(Debug)]
pub struct ArrayPushInput<T> {
    id: SourceId,
    name: String,
    values: Vec<T>,
    validity: DataValidity,
}

impl<T: UserType> ArrayPushInput<T> {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n_elements(&self) -> usize {
        self.values.len()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&T> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn validity(&self) -> DataValidity {
        self.validity
    }

    /// Takes over the payload of an observation addressed to this input
    pub(crate) fn receive(
        &mut self,
        observation: &Observation,
    ) -> std::result::Result<(), TransportError> {
        let values = observation.data.as_slice::<T>().ok_or_else(|| TransportError::TypeMismatch {
            name: self.name.clone(),
            expected: T::KIND,
            actual: observation.data.kind(),
        })?;

        if values.len() != self.values.len() {
            return Err(TransportError::ElementCountMismatch {
                name: self.name.clone(),
                expected: self.values.len(),
                actual: values.len(),
            });
        }

        self.values.clone_from_slice(values);
        self.validity = observation.validity;
        Ok(())
    }
}

/// Producer side of an input
#[derive(Debug, Clone)]
pub struct PvWriter<T> {
    id: SourceId,
    name: String,
    n_elements: usize,
    tx: mpsc::Sender<Observation>,
    _marker: PhantomData<fn(T)>,
}

impl<T: UserType> PvWriter<T> {
    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sends a new value, waiting while the module queue is full
    pub async fn write(
        &self,
        values: Vec<T>,
    ) -> Result<()> {
        self.write_with_validity(values, DataValidity::Ok).await
    }

    pub async fn write_with_validity(
        &self,
        values: Vec<T>,
        validity: DataValidity,
    ) -> Result<()> {
        let observation = self.observation(values, validity)?;
        trace!(id = %self.id, name = %self.name, "write observation");
        self.tx
            .send(observation)
            .await
            .map_err(|_| TransportError::ChannelClosed(self.name.clone()).into())
    }

    /// Convenience for scalar inputs
    pub async fn write_scalar(
        &self,
        value: T,
    ) -> Result<()> {
        self.write(vec![value]).await
    }

    /// Sends a new value without waiting
    pub fn try_write(
        &self,
        values: Vec<T>,
    ) -> Result<()> {
        let observation = self.observation(values, DataValidity::Ok)?;
        self.tx.try_send(observation).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::QueueFull(self.name.clone()).into(),
            TrySendError::Closed(_) => TransportError::ChannelClosed(self.name.clone()).into(),
        })
    }

    fn observation(
        &self,
        values: Vec<T>,
        validity: DataValidity,
    ) -> Result<Observation> {
        if values.len() != self.n_elements {
            return Err(TransportError::ElementCountMismatch {
                name: self.name.clone(),
                expected: self.n_elements,
                actual: values.len(),
            }
            .into());
        }
        Ok(Observation {
            source: self.id,
            data: T::into_array(values),
            validity,
        })
    }
}

/// The single wait point of a module over all of its inputs
#[derive(Debug)]
pub struct ReadAnyGroup {
    rx: mpsc::Receiver<Observation>,
}

impl ReadAnyGroup {
    /// Waits for the next observation of any input, in delivery order.
    ///
    /// Returns `None` once every sender is gone.
    pub async fn read_any(&mut self) -> Option<Observation> {
        self.rx.recv().await
    }

    /// Next queued observation, if any, without waiting
    pub fn try_read_any(&mut self) -> Option<Observation> {
        match self.rx.try_recv() {
            Ok(observation) => Some(observation),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
