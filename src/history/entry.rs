//! Per-variable history state.
//!
//! A [`MonitoredVariable`] couples the module side input of one variable with
//! its [`HistoryEntry`]: one ring buffer per element, each published through
//! its own output. The registry stores them type-erased as [`HistorySlot`]s.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::trace;

use crate::constants::TIME_STAMPS_DESCRIPTION;
use crate::ArrayOutput;
use crate::ArrayPushInput;
use crate::DataValidity;
use crate::Error;
use crate::HistoryBuffer;
use crate::HistoryNaming;
use crate::Observation;
use crate::ProcessVariableSink;
use crate::Result;
use crate::SourceId;
use crate::UserType;
use crate::ValueKind;

/// One ring buffer together with the output it is published on
#[derive(Debug)]
pub(crate) struct HistoryOutput<T> {
    buffer: HistoryBuffer<T>,
    handle: ArrayOutput,
}

impl<T: UserType> HistoryOutput<T> {
    pub(crate) fn define(
        sink: &Arc<dyn ProcessVariableSink>,
        name: &str,
        length: usize,
        description: &str,
        tags: &BTreeSet<String>,
    ) -> Result<Self> {
        let handle = ArrayOutput::define(sink.clone(), name, T::KIND, length, description, tags)?;
        Ok(Self {
            buffer: HistoryBuffer::new(length),
            handle,
        })
    }

    pub(crate) fn name(&self) -> &str {
        self.handle.name()
    }

    pub(crate) fn undefine(&self) {
        self.handle.undefine()
    }

    #[cfg(test)]
    pub(crate) fn buffer(&self) -> &HistoryBuffer<T> {
        &self.buffer
    }

    /// Appends `value` and publishes the whole window
    pub(crate) fn push_and_write(
        &mut self,
        value: T,
        validity: DataValidity,
    ) -> Result<()> {
        self.buffer.push(value);
        trace!(output = %self.name(), "rotate history");
        self.write(validity)
    }

    pub(crate) fn write(
        &self,
        validity: DataValidity,
    ) -> Result<()> {
        self.handle.write(T::into_array(self.buffer.to_vec()), validity)
    }
}

/// History outputs of one monitored variable, one per element
#[derive(Debug)]
pub(crate) struct HistoryEntry<T> {
    data: Vec<HistoryOutput<T>>,
    time_stamps: Vec<HistoryOutput<u64>>,
}

impl<T: UserType> HistoryEntry<T> {
    /// Defines every data (and time stamp) output of `variable` on `sink`.
    ///
    /// If one definition fails, the outputs defined before it are withdrawn.
    pub(crate) fn define(
        sink: &Arc<dyn ProcessVariableSink>,
        naming: &HistoryNaming,
        variable: &str,
        n_elements: usize,
        history_length: usize,
    ) -> Result<Self> {
        let mut entry = Self {
            data: Vec::with_capacity(n_elements),
            time_stamps: Vec::new(),
        };
        if let Err(e) = entry.define_outputs(sink, naming, variable, n_elements, history_length) {
            entry.undefine();
            return Err(e);
        }
        Ok(entry)
    }

    fn define_outputs(
        &mut self,
        sink: &Arc<dyn ProcessVariableSink>,
        naming: &HistoryNaming,
        variable: &str,
        n_elements: usize,
        history_length: usize,
    ) -> Result<()> {
        let tags = BTreeSet::from([naming.internal_tag()]);
        for names in naming.output_names(variable, n_elements) {
            self.data
                .push(HistoryOutput::define(sink, &names.data, history_length, "", &tags)?);
            if let Some(name) = names.time_stamps {
                self.time_stamps.push(HistoryOutput::define(
                    sink,
                    &name,
                    history_length,
                    TIME_STAMPS_DESCRIPTION,
                    &tags,
                )?);
            }
        }
        Ok(())
    }

    /// Withdraws every output of the entry from its sink
    pub(crate) fn undefine(&self) {
        for output in &self.data {
            output.undefine();
        }
        for output in &self.time_stamps {
            output.undefine();
        }
    }

    pub(crate) fn with_time_stamps(&self) -> bool {
        !self.time_stamps.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn data(&self) -> &[HistoryOutput<T>] {
        &self.data
    }

    #[cfg(test)]
    pub(crate) fn time_stamps(&self) -> &[HistoryOutput<u64>] {
        &self.time_stamps
    }

    pub(crate) fn output_count(&self) -> usize {
        self.data.len() + self.time_stamps.len()
    }

    /// Rotates every element buffer in and publishes it
    pub(crate) fn record(
        &mut self,
        values: &[T],
        now_secs: u64,
        validity: DataValidity,
    ) -> Result<()> {
        let with_time_stamps = self.with_time_stamps();
        for (i, value) in values.iter().enumerate() {
            let output = self
                .data
                .get_mut(i)
                .ok_or_else(|| Error::Fatal(format!("no history buffer for element {i}")))?;
            output.push_and_write(value.clone(), validity)?;

            if with_time_stamps {
                let output = self
                    .time_stamps
                    .get_mut(i)
                    .ok_or_else(|| Error::Fatal(format!("no time stamp buffer for element {i}")))?;
                output.push_and_write(now_secs, validity)?;
            }
        }
        Ok(())
    }

    pub(crate) fn write_all(
        &self,
        validity: DataValidity,
    ) -> Result<()> {
        for output in &self.data {
            output.write(validity)?;
        }
        for output in &self.time_stamps {
            output.write(validity)?;
        }
        Ok(())
    }
}

/// Type-erased view of a [`MonitoredVariable`]
pub(crate) trait HistorySlot: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ValueKind;

    fn source_id(&self) -> SourceId;

    fn n_elements(&self) -> usize;

    fn output_count(&self) -> usize;

    /// Takes over `observation` and publishes the rotated buffers
    fn apply(
        &mut self,
        observation: &Observation,
        now_secs: u64,
    ) -> Result<()>;

    /// Publishes every buffer unchanged
    fn publish_all(
        &self,
        validity: DataValidity,
    ) -> Result<()>;

    /// Withdraws every output from the sink
    fn undefine(&self);
}

/// A variable under history together with its input
#[derive(Debug)]
pub(crate) struct MonitoredVariable<T> {
    input: ArrayPushInput<T>,
    entry: HistoryEntry<T>,
}

impl<T: UserType> MonitoredVariable<T> {
    pub(crate) fn new(
        input: ArrayPushInput<T>,
        entry: HistoryEntry<T>,
    ) -> Self {
        Self { input, entry }
    }

    #[cfg(test)]
    pub(crate) fn entry(&self) -> &HistoryEntry<T> {
        &self.entry
    }
}

impl<T: UserType> HistorySlot for MonitoredVariable<T> {
    fn name(&self) -> &str {
        self.input.name()
    }

    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn source_id(&self) -> SourceId {
        self.input.id()
    }

    fn n_elements(&self) -> usize {
        self.input.n_elements()
    }

    fn output_count(&self) -> usize {
        self.entry.output_count()
    }

    fn apply(
        &mut self,
        observation: &Observation,
        now_secs: u64,
    ) -> Result<()> {
        self.input
            .receive(observation)
            .map_err(|e| Error::Fatal(format!("history of '{}': {}", self.input.name(), e)))?;
        self.entry
            .record(self.input.values(), now_secs, self.input.validity())
    }

    fn publish_all(
        &self,
        validity: DataValidity,
    ) -> Result<()> {
        self.entry.write_all(validity)
    }

    fn undefine(&self) {
        self.entry.undefine()
    }
}
