//! Registration of monitored variables.
//!
//! The registry is the only place where a runtime [`ValueKind`] is turned into
//! a concrete [`UserType`]. Everything downstream works on type-erased
//! [`HistorySlot`]s grouped by kind.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::history::normalize_path;
use crate::history::HistoryEntry;
use crate::history::HistorySlot;
use crate::history::MonitoredVariable;
use crate::metrics::MONITORED_VARIABLES;
use crate::DataValidity;
use crate::HistoryNaming;
use crate::InputHub;
use crate::ProcessVariable;
use crate::ProcessVariableSink;
use crate::Result;
use crate::SetupError;
use crate::SourceId;
use crate::UserType;
use crate::ValueKind;

/// Every variable a history module monitors
pub struct VariableRegistry {
    slots: BTreeMap<ValueKind, Vec<Box<dyn HistorySlot>>>,
    names: BTreeMap<ValueKind, Vec<String>>,
    overall: BTreeSet<String>,
    naming: HistoryNaming,
    history_length: usize,
    inputs: Arc<InputHub>,
    sink: Arc<dyn ProcessVariableSink>,
}

impl std::fmt::Debug for VariableRegistry {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("VariableRegistry")
            .field("names", &self.names)
            .field("naming", &self.naming)
            .field("history_length", &self.history_length)
            .finish()
    }
}

// The gauge tracks live registries only
impl Drop for VariableRegistry {
    fn drop(&mut self) {
        for (kind, names) in &self.names {
            MONITORED_VARIABLES
                .with_label_values(&[self.naming.module_name(), kind.as_str()])
                .sub(names.len() as i64);
        }
    }
}

impl VariableRegistry {
    pub fn new(
        naming: HistoryNaming,
        history_length: usize,
        inputs: Arc<InputHub>,
        sink: Arc<dyn ProcessVariableSink>,
    ) -> Self {
        Self {
            slots: BTreeMap::new(),
            names: BTreeMap::new(),
            overall: BTreeSet::new(),
            naming,
            history_length,
            inputs,
            sink,
        }
    }

    pub fn naming(&self) -> &HistoryNaming {
        &self.naming
    }

    /// Puts a variable under history.
    ///
    /// Returns `Ok(false)` if `check_tag` is set and `tags` lack the input tag.
    /// On error the registry is left unchanged.
    pub fn register(
        &mut self,
        name: &str,
        kind: ValueKind,
        n_elements: usize,
        check_tag: bool,
        tags: &BTreeSet<String>,
    ) -> Result<bool> {
        if check_tag && !tags.contains(self.naming.input_tag()) {
            return Ok(false);
        }

        let name = normalize_path(name);
        if self.overall.contains(&name) {
            return Err(SetupError::DuplicateVariable { name }.into());
        }
        if n_elements == 0 {
            return Err(SetupError::EmptyVariable { name }.into());
        }

        let slot = crate::with_user_type!(kind, T => self.allocate::<T>(&name, n_elements)?);
        debug!(%name, %kind, n_elements, outputs = slot.output_count(), "monitor variable");

        self.overall.insert(name.clone());
        self.names.entry(kind).or_default().push(name);
        self.slots.entry(kind).or_default().push(slot);
        MONITORED_VARIABLES
            .with_label_values(&[self.naming.module_name(), kind.as_str()])
            .inc();
        Ok(true)
    }

    pub fn register_variable(
        &mut self,
        variable: &ProcessVariable,
        check_tag: bool,
    ) -> Result<bool> {
        self.register(
            variable.fully_qualified_path(),
            variable.kind(),
            variable.n_elements(),
            check_tag,
            variable.tags(),
        )
    }

    fn allocate<T: UserType>(
        &self,
        name: &str,
        n_elements: usize,
    ) -> Result<Box<dyn HistorySlot>> {
        let entry = HistoryEntry::<T>::define(&self.sink, &self.naming, name, n_elements, self.history_length)?;
        let input = match self
            .inputs
            .create_input::<T>(name, n_elements, BTreeSet::from([self.naming.internal_tag()]))
        {
            Ok(input) => input,
            Err(e) => {
                entry.undefine();
                return Err(e);
            }
        };
        Ok(Box::new(MonitoredVariable::new(input, entry)))
    }

    /// Withdraws a monitored variable together with its input and outputs.
    ///
    /// Returns `false` if `name` is not monitored.
    pub fn unregister(
        &mut self,
        name: &str,
    ) -> bool {
        let name = normalize_path(name);
        if !self.overall.remove(&name) {
            return false;
        }

        for (kind, slots) in self.slots.iter_mut() {
            if let Some(index) = slots.iter().position(|slot| slot.name() == name) {
                slots.remove(index).undefine();
                if let Some(names) = self.names.get_mut(kind) {
                    names.retain(|n| *n != name);
                }
                MONITORED_VARIABLES
                    .with_label_values(&[self.naming.module_name(), kind.as_str()])
                    .dec();
                break;
            }
        }
        self.inputs.remove_input(&name);
        debug!(%name, "withdraw variable");
        true
    }

    /// Slot fed by `source`
    pub(crate) fn find_mut(
        &mut self,
        source: SourceId,
    ) -> Option<&mut Box<dyn HistorySlot>> {
        self.slots
            .values_mut()
            .flat_map(|slots| slots.iter_mut())
            .find(|slot| slot.source_id() == source)
    }

    /// Publishes every buffer of every variable unchanged
    pub fn publish_all(
        &self,
        validity: DataValidity,
    ) -> Result<()> {
        for slot in self.slots.values().flatten() {
            slot.publish_all(validity)?;
        }
        Ok(())
    }

    fn find(
        &self,
        name: &str,
    ) -> Option<&dyn HistorySlot> {
        let name = normalize_path(name);
        self.slots
            .values()
            .flatten()
            .find(|slot| slot.name() == name)
            .map(|slot| &**slot)
    }

    /// Number of monitored variables
    pub fn len(&self) -> usize {
        self.overall.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }

    /// Names of the variables of one kind, in registration order
    pub fn names(
        &self,
        kind: ValueKind,
    ) -> &[String] {
        self.names.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.overall.contains(&normalize_path(name))
    }

    /// Number of outputs (data and time stamps) generated for `name`
    pub fn output_count(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.find(name).map(|slot| slot.output_count())
    }

    pub fn source_id(
        &self,
        name: &str,
    ) -> Option<SourceId> {
        self.find(name).map(|slot| slot.source_id())
    }

    pub fn n_elements(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.find(name).map(|slot| slot.n_elements())
    }

    pub fn kind(
        &self,
        name: &str,
    ) -> Option<ValueKind> {
        self.find(name).map(|slot| slot.kind())
    }
}
