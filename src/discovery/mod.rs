//! Finds the variables a history module has to monitor.
//!
//! Two walks exist: a breadth-first search of the owning scope for variables
//! carrying the history tag, and an explicit walk over everything a source
//! (e.g. a device) exposes, optionally restricted to one of its directories.

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::history::is_within;
use crate::history::normalize_path;
use crate::ProcessVariable;
use crate::Result;
use crate::SetupError;
use crate::VariableFilter;
use crate::VariableModel;
use crate::VariableRegistry;

/// Registers every variable of `scope` tagged with the registry's input tag.
///
/// Returns the number of variables added. On error nothing of the walk stays
/// registered.
pub fn discover_tagged(
    module: &str,
    scope: &dyn VariableModel,
    registry: &mut VariableRegistry,
) -> Result<usize> {
    let filter = VariableFilter::tagged(registry.naming().input_tag());
    let mut added = Vec::new();

    let searched = scope.visit_breadth_first(&filter, &mut |variable: &ProcessVariable| -> Result<()> {
        if registry.register_variable(variable, true)? {
            added.push(variable.fully_qualified_path().to_string());
        }
        Ok(())
    });
    let searched = match searched {
        Ok(searched) => searched,
        Err(e) => {
            withdraw(registry, &added);
            return Err(e);
        }
    };

    if !searched {
        return Err(SetupError::SearchRootNotFound {
            module: module.to_string(),
        }
        .into());
    }

    if added.is_empty() {
        info!(
            "ServerHistory '{}': no variables added automatically. This is fine if sources are added manually.",
            module
        );
    }
    Ok(added.len())
}

/// Registers every variable of `source` located inside `submodule`, tags ignored.
///
/// An empty `submodule` accepts everything. Returns the number of variables
/// added. Either the whole source is registered or none of it.
pub fn discover_source(
    source: &dyn VariableModel,
    submodule: &str,
    registry: &mut VariableRegistry,
) -> Result<usize> {
    let submodule = normalize_path(submodule);
    let mut added = Vec::new();

    let visited = source.visit_adjacent(&VariableFilter::any(), &mut |variable: &ProcessVariable| -> Result<()> {
        if !is_within(variable.fully_qualified_path(), &submodule) {
            debug!(path = variable.fully_qualified_path(), %submodule, "skip variable outside submodule");
            return Ok(());
        }
        if registry.register_variable(variable, false)? {
            added.push(variable.fully_qualified_path().to_string());
        }
        Ok(())
    });
    if let Err(e) = visited {
        withdraw(registry, &added);
        return Err(e);
    }

    Ok(added.len())
}

/// Withdraws the variables a failed walk registered, newest first
fn withdraw(
    registry: &mut VariableRegistry,
    added: &[String],
) {
    if added.is_empty() {
        return;
    }
    warn!(count = added.len(), "registration failed, withdrawing variables of this walk");
    for name in added.iter().rev() {
        registry.unregister(name);
    }
}

#[cfg(test)]
mod discovery_test;
