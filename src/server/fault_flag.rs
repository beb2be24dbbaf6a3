use crate::DataValidity;

/// Marks a module's outputs as degraded while it is set.
///
/// Every validity written while the flag is entered is forced to
/// [`DataValidity::Faulty`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataFaultFlag {
    faulty: bool,
}

impl DataFaultFlag {
    pub fn enter(&mut self) {
        self.faulty = true;
    }

    pub fn exit(&mut self) {
        self.faulty = false;
    }

    pub fn is_faulty(&self) -> bool {
        self.faulty
    }

    /// Validity to publish for data of validity `validity`
    pub fn validity_for(
        &self,
        validity: DataValidity,
    ) -> DataValidity {
        if self.faulty {
            DataValidity::Faulty
        } else {
            validity
        }
    }
}
