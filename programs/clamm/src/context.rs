use clamm_types::UserAlias;

use crate::config::ClammConfig;
use crate::ledger::{StateStore, TokenBank};
use crate::logic::WorkUnit;

/// Everything a handler needs: the authenticated caller, engine
/// configuration, and the two external ledgers.
pub struct Context<'a> {
    pub caller: UserAlias,
    pub config: &'a ClammConfig,
    pub store: &'a mut dyn StateStore,
    pub bank: &'a mut dyn TokenBank,
}

impl<'a> Context<'a> {
    pub fn new(
        caller: UserAlias,
        config: &'a ClammConfig,
        store: &'a mut dyn StateStore,
        bank: &'a mut dyn TokenBank,
    ) -> Self {
        Self {
            caller,
            config,
            store,
            bank,
        }
    }

    /// Fresh unit of work over this context's ledgers
    pub fn work_unit(&mut self) -> WorkUnit<'_> {
        WorkUnit::new(&mut *self.store, &mut *self.bank)
    }
}
