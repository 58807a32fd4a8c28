use std::rc::Rc;
use std::time::Duration;

use crate::data::DataStore;
use crate::session::{MockAuthenticator, SessionStore};
use crate::storage::StateStorage;

/// Application root: both state containers over one storage adapter.
pub struct Portal {
    pub session: SessionStore,
    pub data: DataStore,
}

impl Portal {
    pub fn open(storage: Rc<dyn StateStorage>, auth_delay: Duration) -> Self {
        Self {
            session: SessionStore::load(storage.clone(), Box::new(MockAuthenticator::new(auth_delay))),
            data: DataStore::load(storage),
        }
    }
}
