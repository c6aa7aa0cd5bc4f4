//! Port doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use socialnet::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Records every port call. Players are online unless marked offline.
#[derive(Debug, Default)]
pub struct RecordingPorts {
    pub events: Mutex<Vec<(PersonId, SocialEvent)>>,
    pub syncs: Mutex<Vec<PersonId>>,
    pub charges: Mutex<Vec<(PersonId, f64)>>,
    pub offline: Mutex<HashSet<PersonId>>,
    pub declines_charges: Mutex<bool>,
}

impl RecordingPorts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ports(self: &Arc<Self>) -> Ports {
        Ports::new(self.clone(), self.clone(), self.clone(), self.clone())
    }

    pub fn set_offline(&self, id: &PersonId) {
        self.offline.lock().unwrap().insert(id.clone());
    }

    pub fn events_for(&self, id: &PersonId) -> Vec<SocialEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == id)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn charges(&self) -> Vec<(PersonId, f64)> {
        self.charges.lock().unwrap().clone()
    }

    pub fn sync_count(&self, id: &PersonId) -> usize {
        self.syncs.lock().unwrap().iter().filter(|p| *p == id).count()
    }
}

#[async_trait]
impl PlayerDirectory for RecordingPorts {
    async fn resolve_online_player(&self, id: &PersonId) -> Option<OnlinePlayer> {
        if self.offline.lock().unwrap().contains(id) {
            None
        } else {
            Some(OnlinePlayer::new(id.clone(), id.to_string()))
        }
    }
}

#[async_trait]
impl Notifier for RecordingPorts {
    async fn notify(
        &self,
        person: &PersonId,
        event: &SocialEvent,
    ) -> std::result::Result<(), PortError> {
        self.events
            .lock()
            .unwrap()
            .push((person.clone(), event.clone()));
        Ok(())
    }
}

#[async_trait]
impl PermissionSync for RecordingPorts {
    async fn sync_permissions(&self, person: &PersonId) -> std::result::Result<(), PortError> {
        self.syncs.lock().unwrap().push(person.clone());
        Ok(())
    }
}

#[async_trait]
impl Economy for RecordingPorts {
    async fn has_funds(&self, _player: &OnlinePlayer, _amount: f64) -> bool {
        true
    }

    async fn charge(&self, player: &OnlinePlayer, amount: f64) -> bool {
        self.charges
            .lock()
            .unwrap()
            .push((player.id.clone(), amount));
        !*self.declines_charges.lock().unwrap()
    }
}

pub fn id(name: &str) -> PersonId {
    PersonId::new(name).unwrap()
}

/// In-memory engine with the given settings and everyone in `names` joined
pub async fn engine(
    builder: ConfigBuilder,
    names: &[&str],
) -> (RelationshipEngine, Arc<RecordingPorts>) {
    let config = builder.with_memory_storage().build().unwrap();
    let recorder = RecordingPorts::new();
    let engine = socialnet::init(&config, recorder.ports()).await.unwrap();
    for name in names {
        engine.join(name).await.unwrap();
    }
    (engine, recorder)
}
