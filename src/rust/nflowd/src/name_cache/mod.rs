//! Small key to name tables learned from option records: interface
//! index to interface name, application id to application name.
//!
//! Each table lives in its own actor task, shaped like the template
//! store.

mod commands;

pub use commands::NameCacheCommand;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameCacheError {
    #[error("the {0} name cache actor has stopped")]
    ActorGone(&'static str),
}

/// Cloneable handle to one name cache actor.
#[derive(Clone)]
pub struct NameCache<K> {
    label: &'static str,
    tx: mpsc::Sender<NameCacheCommand<K>>,
}

impl<K> NameCache<K> {
    pub async fn write(&self, key: K, name: String) -> Result<(), NameCacheError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(NameCacheCommand::Write { key, name, reply })
            .await
            .map_err(|_| NameCacheError::ActorGone(self.label))?;
        rx.await.map_err(|_| NameCacheError::ActorGone(self.label))
    }

    pub async fn read(&self, key: K) -> Result<Option<String>, NameCacheError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(NameCacheCommand::Read { key, reply })
            .await
            .map_err(|_| NameCacheError::ActorGone(self.label))?;
        rx.await.map_err(|_| NameCacheError::ActorGone(self.label))
    }
}

/// Interface index to interface name.
pub type InterfaceNames = NameCache<u32>;
/// `"<business>:<selector>"` application id to application name.
pub type ApplicationNames = NameCache<String>;

/// Splits a 32-bit application id into its classification engine
/// (high 8 bits) and selector (low 24 bits).
pub fn application_key(id: u32) -> String {
    format!("{}:{}", id / 16_777_216, id % 16_777_216)
}

/// Spawns a name cache actor. `label` only appears in logs and errors.
pub async fn name_cache_actor<K>(label: &'static str, cancel: CancellationToken) -> NameCache<K>
where
    K: Eq + Hash + Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel(128);
    tokio::spawn(name_cache(label, rx, cancel));
    NameCache { label, tx }
}

async fn name_cache<K>(
    label: &'static str,
    mut rx: mpsc::Receiver<NameCacheCommand<K>>,
    cancel: CancellationToken,
) where
    K: Eq + Hash + Display,
{
    let mut names: HashMap<K, String> = HashMap::new();
    loop {
        let command = tokio::select! {
            _ = cancel.cancelled() => break,
            command = rx.recv() => command,
        };
        let Some(command) = command else {
            break;
        };
        match command {
            NameCacheCommand::Write { key, name, reply } => {
                debug!("{label} name cache: {key} => {name}");
                names.insert(key, name);
                if reply.send(()).is_err() {
                    warn!("{label} name cache write acknowledgement dropped");
                }
            }
            NameCacheCommand::Read { key, reply } => {
                if reply.send(names.get(&key).cloned()).is_err() {
                    warn!("{label} name cache reply dropped");
                }
            }
        }
    }
    info!("{label} name cache stopped with {} entries", names.len());
}
