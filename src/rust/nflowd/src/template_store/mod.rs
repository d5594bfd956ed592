//! Per-exporter template table, owned by a single actor task.
//!
//! Every read and write is a message with its own reply channel, so
//! any number of callers can share the table without locking. Writes
//! are acknowledged: once `write` returns, later reads see the template.

mod commands;
mod store;

pub use commands::{TemplateCommand, TemplateLookup};
use crate::template::StoredTemplate;
use std::net::IpAddr;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateStoreError {
    #[error("the template store actor has stopped")]
    ActorGone,
}

/// Cloneable handle to the template store actor.
#[derive(Clone)]
pub struct TemplateStore {
    tx: mpsc::Sender<TemplateCommand>,
}

impl TemplateStore {
    pub async fn write(
        &self,
        exporter: IpAddr,
        template_id: u16,
        template: StoredTemplate,
    ) -> Result<(), TemplateStoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(TemplateCommand::Write {
                exporter,
                template_id,
                template,
                reply,
            })
            .await
            .map_err(|_| TemplateStoreError::ActorGone)?;
        rx.await.map_err(|_| TemplateStoreError::ActorGone)
    }

    pub async fn read(
        &self,
        exporter: IpAddr,
        template_id: u16,
    ) -> Result<TemplateLookup, TemplateStoreError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(TemplateCommand::Read {
                exporter,
                template_id,
                reply,
            })
            .await
            .map_err(|_| TemplateStoreError::ActorGone)?;
        rx.await.map_err(|_| TemplateStoreError::ActorGone)
    }
}

/// Spawns the actor. It runs until `cancel` fires or every handle is
/// dropped.
pub async fn template_store_actor(cancel: CancellationToken) -> TemplateStore {
    let (tx, rx) = mpsc::channel(128);
    tokio::spawn(store::template_store(rx, cancel));
    TemplateStore { tx }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::template::{OptionTemplate, Template, TemplateField};
    use std::net::Ipv4Addr;

    fn exporter(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, last))
    }

    fn src_dst() -> Template {
        Template::new(vec![TemplateField::new(8, 4), TemplateField::new(12, 4)])
    }

    #[tokio::test]
    async fn written_template_reads_back() {
        let store = template_store_actor(CancellationToken::new()).await;
        store
            .write(exporter(1), 257, StoredTemplate::Data(src_dst()))
            .await
            .unwrap();
        assert_eq!(
            store.read(exporter(1), 257).await.unwrap(),
            TemplateLookup::Template(src_dst())
        );
        assert_eq!(
            store.read(exporter(2), 257).await.unwrap(),
            TemplateLookup::NotFound
        );
        assert_eq!(
            store.read(exporter(1), 258).await.unwrap(),
            TemplateLookup::NotFound
        );
    }

    #[tokio::test]
    async fn last_writer_wins() {
        let store = template_store_actor(CancellationToken::new()).await;
        store
            .write(exporter(1), 300, StoredTemplate::Data(src_dst()))
            .await
            .unwrap();
        let options = OptionTemplate {
            scope_fields: vec![TemplateField::new(10, 4)],
            option_fields: vec![TemplateField::new(82, 16)],
        };
        store
            .write(exporter(1), 300, StoredTemplate::Options(options.clone()))
            .await
            .unwrap();
        assert_eq!(
            store.read(exporter(1), 300).await.unwrap(),
            TemplateLookup::Options(options)
        );
    }

    #[tokio::test]
    async fn cancelled_store_reports_gone() {
        let cancel = CancellationToken::new();
        let store = template_store_actor(cancel.clone()).await;
        cancel.cancel();
        // The actor may take a moment to observe the cancellation.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(
            store.read(exporter(1), 257).await,
            Err(TemplateStoreError::ActorGone)
        );
    }
}
