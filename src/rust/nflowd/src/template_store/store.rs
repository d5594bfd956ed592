use super::commands::{TemplateCommand, TemplateLookup};
use crate::template::StoredTemplate;
use std::collections::HashMap;
use std::net::IpAddr;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Templates per exporter, keyed by template id. Data and option
/// templates share the id space, so a re-sent id replaces either kind.
#[derive(Default)]
struct Templates {
    by_exporter: HashMap<IpAddr, HashMap<u16, StoredTemplate>>,
}

impl Templates {
    fn write(&mut self, exporter: IpAddr, template_id: u16, template: StoredTemplate) {
        let previous = self
            .by_exporter
            .entry(exporter)
            .or_default()
            .insert(template_id, template);
        if previous.is_some() {
            debug!("Replaced template {template_id} for exporter {exporter}");
        } else {
            debug!("Learned template {template_id} for exporter {exporter}");
        }
    }

    fn read(&self, exporter: IpAddr, template_id: u16) -> TemplateLookup {
        self.by_exporter
            .get(&exporter)
            .and_then(|templates| templates.get(&template_id))
            .into()
    }
}

pub(super) async fn template_store(mut rx: Receiver<TemplateCommand>, cancel: CancellationToken) {
    let mut templates = Templates::default();
    loop {
        let command = tokio::select! {
            _ = cancel.cancelled() => break,
            command = rx.recv() => command,
        };
        let Some(command) = command else {
            break;
        };
        match command {
            TemplateCommand::Write {
                exporter,
                template_id,
                template,
                reply,
            } => {
                templates.write(exporter, template_id, template);
                if reply.send(()).is_err() {
                    warn!("Template write acknowledgement dropped. Oneshot died?");
                }
            }
            TemplateCommand::Read {
                exporter,
                template_id,
                reply,
            } => {
                if reply.send(templates.read(exporter, template_id)).is_err() {
                    warn!("Template read reply dropped. Oneshot died?");
                }
            }
        }
    }
    info!(
        "Template store stopped with {} exporters known",
        templates.by_exporter.len()
    );
}
