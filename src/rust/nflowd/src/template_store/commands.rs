use crate::template::{OptionTemplate, StoredTemplate, Template};
use std::net::IpAddr;
use tokio::sync::oneshot;

/// Outcome of a template lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateLookup {
    Template(Template),
    Options(OptionTemplate),
    NotFound,
}

impl From<Option<&StoredTemplate>> for TemplateLookup {
    fn from(stored: Option<&StoredTemplate>) -> Self {
        match stored {
            Some(StoredTemplate::Data(t)) => TemplateLookup::Template(t.clone()),
            Some(StoredTemplate::Options(t)) => TemplateLookup::Options(t.clone()),
            None => TemplateLookup::NotFound,
        }
    }
}

pub enum TemplateCommand {
    Write {
        exporter: IpAddr,
        template_id: u16,
        template: StoredTemplate,
        reply: oneshot::Sender<()>,
    },
    Read {
        exporter: IpAddr,
        template_id: u16,
        reply: oneshot::Sender<TemplateLookup>,
    },
}
