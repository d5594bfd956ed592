use tokio::sync::oneshot;

pub enum NameCacheCommand<K> {
    Write {
        key: K,
        name: String,
        reply: oneshot::Sender<()>,
    },
    Read {
        key: K,
        reply: oneshot::Sender<Option<String>>,
    },
}
