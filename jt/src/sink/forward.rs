//! Bridge from the synchronous tracking callback to an async sink

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{FacetRecord, FacetSink};
use crate::domain::{CheckpointFacet, JobId};

/// Default capacity of the forwarding channel (records)
pub const DEFAULT_FORWARD_CAPACITY: usize = 256;

/// Build a tracking callback that queues records for a forwarder
///
/// A full or closed channel is reported as a callback error, which the
/// tracker logs and counts.
pub fn channel_callback(
    job_id: JobId,
    tx: mpsc::Sender<FacetRecord>,
) -> impl Fn(&CheckpointFacet) -> eyre::Result<()> + Send + Sync + 'static {
    move |facet: &CheckpointFacet| {
        let record = FacetRecord::new(job_id.clone(), *facet);
        tx.try_send(record).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => eyre::eyre!("Facet forward queue full"),
            mpsc::error::TrySendError::Closed(_) => eyre::eyre!("Facet forwarder stopped"),
        })
    }
}

/// Drain `rx` into `sink` until every sender is dropped
///
/// Returns the number of records delivered successfully.
pub fn spawn_forwarder(sink: Box<dyn FacetSink>, mut rx: mpsc::Receiver<FacetRecord>) -> JoinHandle<u64> {
    debug!(sink_type = sink.sink_type(), "spawn_forwarder: called");
    tokio::spawn(async move {
        let mut delivered = 0u64;
        while let Some(record) = rx.recv().await {
            let payload = match record.to_payload() {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize facet record");
                    continue;
                }
            };

            match sink.send(&payload).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(job_id = %record.job_id, sink_type = sink.sink_type(), error = %e, "Failed to deliver facet record"),
            }
        }
        debug!(delivered, "spawn_forwarder: channel closed");
        delivered
    })
}
