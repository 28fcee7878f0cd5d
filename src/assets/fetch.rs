//! Asset Fetching
//!
//! Asynchronous mesh loading. Bytes are fetched on a shared tokio runtime
//! (HTTP through reqwest with a 30 second request timeout, local paths
//! through `tokio::fs`), decoded on the blocking pool, and the results are
//! handed back to the frame loop over a channel.
//!
//! Every message carries the generation number of the load that produced
//! it; the receiving side drops messages from superseded loads, which is
//! what makes teardown and rapid reloads safe without any locking.

use std::sync::OnceLock;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::assets::ply;
use crate::assets::source::MeshSource;
use crate::errors::{Result, ViewerError};
use crate::resources::geometry::Geometry;

fn get_asset_runtime() -> &'static Runtime {
    static RUNTIME: OnceLock<Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create asset loader runtime"))
}

/// Events one load emits: zero or more `Progress` ticks followed by
/// exactly one terminal `Loaded` or `Failed`.
#[derive(Debug)]
pub enum LoadEvent {
    Progress { loaded: u64, total: Option<u64> },
    Loaded(Geometry),
    Failed(ViewerError),
}

/// A [`LoadEvent`] tagged with the generation of the load that sent it.
#[derive(Debug)]
pub struct LoadMessage {
    pub generation: u64,
    pub event: LoadEvent,
}

/// Starts an asynchronous load of `source`, reporting through `events`.
///
/// Returns immediately; the fetch and decode run on the shared runtime.
/// A dropped receiver simply discards the results, so the caller may
/// abandon a load at any time.
pub fn spawn_load(source: MeshSource, generation: u64, events: flume::Sender<LoadMessage>) {
    get_asset_runtime().spawn(async move {
        let progress = events.clone();
        let result = load_geometry(&source, move |loaded, total| {
            let _ = progress.send(LoadMessage {
                generation,
                event: LoadEvent::Progress { loaded, total },
            });
        })
        .await;

        let event = match result {
            Ok(geometry) => LoadEvent::Loaded(geometry),
            Err(e) => {
                log::warn!("Mesh load failed for {source}: {e}");
                LoadEvent::Failed(e)
            }
        };
        let _ = events.send(LoadMessage { generation, event });
    });
}

/// Fetches and decodes `source` on the caller's thread, blocking until the
/// geometry is ready. Intended for tools and tests; the viewer itself goes
/// through [`spawn_load`].
pub fn load_geometry_blocking(source: &MeshSource) -> Result<Geometry> {
    get_asset_runtime().block_on(load_geometry(source, |_, _| {}))
}

async fn load_geometry(
    source: &MeshSource,
    mut on_progress: impl FnMut(u64, Option<u64>),
) -> Result<Geometry> {
    let bytes = match source {
        MeshSource::Http(url) => fetch_http_bytes(url, &mut on_progress).await?,
        MeshSource::File(path) => {
            let data = tokio::fs::read(path).await?;
            on_progress(data.len() as u64, Some(data.len() as u64));
            data
        }
    };

    // Decoding can take a while on large meshes; keep it off the async
    // workers.
    tokio::task::spawn_blocking(move || ply::parse_ply(&bytes)).await?
}

async fn fetch_http_bytes(
    url: &str,
    on_progress: &mut impl FnMut(u64, Option<u64>),
) -> Result<Vec<u8>> {
    let url = url::Url::parse(url)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(ViewerError::HttpResponseError {
            status: resp.status().as_u16(),
        });
    }

    let total = resp.content_length();
    let mut bytes = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        bytes.extend_from_slice(&chunk);
        on_progress(bytes.len() as u64, total);
    }

    Ok(bytes)
}
