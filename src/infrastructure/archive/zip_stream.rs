use async_zip::{base::write::ZipFileWriter, Compression, ZipEntryBuilder};
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tokio::io::DuplexStream;
use tokio_util::io::ReaderStream;

use crate::{entities::archive::ArchiveEntry, settings::AppConfig};

/// Bytes buffered between the zip writer and the HTTP body.
const PIPE_CAPACITY: usize = 64 * 1024;

#[derive(Clone)]
pub struct ZipStreamer {
    http: Client,
}

impl ZipStreamer {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.archive_fetch_timeout_secs))
            .build()?;

        Ok(ZipStreamer { http })
    }

    /// Starts writing the archive in a background task and returns the
    /// readable end. Entries are fetched one at a time; an entry that cannot
    /// be fetched is skipped. Dropping the stream stops further fetches.
    pub fn stream(&self, entries: Vec<ArchiveEntry>) -> ReaderStream<DuplexStream> {
        let (writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
        let http = self.http.clone();

        tokio::spawn(async move {
            let total = entries.len();
            let mut zip = ZipFileWriter::with_tokio(writer);
            let mut written = 0usize;

            for entry in entries {
                let data = match fetch(&http, &entry.url).await {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::warn!(entry = %entry.name, error = %e, "Skipping archive entry");
                        continue;
                    }
                };

                // images are already compressed
                let builder = ZipEntryBuilder::new(entry.name.into(), Compression::Stored);
                if let Err(e) = zip.write_entry_whole(builder, &data).await {
                    tracing::info!(error = %e, written, total, "Archive client went away");
                    return;
                }
                written += 1;
            }

            match zip.close().await {
                Ok(_) => tracing::info!(written, total, "Archive finished"),
                Err(e) => tracing::info!(error = %e, written, total, "Archive client went away"),
            }
        });

        ReaderStream::new(reader)
    }
}

async fn fetch(http: &Client, url: &str) -> Result<Bytes, reqwest::Error> {
    http.get(url).send().await?.error_for_status()?.bytes().await
}
