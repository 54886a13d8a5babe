//! Fetching the external standings page.
//!
//! [`PageFetcher`] is the seam: the orchestrator and the scrape handler are
//! generic over it, so tests substitute a canned-HTML fetcher and never open
//! a socket.

use std::{future::Future, time::Duration};

use reqwest::Client;

use crate::{Error, Result};

/// Abstraction over fetching a page body by URL.
pub trait PageFetcher: Send + Sync {
  fn fetch<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// The production fetcher — a [`reqwest::Client`] with an identifying
/// `User-Agent` and a hard timeout so a hanging upstream cannot stall the
/// whole daily run.
#[derive(Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .user_agent(user_agent)
      .timeout(timeout)
      .build()?;
    Ok(Self { client })
  }
}

impl PageFetcher for HttpFetcher {
  async fn fetch(&self, url: &str) -> Result<String> {
    tracing::debug!(%url, "fetching standings page");
    let resp = self.client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status(status.as_u16()));
    }

    Ok(resp.text().await?)
  }
}
