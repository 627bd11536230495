use crate::{
    client::SuppressionApi,
    error::FetchPageError,
    models::{ListSuppressedDestinations, SuppressionPage, SuppressionReason},
    rate_limit::{FixedWindowLimiter, RateLimit},
};
use async_gen::gen;
use futures_core::Stream;

/// Where pagination stands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Paging(Option<String>),
    Done,
}

/// Pages through the suppression list, one rate limited call at a time.
#[derive(Debug)]
pub struct SuppressionListReader<A> {
    api: A,
    limiter: FixedWindowLimiter,
    reasons: Vec<SuppressionReason>,
    page_size: Option<u32>,
}

impl<A: SuppressionApi> SuppressionListReader<A> {
    /// Reads bounces and complaints at the default rate of one call every three seconds.
    pub fn new(api: A) -> Self {
        Self::with_rate_limit(api, RateLimit::default())
    }

    pub fn with_rate_limit(api: A, limit: RateLimit) -> Self {
        Self {
            api,
            limiter: FixedWindowLimiter::new(limit),
            reasons: ListSuppressedDestinations::default().reasons,
            page_size: None,
        }
    }

    pub fn reasons(mut self, reasons: Vec<SuppressionReason>) -> Self {
        self.reasons = reasons;
        self
    }

    pub fn page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Requests the page that `cursor` points at, or the first one.
    ///
    /// Blocks until the rate limit allows one more call.
    pub async fn fetch_page(
        &mut self,
        cursor: Option<&str>,
    ) -> Result<SuppressionPage, FetchPageError> {
        self.limiter.until_ready().await;
        let request = ListSuppressedDestinations {
            reasons: self.reasons.clone(),
            next_token: cursor.map(str::to_string),
            page_size: self.page_size,
        };
        self.api.list_suppressed_destinations(&request).await
    }

    /// Streams every suppressed address, in the order the service returns them.
    ///
    /// Pagination only stops on a page without a `NextToken`. The first
    /// error is yielded and ends the stream.
    ///
    /// ## Example
    ///
    /// ```no_run
    /// use futures_util::StreamExt;
    /// use ses_suppression_dump::{Client, SuppressionListReader};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::from_env(None, None).await?;
    ///     let mut addresses = std::pin::pin!(SuppressionListReader::new(client).drain());
    ///
    ///     while let Some(address) = addresses.next().await {
    ///         println!("{}", address?);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn drain(mut self) -> impl Stream<Item = Result<String, FetchPageError>> {
        let g = gen! {
            let mut state = State::Paging(None);
            let mut pages = 0usize;
            let mut addresses = 0usize;

            while let State::Paging(cursor) = &state {
                let page = match self.fetch_page(cursor.as_deref()).await {
                    Ok(page) => page,
                    Err(err) => {
                        tracing::debug!(pages, addresses, "Aborting dump: {err}");
                        yield Err(err);
                        break;
                    }
                };
                pages += 1;

                let SuppressionPage { entries, next_token } = page;
                for entry in entries {
                    addresses += 1;
                    yield Ok(entry.email_address);
                }

                state = match next_token {
                    Some(token) => State::Paging(Some(token)),
                    None => State::Done,
                };
            }

            if state == State::Done {
                tracing::info!(pages, addresses, "Suppression list fully read");
            }

            ()
        };

        g.into_async_iter()
    }
}
