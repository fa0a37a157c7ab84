//! client extensions for listing posts
use {
    crate::{
        client::RedditClient,
        error::{R2wError, Result},
        models::{ListingResponse, Post, SortMode},
    },
    tracing::{debug, instrument, warn},
};

impl RedditClient {
    /// the listing url for a subreddit
    pub fn listing_url(&self, subreddit: &str, sort: SortMode, limit: u32) -> String {
        format!(
            "{}/r/{}/{}.json?limit={}",
            self.base_url, subreddit, sort, limit
        )
    }

    #[instrument(skip(self))]
    /// fetch one page of posts from a subreddit, in api order
    ///
    /// # Errors
    ///
    /// returns [`R2wError::Fetch`] if the request fails or the api answers with an error status
    /// returns [`R2wError::Decode`] if the body isn't a listing
    pub async fn get_posts(&self, subreddit: &str, sort: SortMode, limit: u32) -> Result<Vec<Post>> {
        let url = self.listing_url(subreddit, sort, limit);
        debug!(url, "fetching listing");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| {
                warn!(url, error = %source, "listing request failed");
                R2wError::Fetch {
                    url: url.clone(),
                    source,
                }
            })?;

        let bytes = response.bytes().await.map_err(|source| R2wError::Fetch {
            url: url.clone(),
            source,
        })?;

        let listing: ListingResponse = serde_json::from_slice(&bytes)?;
        let posts = listing.into_posts();

        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }
}
