//! Image loading: decodes inline payloads and downloads external URLs.
//!
//! Downloads go through one shared `reqwest` client and land in a URL-keyed
//! cache, so reopening a theme preview or a carousel page does not hit the
//! network twice.

use image::DynamicImage;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::BaseImage;
use crate::error::StudioError;

/// Upper bound on a single download.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A downloaded image plus its last access time, for expiry.
#[derive(Clone)]
struct CachedImage {
    image: DynamicImage,
    last_accessed: Instant,
}

impl CachedImage {
    fn new(image: DynamicImage) -> Self {
        Self {
            image,
            last_accessed: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// Turns [`BaseImage`] references into decoded images.
#[derive(Clone)]
pub struct ImageLoader {
    http_client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, CachedImage>>>,
}

impl ImageLoader {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Loader with its own default HTTP client.
    pub fn with_default_client() -> Result<Self, StudioError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tiabela/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| StudioError::Config(format!("HTTP client error: {}", e)))?;
        Ok(Self::new(client))
    }

    /// Decode an inline image or fetch (and cache) a URL.
    pub async fn load(&self, image: &BaseImage) -> Result<DynamicImage, StudioError> {
        match image {
            BaseImage::Inline { data, .. } => decode(data),
            BaseImage::Url(url) => self.fetch(url).await,
        }
    }

    async fn fetch(&self, url: &str) -> Result<DynamicImage, StudioError> {
        {
            let mut cache = self.cache.write().await;
            if let Some(entry) = cache.get_mut(url) {
                entry.touch();
                return Ok(entry.image.clone());
            }
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| StudioError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(StudioError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StudioError::Image(format!("Failed to read image data: {}", e)))?;

        let image = decode(&bytes)?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(url.to_string(), CachedImage::new(image.clone()));
        }

        Ok(image)
    }

    /// Drop cache entries not used within `max_age`. Returns how many remain.
    pub async fn evict_older_than(&self, max_age: Duration) -> (usize, usize) {
        let now = Instant::now();
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|_, v| now.duration_since(v.last_accessed) < max_age);
        (before - cache.len(), cache.len())
    }
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, StudioError> {
    image::load_from_memory(bytes)
        .map_err(|e| StudioError::Image(format!("Failed to decode image: {}", e)))
}
