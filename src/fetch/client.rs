use crate::config::FetchEndpoints;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("guild-bot/", env!("CARGO_PKG_VERSION"));

/// Shown when a page has no thumbnail.
pub const WIKIPEDIA_LOGO: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/8/80/Wikipedia-logo-v2.svg/100px-Wikipedia-logo-v2.svg.png";

/// Comic metadata from `info.0.json`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comic {
    pub num: u32,
    pub safe_title: String,
    pub alt: String,
    pub img: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WikiSummary {
    pub title: String,
    pub extract: String,
    pub url: String,
    pub image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimalFact {
    pub fact: String,
    pub image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    #[serde(rename = "authorSlug")]
    pub author_slug: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UselessFact {
    pub text: String,
    pub permalink: String,
}

#[derive(Debug, Deserialize)]
struct FactResponse {
    fact: String,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    link: String,
}

#[derive(Debug, Deserialize)]
struct WikiQueryResponse {
    query: WikiQuery,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    pages: HashMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    title: String,
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    invalid: Option<serde_json::Value>,
    extract: Option<String>,
    fullurl: Option<String>,
    thumbnail: Option<WikiThumbnail>,
}

#[derive(Debug, Deserialize)]
struct WikiThumbnail {
    source: String,
}

/// GET-only client for the services behind `/fetch`
#[derive(Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    endpoints: FetchEndpoints,
}

impl FetchClient {
    pub fn new(endpoints: &FetchEndpoints, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoints: endpoints.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!(url = %url, "Fetching");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Request to {} failed: HTTP {}", url, response.status().as_u16());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// Latest comic when `number` is None.
    pub async fn xkcd(&self, number: Option<u32>) -> Result<Comic> {
        let url = match number {
            Some(n) => format!("{}/{}/info.0.json", self.endpoints.xkcd, n),
            None => format!("{}/info.0.json", self.endpoints.xkcd),
        };
        self.get_json(&url, &[]).await
    }

    /// Intro extract and canonical url, then the page thumbnail.
    ///
    /// Returns `Ok(None)` when no page exists for `topic`. A failed thumbnail
    /// lookup is not an error; `image` is just left empty.
    pub async fn wiki(&self, topic: &str) -> Result<Option<WikiSummary>> {
        let response: WikiQueryResponse = self
            .get_json(
                &self.endpoints.wikipedia,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("prop", "extracts|info"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("inprop", "url"),
                    ("redirects", "1"),
                    ("titles", topic),
                ],
            )
            .await?;

        let Some(page) = response.query.pages.into_values().next() else {
            return Ok(None);
        };
        if page.missing.is_some() || page.invalid.is_some() {
            debug!(topic = %topic, "No such page");
            return Ok(None);
        }

        let url = page
            .fullurl
            .unwrap_or_else(|| format!("https://en.wikipedia.org/wiki/{}", page.title.replace(' ', "_")));
        let image = match self.wiki_thumbnail(&page.title).await {
            Ok(image) => image,
            Err(e) => {
                debug!(title = %page.title, error = %e, "Thumbnail lookup failed");
                None
            }
        };

        Ok(Some(WikiSummary {
            extract: page.extract.unwrap_or_default(),
            title: page.title,
            url,
            image,
        }))
    }

    async fn wiki_thumbnail(&self, title: &str) -> Result<Option<String>> {
        let response: WikiQueryResponse = self
            .get_json(
                &self.endpoints.wikipedia,
                &[
                    ("action", "query"),
                    ("format", "json"),
                    ("prop", "pageimages"),
                    ("piprop", "thumbnail"),
                    ("pithumbsize", "500"),
                    ("titles", title),
                ],
            )
            .await?;

        Ok(response
            .query
            .pages
            .into_values()
            .next()
            .and_then(|p| p.thumbnail)
            .map(|t| t.source))
    }

    pub async fn animal(&self, topic: &str) -> Result<AnimalFact> {
        let fact: FactResponse = self
            .get_json(&format!("{}/facts/{}", self.endpoints.animal, topic), &[])
            .await?;
        let image: ImageResponse = self
            .get_json(&format!("{}/img/{}", self.endpoints.animal, topic), &[])
            .await?;

        Ok(AnimalFact {
            fact: fact.fact,
            image: image.link,
        })
    }

    pub async fn joke(&self) -> Result<Joke> {
        self.get_json(&format!("{}/random_joke", self.endpoints.joke), &[])
            .await
    }

    pub async fn quote(&self) -> Result<Quote> {
        self.get_json(&format!("{}/random", self.endpoints.quote), &[])
            .await
    }

    pub async fn fact(&self) -> Result<UselessFact> {
        self.get_json(
            &format!("{}/random.json", self.endpoints.fact),
            &[("language", "en")],
        )
        .await
    }
}
