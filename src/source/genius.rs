/// Genius-backed lyrics source
///
/// Searches the Genius API for each of the first few expanded keywords, then
/// scrapes lyrics from each hit's song page (the API itself does not return
/// lyrics). When scraping fails, lyrics.ovh is tried by artist and title.
/// Without a token the catalog search is skipped and every keyword reports
/// "no_token".

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{StatusCode, Url};
use select::document::Document;
use select::predicate::{Attr, Class, Name, Predicate};
use serde::Deserialize;

use super::{dedupe_songs, KeywordStatus, LyricsSource, LyricsSourceError, SourceOutcome, SourceReport};
use crate::config::SourceConfig;
use crate::lyrics::Song;
use crate::theme::ParsedTheme;

/// Realistic mobile User-Agent; Genius pages block obvious bots more often.
const USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                          AppleWebKit/605.1.15 (KHTML, like Gecko) \
                          Version/17.0 Mobile/15E148 Safari/604.1";

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("html tag regex"));
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br regex"));

// --- Genius search response (only the fields we read) ---

#[derive(Deserialize, Default)]
struct GeniusSearchResponse {
    #[serde(default)]
    response: GeniusResponseBody,
}

#[derive(Deserialize, Default)]
struct GeniusResponseBody {
    #[serde(default)]
    hits: Vec<GeniusHit>,
}

#[derive(Deserialize)]
struct GeniusHit {
    result: Option<GeniusResult>,
}

#[derive(Deserialize)]
struct GeniusResult {
    title: Option<String>,
    url: Option<String>,
    primary_artist: Option<GeniusArtist>,
}

#[derive(Deserialize)]
struct GeniusArtist {
    name: Option<String>,
}

#[derive(Deserialize)]
struct OvhResponse {
    lyrics: Option<String>,
}

/// A search hit that has everything needed to fetch lyrics.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    title: String,
    artist: String,
    url: String,
}

pub struct GeniusLyricsSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl GeniusLyricsSource {
    /// Build the source and its HTTP client (User-Agent + request timeout).
    pub fn new(config: SourceConfig) -> Result<Self, LyricsSourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| LyricsSourceError::Http(e.to_string()))?;
        Ok(GeniusLyricsSource { client, config })
    }

    /// Search one keyword. Returns the usable hits and a status string.
    async fn search(&self, keyword: &str) -> (Vec<Candidate>, String) {
        let Some(token) = self.config.token() else {
            return (Vec::new(), "no_token".to_string());
        };

        let url = format!("{}/search", self.config.genius_base_url.trim_end_matches('/'));
        let response = match self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", keyword)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return (Vec::new(), transport_status(&e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(
                keyword,
                backoff_secs = self.config.rate_limit_backoff_secs,
                "Genius rate limit hit, backing off"
            );
            tokio::time::sleep(self.config.rate_limit_backoff()).await;
            return (Vec::new(), status.as_u16().to_string());
        }
        if !status.is_success() {
            return (Vec::new(), status.as_u16().to_string());
        }

        match response.json::<GeniusSearchResponse>().await {
            Ok(body) => (
                candidates_from_response(body, self.config.hits_per_keyword),
                status.as_u16().to_string(),
            ),
            Err(e) => (Vec::new(), transport_status(&e)),
        }
    }

    /// Scrape lyrics from a Genius song page. None on any failure.
    async fn scrape_lyrics(&self, url: &str) -> Option<String> {
        let response = self.client.get(url).send().await.ok()?;
        if response.status() != StatusCode::OK {
            return None;
        }
        let html = response.text().await.ok()?;
        parse_genius_html(&html)
    }

    /// lyrics.ovh lookup by artist and title. None on any failure.
    async fn fetch_fallback(&self, artist: &str, title: &str) -> Option<String> {
        let url = ovh_url(&self.config.ovh_base_url, artist, title)?;
        let response = self.client.get(url).send().await.ok()?;
        if response.status() != StatusCode::OK {
            return None;
        }
        let body: OvhResponse = response.json().await.ok()?;
        body.lyrics
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
    }
}

#[async_trait]
impl LyricsSource for GeniusLyricsSource {
    async fn find(&self, theme: &ParsedTheme) -> Result<SourceOutcome, LyricsSourceError> {
        let max_songs = self.config.max_songs;
        let keywords: Vec<String> = theme
            .expanded_keywords
            .iter()
            .take(self.config.keywords_per_query)
            .cloned()
            .collect();

        let mut report = SourceReport {
            keywords_used: keywords.clone(),
            ..SourceReport::default()
        };
        let mut songs: Vec<Song> = Vec::new();

        for (i, keyword) in keywords.iter().enumerate() {
            let (candidates, status) = self.search(keyword).await;
            tracing::debug!(keyword = %keyword, status = %status, hits = candidates.len(), "Genius search");
            report.search_statuses.push(KeywordStatus {
                keyword: keyword.clone(),
                status,
            });
            report.hits_total += candidates.len();

            for candidate in candidates {
                let lyrics = match self.scrape_lyrics(&candidate.url).await {
                    Some(lyrics) => {
                        report.scrape_ok += 1;
                        Some(lyrics)
                    }
                    None => {
                        report.scrape_fail += 1;
                        let fallback = self.fetch_fallback(&candidate.artist, &candidate.title).await;
                        if fallback.is_some() {
                            report.fallback_ok += 1;
                        } else {
                            report.fallback_fail += 1;
                        }
                        fallback
                    }
                };

                if let Some(lyrics) = lyrics {
                    songs.push(Song {
                        title: candidate.title,
                        artist: candidate.artist,
                        year: None,
                        lyrics: Some(lyrics),
                    });
                }
                if songs.len() >= max_songs {
                    break;
                }
            }

            if songs.len() >= max_songs {
                break;
            }
            if i + 1 < keywords.len() {
                tokio::time::sleep(self.config.keyword_pause()).await;
            }
        }

        let songs = dedupe_songs(songs, max_songs);
        report.added_songs = songs.len();

        tracing::info!(
            source = self.name(),
            hits = report.hits_total,
            scrape_ok = report.scrape_ok,
            fallback_ok = report.fallback_ok,
            songs = report.added_songs,
            "Lyrics lookup complete"
        );

        Ok(SourceOutcome { songs, report })
    }

    fn name(&self) -> &str {
        "genius"
    }
}

/// Status label for a reqwest transport failure.
fn transport_status(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_decode() {
        "decode"
    } else {
        "request"
    };
    format!("exc:{}", kind)
}

/// Keep at most `limit` hits, then drop those missing a title, artist or URL.
fn candidates_from_response(body: GeniusSearchResponse, limit: usize) -> Vec<Candidate> {
    body.response
        .hits
        .into_iter()
        .take(limit)
        .filter_map(|hit| {
            let result = hit.result?;
            let artist = result.primary_artist.and_then(|a| a.name)?;
            let title = result.title?;
            let url = result.url?;
            if title.is_empty() || artist.is_empty() || url.is_empty() {
                return None;
            }
            Some(Candidate { title, artist, url })
        })
        .collect()
}

/// `{base}/v1/{artist}/{title}` with path segments percent-encoded.
fn ovh_url(base: &str, artist: &str, title: &str) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["v1", artist, title]);
    Some(url)
}

/// Extract lyrics text from a Genius song page.
///
/// Current pages split lyrics across `div[data-lyrics-container="true"]`
/// blocks; older ones use a single `div.lyrics`.
fn parse_genius_html(html: &str) -> Option<String> {
    let doc = Document::from(html);

    let blocks: Vec<String> = doc
        .find(Attr("data-lyrics-container", "true"))
        .map(|node| html_fragment_to_text(&node.inner_html()))
        .filter(|text| !text.trim().is_empty())
        .collect();
    if !blocks.is_empty() {
        let text = blocks.join("\n").trim().to_string();
        return if text.is_empty() { None } else { Some(text) };
    }

    let legacy = doc.find(Name("div").and(Class("lyrics"))).next()?;
    let text = html_fragment_to_text(&legacy.inner_html()).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// `<br>` becomes a newline, other tags are stripped, common entities decoded.
fn html_fragment_to_text(fragment: &str) -> String {
    let with_newlines = BR_RE.replace_all(fragment, "\n");
    let stripped = HTML_TAG_RE.replace_all(&with_newlines, "");
    decode_html_entities(&stripped)
}

fn decode_html_entities(s: &str) -> String {
    s.replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn theme(expanded: &[&str]) -> ParsedTheme {
        ParsedTheme {
            raw: expanded[0].to_string(),
            clean: expanded[0].to_string(),
            strict_keywords: vec![expanded[0].to_string()],
            expanded_keywords: expanded.iter().map(|s| s.to_string()).collect(),
            language: Language::Fr,
        }
    }

    #[test]
    fn test_parse_lyrics_containers() {
        let html = r#"<html><body>
            <div data-lyrics-container="true">[Verse 1]<br/>Dis-moi d&#x27;où tu viens<br>Mon <i>père</i></div>
            <div data-lyrics-container="true">Rock &amp; roll</div>
            </body></html>"#;
        let text = parse_genius_html(html).unwrap();
        assert_eq!(text, "[Verse 1]\nDis-moi d'où tu viens\nMon père\nRock & roll");
    }

    #[test]
    fn test_parse_legacy_lyrics_div() {
        let html = r#"<div class="lyrics"><p>Hello<br>darkness</p></div>"#;
        assert_eq!(parse_genius_html(html).unwrap(), "Hello\ndarkness");
    }

    #[test]
    fn test_parse_page_without_lyrics() {
        assert_eq!(parse_genius_html("<html><body><p>nothing</p></body></html>"), None);
        let empty = r#"<div data-lyrics-container="true">   </div>"#;
        assert_eq!(parse_genius_html(empty), None);
    }

    #[test]
    fn test_candidates_require_title_artist_and_url() {
        let body: GeniusSearchResponse = serde_json::from_value(serde_json::json!({
            "response": {
                "hits": [
                    {"result": {"title": "Papaoutai", "url": "https://genius.com/a", "primary_artist": {"name": "Stromae"}}},
                    {"result": {"title": "No url", "primary_artist": {"name": "X"}}},
                    {"result": {"title": "No artist", "url": "https://genius.com/b"}},
                    {"result": {"title": "Late", "url": "https://genius.com/c", "primary_artist": {"name": "Y"}}}
                ]
            }
        }))
        .unwrap();
        let candidates = candidates_from_response(body, 3);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].artist, "Stromae");
    }

    #[test]
    fn test_candidates_from_empty_response() {
        let body: GeniusSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(candidates_from_response(body, 6).is_empty());
    }

    #[test]
    fn test_ovh_url_encodes_segments() {
        let url = ovh_url("https://api.lyrics.ovh/", "Édith Piaf", "La vie en rose").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.lyrics.ovh/v1/%C3%89dith%20Piaf/La%20vie%20en%20rose"
        );
        assert!(ovh_url("not a url", "a", "b").is_none());
    }

    #[tokio::test]
    async fn test_find_without_token_makes_no_requests() {
        let config = SourceConfig {
            genius_token: None,
            keyword_pause_ms: 0,
            ..SourceConfig::default()
        };
        let source = GeniusLyricsSource::new(config).unwrap();
        let outcome = source
            .find(&theme(&["mon père", "père", "father"]))
            .await
            .unwrap();

        assert!(outcome.songs.is_empty());
        assert_eq!(outcome.report.keywords_used, vec!["mon père", "père"]);
        assert_eq!(outcome.report.search_statuses.len(), 2);
        assert!(outcome.report.search_statuses.iter().all(|s| s.status == "no_token"));
        assert_eq!(outcome.report.hits_total, 0);
        assert_eq!(outcome.report.added_songs, 0);
    }
}
