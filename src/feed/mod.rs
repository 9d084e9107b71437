use std::str;

use curl::easy::Easy;

use crate::{
    data_types::fixture::Fixture,
    error::{FeedError, Result},
    logln, logvbln,
};

const HTTP_OK: u32 = 200;

/// Where the fixture list comes from: a local JSON file or an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    File(String),
    Url(String),
}

impl ScheduleSource {
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            ScheduleSource::Url(source.to_string())
        } else {
            ScheduleSource::File(source.to_string())
        }
    }
}

pub struct ScheduleFeed {
    source: ScheduleSource,
}

impl ScheduleFeed {
    const CC: &'static str = "Feed";

    pub fn new(source: ScheduleSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &ScheduleSource {
        &self.source
    }

    /// Loads the whole list. Nothing is cached; every call hits the source.
    pub async fn fetch(&self) -> Result<Vec<Fixture>> {
        let body = match &self.source {
            ScheduleSource::File(path) => tokio::fs::read(path).await.map_err(|source| {
                FeedError::Io {
                    path: path.clone(),
                    source,
                }
            })?,
            ScheduleSource::Url(url) => {
                let url = url.clone();
                tokio::task::spawn_blocking(move || ScheduleFeed::get_request(&url))
                    .await
                    .map_err(FeedError::from)??
            }
        };

        let fixtures = ScheduleFeed::parse(&body)?;
        logln!("loaded {} fixtures from {:?}", fixtures.len(), self.source);

        Ok(fixtures)
    }

    pub fn parse(body: &[u8]) -> std::result::Result<Vec<Fixture>, FeedError> {
        Ok(serde_json::from_slice(body)?)
    }

    fn get_request(url: &str) -> std::result::Result<Vec<u8>, FeedError> {
        let mut handle = Easy::new();
        handle.url(url)?;
        handle.get(true)?;
        handle.follow_location(true)?;

        let mut buffer_response = Vec::new();
        {
            let mut transfer = handle.transfer();
            transfer.write_function(|data| {
                buffer_response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = handle.response_code()?;
        if status != HTTP_OK {
            logvbln!(
                "{} answered {}: {:?}",
                url,
                status,
                str::from_utf8(&buffer_response).unwrap_or("<binary>")
            );
            return Err(FeedError::Status(status));
        }

        Ok(buffer_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_from_string() {
        assert_eq!(
            ScheduleSource::parse("https://example.org/schedule.json"),
            ScheduleSource::Url("https://example.org/schedule.json".into())
        );
        assert_eq!(
            ScheduleSource::parse("public/schedule.json"),
            ScheduleSource::File("public/schedule.json".into())
        );
    }

    #[test]
    fn parses_fixture_array() {
        let fixtures = ScheduleFeed::parse(
            br#"[
                {"utcDate":"2024-05-01T19:00:00Z","homeTeam":"Arsenal FC","awayTeam":"Chelsea","matchday":35},
                {"utcDate":"2024-05-04T14:00:00Z","homeTeam":"Liverpool","awayTeam":"Arsenal","matchday":36}
            ]"#,
        )
        .unwrap();

        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].away_team, "Arsenal");
    }

    #[test]
    fn malformed_json_is_a_feed_error() {
        assert!(matches!(
            ScheduleFeed::parse(b"{\"fixtures\": 3}"),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            ScheduleFeed::parse(b"<html>"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_a_feed_error() {
        let feed = ScheduleFeed::new(ScheduleSource::File("does/not/exist.json".into()));
        let err = feed.fetch().await.unwrap_err();
        assert!(err.is_retryable());
    }
}
