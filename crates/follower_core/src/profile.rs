use std::fmt;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileIdError {
    #[error("missing profile url or id")]
    Empty,
    #[error("could not extract a profile id from {0:?}")]
    NotFound(String),
}

/// Numeric identifier of a remote profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileId(String);

impl ProfileId {
    /// Accepts either bare digits or a URL whose path contains `profile/<digits>`.
    pub fn parse(input: &str) -> Result<Self, ProfileIdError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ProfileIdError::Empty);
        }
        if is_digits(input) {
            return Ok(Self(input.to_string()));
        }

        let from_url = Url::parse(input)
            .or_else(|_| Url::parse(&format!("https://{input}")))
            .ok()
            .and_then(|parsed| {
                let segments: Vec<String> = parsed
                    .path_segments()?
                    .map(ToOwned::to_owned)
                    .collect();
                find_after_profile(segments.iter().map(String::as_str))
            });

        from_url
            .or_else(|| find_after_profile(input.split(['/', '?', '#'])))
            .map(Self)
            .ok_or_else(|| ProfileIdError::NotFound(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn find_after_profile<'a>(segments: impl Iterator<Item = &'a str>) -> Option<String> {
    let segments: Vec<&str> = segments.collect();
    segments
        .windows(2)
        .find(|pair| pair[0].eq_ignore_ascii_case("profile") && is_digits(pair[1]))
        .map(|pair| pair[1].to_string())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
