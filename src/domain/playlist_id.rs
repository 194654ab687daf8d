use std::fmt::Display;

use crate::source::error::SourceError;

const URL_PREFIX: &str = "open.spotify.com/playlist/";
const URI_PREFIX: &str = "spotify:playlist:";
const RAW_ID_LEN: usize = 22;

/// Represents a playlist identifier.
///
/// One can get it from a share URL, a `spotify:playlist:` URI or the bare id,
/// and then use it to look up the playlist in a track source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let input = input.trim();

        let id = input
            .strip_prefix("https://")
            .or_else(|| input.strip_prefix("http://"))
            .and_then(|rest| rest.strip_prefix(URL_PREFIX))
            .or_else(|| input.strip_prefix(URI_PREFIX))
            .map(leading_alphanumeric)
            .unwrap_or(input);

        if id.len() == RAW_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(Self(id.to_string()));
        }

        Err(SourceError::InvalidPlaylistId(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn leading_alphanumeric(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(s.len());
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "6oQtOu9OmfQCL5teB03nC6";

    #[test]
    fn test_parse_share_url() {
        let url = format!("https://open.spotify.com/playlist/{ID}?si=dfa5f9973eca421e");
        assert_eq!(PlaylistId::parse(&url).unwrap().as_str(), ID);
    }

    #[test]
    fn test_parse_uri() {
        let uri = format!("spotify:playlist:{ID}");
        assert_eq!(PlaylistId::parse(&uri).unwrap().as_str(), ID);
    }

    #[test]
    fn test_parse_raw_id() {
        assert_eq!(PlaylistId::parse(ID).unwrap().as_str(), ID);
        assert_eq!(PlaylistId::parse(&format!("  {ID} ")).unwrap().as_str(), ID);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "not a playlist", "abc123", "https://example.com/playlist/x"] {
            assert!(
                matches!(
                    PlaylistId::parse(input),
                    Err(SourceError::InvalidPlaylistId(_))
                ),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_url_without_id() {
        assert!(PlaylistId::parse("https://open.spotify.com/playlist/?si=1").is_err());
    }

    #[test]
    fn test_parse_requires_prefix_at_start() {
        for input in [
            "garbage spotify:playlist:x".to_string(),
            format!("garbage spotify:playlist:{ID}"),
            format!("see https://open.spotify.com/playlist/{ID}"),
            format!("https://evil.com/open.spotify.com/playlist/{ID}"),
        ] {
            assert!(
                PlaylistId::parse(&input).is_err(),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_requires_full_length_id() {
        for input in [
            "spotify:playlist:x".to_string(),
            "https://open.spotify.com/playlist/abc123?si=1".to_string(),
            format!("spotify:playlist:{ID}X"),
        ] {
            assert!(
                PlaylistId::parse(&input).is_err(),
                "expected {input:?} to be rejected"
            );
        }
    }
}
