//! Settings for the external embedding service.

use crate::Error;

/// Where embedded widgets are fetched from and the token that authorises it.
///
/// Both values are required; the dashboard is not rendered without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSettings {
    /// The base URL of the embedding service.
    pub url: String,
    /// The access token passed to the embedding service.
    pub token: String,
}

impl EmbedSettings {
    /// Validate the embedding settings.
    ///
    /// # Errors
    /// Returns [Error::MissingEmbedSettings] naming every setting that is
    /// missing or blank.
    pub fn new(url: Option<String>, token: Option<String>) -> Result<Self, Error> {
        let url = url.filter(|url| !url.trim().is_empty());
        let token = token.filter(|token| !token.trim().is_empty());

        match (url, token) {
            (Some(url), Some(token)) => Ok(Self { url, token }),
            (url, token) => {
                let missing: Vec<_> = [(url.is_none(), "EMBED_URL"), (token.is_none(), "EMBED_TOKEN")]
                    .into_iter()
                    .filter_map(|(is_missing, name)| is_missing.then_some(name))
                    .collect();

                Err(Error::MissingEmbedSettings(missing.join(", ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::EmbedSettings;

    #[test]
    fn accepts_url_and_token() {
        let settings = EmbedSettings::new(
            Some("https://embed.example.com".to_owned()),
            Some("secret".to_owned()),
        )
        .unwrap();

        assert_eq!(settings.url, "https://embed.example.com");
        assert_eq!(settings.token, "secret");
    }

    #[test]
    fn names_every_missing_setting() {
        assert_eq!(
            EmbedSettings::new(None, None),
            Err(Error::MissingEmbedSettings("EMBED_URL, EMBED_TOKEN".to_owned()))
        );
        assert_eq!(
            EmbedSettings::new(Some("https://embed.example.com".to_owned()), None),
            Err(Error::MissingEmbedSettings("EMBED_TOKEN".to_owned()))
        );
    }

    #[test]
    fn blank_settings_count_as_missing() {
        assert_eq!(
            EmbedSettings::new(Some("  ".to_owned()), Some("secret".to_owned())),
            Err(Error::MissingEmbedSettings("EMBED_URL".to_owned()))
        );
    }
}
