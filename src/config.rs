use anyhow::{Context, Result};
use std::path::PathBuf;

/// Runtime configuration, loaded once at startup from the environment
/// (a `.env` file is honored via dotenvy before this runs).
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Scheme + host + port prepended to stored relative media paths when
    /// rendering API responses, e.g. `http://127.0.0.1:8080`.
    pub public_base_url: String,
    /// Directory that holds uploaded files. Photos land in `photos/` below it.
    pub media_root: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("Invalid PORT")?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));
        // Stored paths never start with a slash, so strip any trailing one here.
        let public_base_url = public_base_url.trim_end_matches('/').to_string();

        let media_root =
            PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()));

        Ok(AppConfig {
            host,
            port,
            public_base_url,
            media_root,
        })
    }

    /// Directory photo files are written to and served from.
    pub fn photos_dir(&self) -> PathBuf {
        self.media_root.join("photos")
    }

    /// Absolute, fetchable URL for a stored relative media path.
    pub fn media_url(&self, relative_path: &str) -> String {
        format!(
            "{}/media/{}",
            self.public_base_url,
            relative_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_base_url: base.trim_end_matches('/').to_string(),
            media_root: PathBuf::from("media"),
        }
    }

    #[test]
    fn media_url_joins_base_and_relative_path() {
        let cfg = config("http://127.0.0.1:8080");
        assert_eq!(
            cfg.media_url("photos/abc.jpg"),
            "http://127.0.0.1:8080/media/photos/abc.jpg"
        );
    }

    #[test]
    fn media_url_never_doubles_slashes() {
        let cfg = config("http://example.com/");
        assert_eq!(
            cfg.media_url("/photos/abc.jpg"),
            "http://example.com/media/photos/abc.jpg"
        );
    }

    #[test]
    fn photos_dir_is_under_media_root() {
        let cfg = config("http://example.com");
        assert_eq!(cfg.photos_dir(), PathBuf::from("media/photos"));
    }
}
