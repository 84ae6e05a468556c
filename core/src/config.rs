use std::path::{Path, PathBuf};
use std::result::Result as StdResult;

use anyhow::Context as _;
use rust_embed::RustEmbed;
use serde::Deserialize;
use url::Url;

pub use self::glob_pattern::GlobPattern;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub server: ServerConfig,
    pub submit: SubmitConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub base_url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitConfig {
    pub include: GlobPattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "batchmark.toml";

    pub fn example_toml() -> String {
        let file = Asset::get(Self::FILENAME).unwrap();
        std::str::from_utf8(file.data.as_ref()).unwrap().to_owned()
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file in ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let cur_dir = cur_dir.as_ref();
        cur_dir
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
            .with_context(|| {
                format!(
                    "Not in a batchmark dir: Cannot find '{}'",
                    Self::FILENAME
                )
            })
    }

    pub fn from_file_finding_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_filepath = Config::find_file_in_ancestors(cur_dir)?;
        Self::from_toml_file(config_filepath)
    }
}

mod glob_pattern {
    use std::ops::{Deref, DerefMut};

    use ::glob::PatternError;
    use ::serde::{
        de::{self, Visitor},
        Deserialize, Serialize,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GlobPattern(::glob::Pattern);

    impl GlobPattern {
        pub fn parse(pattern: &str) -> Result<Self, PatternError> {
            ::glob::Pattern::new(pattern).map(Self)
        }
    }

    impl Deref for GlobPattern {
        type Target = ::glob::Pattern;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl DerefMut for GlobPattern {
        fn deref_mut(&mut self) -> &mut Self::Target {
            &mut self.0
        }
    }

    impl Serialize for GlobPattern {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.0.as_str())
        }
    }

    impl<'de> Deserialize<'de> for GlobPattern {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            struct GlobPatternVisitor;

            impl<'de> Visitor<'de> for GlobPatternVisitor {
                type Value = GlobPattern;

                fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(f, "a glob pattern string")
                }

                fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Self::Value::parse(v).map_err(de::Error::custom)
                }
            }

            deserializer.deserialize_str(GlobPatternVisitor)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn example_toml_should_be_parsable() {
        let toml = Config::example_toml();
        let cfg = dbg!(Config::from_toml(&toml)).unwrap();

        let Config {
            source_config_file,
            server,
            submit,
            export,
        } = cfg;

        assert_eq!(source_config_file, None);
        assert_eq!(
            server.base_url,
            Url::parse("http://localhost:8000/api").unwrap()
        );
        assert_eq!(submit.include, GlobPattern::parse("*.cpp").unwrap());
        assert_eq!(export.dir, Path::new("./exports"));
    }

    #[test]
    fn glob_pattern_round_trips_through_toml() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct T {
            include: GlobPattern,
        }

        let t: T = toml::from_str(r#"include = "*.[hc]pp""#).unwrap();
        assert_eq!(t.include.as_str(), "*.[hc]pp");
        assert!(t.include.matches("main.cpp"));
        assert!(!t.include.matches("main.rs"));

        let res: Result<T, _> = toml::from_str(r#"include = "[a""#);
        assert!(res.is_err());
    }
}
