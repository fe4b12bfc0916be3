use reprotrace_core::ConfigurationFault;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    /// Always ends with `/`, so endpoint paths join beneath it.
    pub base_url: Url,
}

impl OpenAiConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigurationFault> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn from_env() -> Result<Self, ConfigurationFault> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationFault>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = read(OPENAI_API_KEY_VAR)
            .ok_or(ConfigurationFault::MissingCredentials(OPENAI_API_KEY_VAR))?;
        let mut config = Self::new(SecretString::new(api_key));
        if let Some(base_url) = read(OPENAI_BASE_URL_VAR) {
            config = config.with_base_url(base_url.trim())?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationFault> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigurationFault::MissingCredentials(OPENAI_API_KEY_VAR));
        }
        check_scheme(&self.base_url)
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ConfigurationFault> {
        self.base_url
            .join(path)
            .map_err(|err| ConfigurationFault::Invalid(format!("endpoint '{path}': {err}")))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigurationFault> {
    let mut url = Url::parse(raw)
        .map_err(|err| ConfigurationFault::Invalid(format!("base url '{raw}': {err}")))?;
    check_scheme(&url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn check_scheme(url: &Url) -> Result<(), ConfigurationFault> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationFault::Invalid(format!(
            "base url '{url}' must use http or https"
        )));
    }
    Ok(())
}
