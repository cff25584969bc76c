//! Credential provider: the injected authenticated-request capability.
//!
//! Every backend call needs a bearer token. Rather than reading ambient
//! storage inline, operations ask a [`TokenProvider`] handed to the
//! controller at construction; absence of a token is a local
//! precondition failure and never reaches the network.

use std::path::PathBuf;

use crate::config::AuthConfig;

pub trait TokenProvider: Send + Sync {
    /// The current bearer token, if one is available.
    fn token(&self) -> Option<String>;
}

/// A fixed token, typically from configuration or a test.
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call.
pub struct EnvToken {
    pub var: String,
}

impl TokenProvider for EnvToken {
    fn token(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|t| !t.trim().is_empty())
    }
}

/// Reads the token from a file (first line, trimmed) on every call.
pub struct FileToken {
    pub path: PathBuf,
}

impl TokenProvider for FileToken {
    fn token(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.lines().next()?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}

/// Always absent. Useful for exercising the missing-token path.
pub struct NoToken;

impl TokenProvider for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Config-driven chain: explicit token, then environment variable, then
/// token file. First present value wins.
pub struct ConfigTokenProvider {
    fixed: Option<String>,
    env: EnvToken,
    file: Option<FileToken>,
}

impl ConfigTokenProvider {
    pub fn new(auth: &AuthConfig) -> Self {
        Self {
            fixed: auth.token.clone().filter(|t| !t.trim().is_empty()),
            env: EnvToken {
                var: auth.token_env.clone(),
            },
            file: auth.token_file.as_ref().map(|p| FileToken {
                path: PathBuf::from(p),
            }),
        }
    }
}

impl TokenProvider for ConfigTokenProvider {
    fn token(&self) -> Option<String> {
        if let Some(ref token) = self.fixed {
            return Some(token.clone());
        }
        if let Some(token) = self.env.token() {
            return Some(token);
        }
        self.file.as_ref().and_then(|f| f.token())
    }
}

/// Build the provider described by `[auth]` configuration.
pub fn provider_from_config(auth: &AuthConfig) -> Box<dyn TokenProvider> {
    Box::new(ConfigTokenProvider::new(auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_static_token() {
        assert_eq!(StaticToken("abc".into()).token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_env_token_absent_and_present() {
        let var = "VISMEM_TEST_TOKEN_ENV_A";
        std::env::remove_var(var);
        let provider = EnvToken { var: var.into() };
        assert!(provider.token().is_none());
        std::env::set_var(var, "from-env");
        assert_eq!(provider.token().as_deref(), Some("from-env"));
        std::env::remove_var(var);
    }

    #[test]
    fn test_file_token_reads_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-token  ").unwrap();
        writeln!(file, "trailing junk").unwrap();
        let provider = FileToken {
            path: file.path().to_path_buf(),
        };
        assert_eq!(provider.token().as_deref(), Some("file-token"));
    }

    #[test]
    fn test_file_token_missing_file() {
        let provider = FileToken {
            path: PathBuf::from("/nonexistent/vismem-token"),
        };
        assert!(provider.token().is_none());
    }

    #[test]
    fn test_config_chain_prefers_fixed_token() {
        let var = "VISMEM_TEST_TOKEN_ENV_B";
        std::env::set_var(var, "from-env");
        let auth = AuthConfig {
            token: Some("fixed".into()),
            token_env: var.into(),
            token_file: None,
        };
        assert_eq!(ConfigTokenProvider::new(&auth).token().as_deref(), Some("fixed"));
        std::env::remove_var(var);
    }

    #[test]
    fn test_config_chain_falls_back_to_env() {
        let var = "VISMEM_TEST_TOKEN_ENV_C";
        std::env::set_var(var, "from-env");
        let auth = AuthConfig {
            token: None,
            token_env: var.into(),
            token_file: None,
        };
        assert_eq!(ConfigTokenProvider::new(&auth).token().as_deref(), Some("from-env"));
        std::env::remove_var(var);
    }

    #[test]
    fn test_no_token() {
        assert!(NoToken.token().is_none());
    }
}
