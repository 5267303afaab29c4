use std::fmt;
use url::Url;

/// Credentials passed to the tool with `-login`
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `-login` switch (`user,password`)
    pub fn login_value(&self) -> String {
        format!("{},{}", self.username, self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Team project collection the commands talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerContext {
    pub collection_url: Url,
    pub credentials: Option<Credentials>,
}

impl ServerContext {
    pub fn new(collection_url: Url) -> Self {
        Self {
            collection_url,
            credentials: None,
        }
    }

    pub fn parse(collection_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(collection_url)?))
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let rendered = format!("{:?}", credentials);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(credentials.login_value(), "alice,hunter2");
    }

    #[test]
    fn test_parse_collection() {
        let context = ServerContext::parse("https://dev.azure.com/org/").unwrap();
        assert_eq!(context.collection_url.host_str(), Some("dev.azure.com"));
        assert!(ServerContext::parse("not a url").is_err());
    }
}
