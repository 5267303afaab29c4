use crate::domain::value_objects::server_context::ServerContext;
use std::fmt;

/// Text shown in place of secret arguments
pub const REDACTED: &str = "********";

const NO_PROMPT: &str = "noprompt";

/// Ordered TF argument list with secret tracking.
///
/// Secrets are remembered by position, so arguments must only ever be
/// appended; reordering after `add_secret` breaks redaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentBuilder {
    arguments: Vec<String>,
    secret_indexes: Vec<usize>,
}

impl ArgumentBuilder {
    /// Start a new argument list: `<command> -noprompt`
    pub fn new(command: impl Into<String>) -> Self {
        let mut builder = Self {
            arguments: vec![command.into()],
            secret_indexes: Vec::new(),
        };
        builder.add_switch(NO_PROMPT);
        builder
    }

    /// Append `-collection:<url>` and, with credentials, a secret `-login`
    pub fn with_server_context(mut self, context: Option<&ServerContext>) -> Self {
        if let Some(context) = context {
            self.add_switch_with_value("collection", Some(context.collection_url.as_str()), false);
            if let Some(credentials) = &context.credentials {
                self.add_switch_with_value("login", Some(credentials.login_value().as_str()), true);
            }
        }
        self
    }

    pub fn add(&mut self, argument: impl Into<String>) -> &mut Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn add_secret(&mut self, argument: impl Into<String>) -> &mut Self {
        self.secret_indexes.push(self.arguments.len());
        self.arguments.push(argument.into());
        self
    }

    pub fn add_switch(&mut self, name: &str) -> &mut Self {
        self.add_switch_with_value(name, None, false)
    }

    /// Append `-name:value`, or just `-name` when there is no value
    pub fn add_switch_with_value(
        &mut self,
        name: &str,
        value: Option<&str>,
        is_secret: bool,
    ) -> &mut Self {
        let argument = match value {
            Some(value) if !value.is_empty() => format!("-{}:{}", name, value),
            _ => format!("-{}", name),
        };
        if is_secret {
            self.add_secret(argument)
        } else {
            self.add(argument)
        }
    }

    /// Name of the TF command (first argument)
    pub fn command(&self) -> &str {
        &self.arguments[0]
    }

    /// Final argument vector, secrets included
    pub fn build(&self) -> Vec<String> {
        self.arguments.clone()
    }

    /// Command line written to the tool's standard input: every argument
    /// escaped, space separated, newline terminated.
    pub fn build_command_line(&self) -> String {
        let mut line = self
            .arguments
            .iter()
            .map(|arg| escape_argument(arg))
            .collect::<Vec<_>>()
            .join(" ");
        line.push('\n');
        line
    }

    pub fn is_secret(&self, index: usize) -> bool {
        self.secret_indexes.contains(&index)
    }
}

impl fmt::Display for ArgumentBuilder {
    /// Display form for logs; secrets are redacted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .arguments
            .iter()
            .enumerate()
            .map(|(i, arg)| if self.is_secret(i) { REDACTED } else { arg.as_str() })
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&rendered)
    }
}

fn escape_argument(argument: &str) -> String {
    if argument.is_empty() {
        return "\"\"".to_string();
    }
    let escaped = argument.replace('"', "\"\"");
    if escaped.chars().any(char::is_whitespace) {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::server_context::Credentials;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_seeds_command_and_noprompt() {
        let builder = ArgumentBuilder::new("status");
        assert_eq!(builder.build(), vec!["status", "-noprompt"]);
        assert_eq!(builder.command(), "status");
    }

    #[test]
    fn test_switches_are_appended_in_order() {
        let mut builder = ArgumentBuilder::new("status");
        builder
            .add_switch_with_value("format", Some("xml"), false)
            .add_switch("recursive")
            .add("/ws/a.txt");
        assert_eq!(
            builder.build(),
            vec!["status", "-noprompt", "-format:xml", "-recursive", "/ws/a.txt"]
        );
    }

    #[test]
    fn test_secrets_are_redacted_only_for_display() {
        let mut builder = ArgumentBuilder::new("workfold");
        builder
            .add_secret("token-value")
            .add_switch_with_value("login", Some("user,pass"), true)
            .add("visible");

        let display = builder.to_string();
        assert!(!display.contains("token-value"));
        assert!(!display.contains("user,pass"));
        assert_eq!(display, "workfold -noprompt ******** ******** visible");

        let built = builder.build();
        assert!(built.contains(&"token-value".to_string()));
        assert!(built.contains(&"-login:user,pass".to_string()));
    }

    #[test]
    fn test_server_context_adds_collection_and_secret_login() {
        let context = ServerContext::parse("https://tfs.local/DefaultCollection")
            .unwrap()
            .with_credentials(Credentials::new("bob", "s3cret"));
        let builder = ArgumentBuilder::new("add").with_server_context(Some(&context));

        assert_eq!(
            builder.build(),
            vec![
                "add",
                "-noprompt",
                "-collection:https://tfs.local/DefaultCollection",
                "-login:bob,s3cret",
            ]
        );
        assert!(!builder.to_string().contains("s3cret"));
    }

    #[test]
    fn test_command_line_escaping() {
        let mut builder = ArgumentBuilder::new("add");
        builder.add("/ws/my file.txt").add("say\"hi\"");
        assert_eq!(
            builder.build_command_line(),
            "add -noprompt \"/ws/my file.txt\" say\"\"hi\"\"\n"
        );
    }

    #[test]
    fn test_switch_without_value() {
        let mut builder = ArgumentBuilder::new("add");
        builder.add_switch_with_value("version", None, false);
        assert_eq!(builder.build()[2], "-version");
    }
}
