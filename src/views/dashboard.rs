//! Website analysis dashboard

use crate::client::ConversationBackend;
use crate::error::{user_message, Result, SynapseError};
use crate::models::AnalysisResponse;

/// Normalise user input into an absolute URL
///
/// Trims the input and prepends `https://` when no `http://` or
/// `https://` scheme is present.
///
/// # Examples
///
/// ```
/// use synapse::views::dashboard::normalize_url;
///
/// assert_eq!(normalize_url(" example.com ").unwrap(), "https://example.com");
/// assert_eq!(normalize_url("http://a.dev").unwrap(), "http://a.dev");
/// assert!(normalize_url("   ").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SynapseError::InvalidInput("Please enter a valid URL".to_string()).into());
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match url::Url::parse(&candidate) {
        Ok(u) if u.host_str().is_some() => Ok(candidate),
        _ => Err(SynapseError::InvalidInput("Please enter a valid URL".to_string()).into()),
    }
}

/// State of the analysis form
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    analysis: Option<AnalysisResponse>,
    error: Option<String>,
}

impl DashboardView {
    /// Create an empty dashboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the last successful analysis
    pub fn analysis(&self) -> Option<&AnalysisResponse> {
        self.analysis.as_ref()
    }

    /// Error from the last failed analysis
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Conversation to continue in the chat view, once analysed
    pub fn chat_target(&self) -> Option<&str> {
        self.analysis.as_ref().map(|a| a.conversation_id.as_str())
    }

    /// Analyse `input`
    ///
    /// Invalid input is rejected without a network call. Any previous
    /// result is cleared before the request is made.
    pub async fn analyze(
        &mut self,
        backend: &dyn ConversationBackend,
        input: &str,
        use_javascript: bool,
    ) -> Result<&AnalysisResponse> {
        self.analysis = None;
        self.error = None;

        let url = match normalize_url(input) {
            Ok(url) => url,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        match backend.analyze_website(&url, use_javascript).await {
            Ok(result) => Ok(&*self.analysis.insert(result)),
            Err(e) => {
                self.error = Some(user_message(&e, "Analysis failed"));
                Err(e)
            }
        }
    }
}
