//! Navigation policy for new-window requests
//!
//! Only the chat application and the Google sign-in pages may load inside
//! the embedded browser. Everything else goes to the OS default handler.

use gchat_core::config::TRUSTED_DOMAINS;
use gchat_core::ShellResult;
use url::Url;

const MAIL_HOST: &str = "mail.google.com";
const MAIL_CHAT_PREFIX: &str = "https://mail.google.com/chat";
const CHAT_HOST: &str = "chat.google.com";
const ATTACHMENT_URL: &str = "https://chat.google.com/u/0/api/get_attachment_url";

/// Where a requested URL should be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Keep it inside the embedded browser
    Internal,
    /// Hand it to the OS
    External(ExternalReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalReason {
    Unparseable,
    UnsupportedScheme(String),
    UntrustedHost(String),
    MailOutsideChat,
    AttachmentDownload,
}

impl NavigationDecision {
    pub fn open_externally(&self) -> bool {
        matches!(self, NavigationDecision::External(_))
    }
}

/// Classify a URL requested by the page. First matching rule wins.
pub fn decide(url: &str) -> NavigationDecision {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return NavigationDecision::External(ExternalReason::Unparseable),
    };

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return NavigationDecision::External(ExternalReason::UnsupportedScheme(scheme.to_string()));
    }

    let host = parsed.host_str().unwrap_or_default();
    // Substring match: subdomains and look-alike hosts containing a trusted
    // domain are accepted too.
    if !TRUSTED_DOMAINS.iter().any(|domain| host.contains(domain)) {
        return NavigationDecision::External(ExternalReason::UntrustedHost(host.to_string()));
    }

    let absolute = parsed.as_str();
    if host == MAIL_HOST && !absolute.starts_with(MAIL_CHAT_PREFIX) {
        return NavigationDecision::External(ExternalReason::MailOutsideChat);
    }

    if host == CHAT_HOST && absolute.contains(ATTACHMENT_URL) {
        return NavigationDecision::External(ExternalReason::AttachmentDownload);
    }

    NavigationDecision::Internal
}

/// A way of asking the OS to open a URL
pub trait UrlLauncher {
    /// Short label used in logs and error dialogs
    fn name(&self) -> &str;

    fn launch(&self, url: &str) -> ShellResult<()>;
}

/// Receives the final failure of the external-open chain
pub trait FailureReporter {
    fn report_open_failure(&self, url: &str, details: &str);
}

/// Result of running the external-open chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalOpenOutcome {
    Primary,
    Secondary,
    Failed,
}

/// Opens URLs outside the app, falling back to a second launcher and
/// finally to an error report.
pub struct ExternalOpener {
    primary: Box<dyn UrlLauncher>,
    secondary: Box<dyn UrlLauncher>,
}

impl ExternalOpener {
    pub fn new(primary: Box<dyn UrlLauncher>, secondary: Box<dyn UrlLauncher>) -> Self {
        Self { primary, secondary }
    }

    pub fn open(&self, url: &str, reporter: &dyn FailureReporter) -> ExternalOpenOutcome {
        log::info!("Opening externally: {}", url);

        let primary_err = match self.primary.launch(url) {
            Ok(()) => return ExternalOpenOutcome::Primary,
            Err(e) => e,
        };
        log::warn!("{} failed for {}: {}", self.primary.name(), url, primary_err);

        let secondary_err = match self.secondary.launch(url) {
            Ok(()) => return ExternalOpenOutcome::Secondary,
            Err(e) => e,
        };
        log::error!("{} failed for {}: {}", self.secondary.name(), url, secondary_err);

        let details = format!(
            "Could not open the link in your default browser.\n\nURL: {}\n\n{}: {}\n{}: {}",
            url,
            self.primary.name(),
            primary_err,
            self.secondary.name(),
            secondary_err
        );
        reporter.report_open_failure(url, &details);
        ExternalOpenOutcome::Failed
    }
}

/// Handle a new-window request from the page.
///
/// Returns `true` when the embedded browser should open the URL itself.
/// External URLs are passed to `open_external`, which normally forwards
/// them to [`ExternalOpener::open`] on the UI thread.
pub fn handle_new_window<F>(url: &str, open_external: F) -> bool
where
    F: FnOnce(String),
{
    match decide(url) {
        NavigationDecision::Internal => true,
        NavigationDecision::External(reason) => {
            log::debug!("New window for {} goes external: {:?}", url, reason);
            open_external(url.to_string());
            false
        }
    }
}
