use std::fmt;

use url::form_urlencoded;

/// Path of the authenticated change query endpoint, relative to the base URL.
pub const CHANGES_ENDPOINT: &str = "/a/changes/";

/// REST `o=` options understood by the change query endpoint.
///
/// See <https://gerrit-review.googlesource.com/Documentation/rest-api-changes.html>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListOption {
    /// Describe all revisions, not just the current one.
    AllRevisions,
    /// Describe the current revision (patch set), including commit SHA-1 and fetch URLs.
    CurrentRevision,
    /// Files modified by the commit with inserted/deleted line counts.
    /// Only valid alongside one of the revision options.
    CurrentFiles,
    /// All header fields of the commit object, including the message.
    /// Only valid alongside one of the revision options.
    CurrentCommit,
    /// Review messages associated with the change.
    Messages,
}

impl ListOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListOption::AllRevisions => "ALL_REVISIONS",
            ListOption::CurrentRevision => "CURRENT_REVISION",
            ListOption::CurrentFiles => "CURRENT_FILES",
            ListOption::CurrentCommit => "CURRENT_COMMIT",
            ListOption::Messages => "MESSAGES",
        }
    }
}

impl fmt::Display for ListOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which extra data Gerrit should include for every matched change.
///
/// The default requests all revisions and the current revision, without
/// files, commit details or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryOptions {
    pub all_revisions: bool,
    pub current_revision: bool,
    pub current_files: bool,
    pub current_commit: bool,
    pub messages: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            all_revisions: true,
            current_revision: true,
            current_files: false,
            current_commit: false,
            messages: false,
        }
    }
}

impl QueryOptions {
    /// No options at all, only the bare change records.
    pub fn none() -> Self {
        Self {
            all_revisions: false,
            current_revision: false,
            current_files: false,
            current_commit: false,
            messages: false,
        }
    }

    /// Current revision with its file list.
    pub fn files() -> Self {
        Self {
            current_revision: true,
            current_files: true,
            ..Self::none()
        }
    }

    /// Current revision only.
    pub fn current_patch_sets() -> Self {
        Self {
            current_revision: true,
            ..Self::none()
        }
    }

    pub fn with_all_revisions(mut self, value: bool) -> Self {
        self.all_revisions = value;
        self
    }

    pub fn with_current_revision(mut self, value: bool) -> Self {
        self.current_revision = value;
        self
    }

    pub fn with_current_files(mut self, value: bool) -> Self {
        self.current_files = value;
        self
    }

    pub fn with_current_commit(mut self, value: bool) -> Self {
        self.current_commit = value;
        self
    }

    pub fn with_messages(mut self, value: bool) -> Self {
        self.messages = value;
        self
    }

    fn has_revision(&self) -> bool {
        self.all_revisions || self.current_revision
    }

    /// The options that will actually be sent, in request order.
    ///
    /// `CURRENT_FILES` and `CURRENT_COMMIT` are silently dropped unless a
    /// revision option is requested as well.
    pub fn list_options(&self) -> Vec<ListOption> {
        let mut options = Vec::with_capacity(5);
        if self.all_revisions {
            options.push(ListOption::AllRevisions);
        }
        if self.current_revision {
            options.push(ListOption::CurrentRevision);
        }
        if self.current_files && self.has_revision() {
            options.push(ListOption::CurrentFiles);
        }
        if self.current_commit && self.has_revision() {
            options.push(ListOption::CurrentCommit);
        }
        if self.messages {
            options.push(ListOption::Messages);
        }
        options
    }
}

/// Build `{base_url}/a/changes/?q={query}[&o=...]*` with `query` form-urlencoded.
///
/// `base_url` is used as given; trailing slash handling is up to the caller.
pub fn build_query_url(base_url: &str, query: &str, options: &QueryOptions) -> String {
    let mut url = String::from(base_url);
    url.push_str(CHANGES_ENDPOINT);
    url.push_str("?q=");
    url.extend(form_urlencoded::byte_serialize(query.as_bytes()));

    for option in options.list_options() {
        url.push_str("&o=");
        url.push_str(option.as_str());
    }
    url
}
