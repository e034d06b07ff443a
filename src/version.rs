use std::fmt::Display;

/// Which KDL keyword dialect to speak.
///
/// * `V1` spells booleans and null as bare `true`, `false` and `null`.
/// * `V2` spells them `#true`, `#false` and `#null`; the bare words are plain
///   identifiers.
/// * `Auto` picks one per call: from a leading `/- kdl-version N` marker when
///   parsing, otherwise from the first keyword literal that shows up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KdlVersion {
    /// KDL 1.x keywords.
    V1,
    /// KDL 2.x keywords.
    V2,
    /// Detect the version per call.
    #[default]
    Auto,
}

impl KdlVersion {
    /// The concrete version this resolves to when there is nothing to detect
    /// from.
    pub fn or_default(self) -> KdlVersion {
        match self {
            KdlVersion::Auto => KdlVersion::V1,
            v => v,
        }
    }

    /// Whether bare `true`/`false`/`null` are keywords under this version.
    pub(crate) fn has_bare_keywords(self) -> bool {
        self != KdlVersion::V2
    }
}

impl Display for KdlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KdlVersion::V1 => write!(f, "v1"),
            KdlVersion::V2 => write!(f, "v2"),
            KdlVersion::Auto => write!(f, "auto"),
        }
    }
}

/// Per-call version state. A fixed version is locked from the start; `Auto`
/// stays open until the first piece of evidence and then never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VersionLock {
    resolved: Option<KdlVersion>,
}

impl VersionLock {
    pub(crate) fn new(requested: KdlVersion) -> Self {
        Self {
            resolved: match requested {
                KdlVersion::Auto => None,
                v => Some(v),
            },
        }
    }

    pub(crate) fn get(&self) -> Option<KdlVersion> {
        self.resolved
    }

    pub(crate) fn is_open(&self) -> bool {
        self.resolved.is_none()
    }

    /// Locks to `version` unless already locked. Returns the version in
    /// effect afterwards.
    pub(crate) fn lock(&mut self, version: KdlVersion, reason: &'static str) -> KdlVersion {
        match self.resolved {
            Some(current) => current,
            None => {
                tracing::trace!(%version, reason, "locked KDL version");
                self.resolved = Some(version);
                version
            }
        }
    }
}
